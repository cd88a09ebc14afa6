//! Configuration loading and env substitution for the homelab client.
//!
//! Config files: `homelab.toml`, `homelab.yaml`, or `homelab.json`
//! Searched in `./` then `~/.config/homelab/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values, and
//! `HOMELAB_API_BASE_URL` / `HOMELAB_WEBSOCKET_BASE_URL` / `HOMELAB_TOKEN`
//! overrides.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        ENV_API_BASE_URL, ENV_TOKEN, ENV_WEBSOCKET_BASE_URL, apply_env_overrides,
        clear_config_dir, config_dir, discover_and_load, find_or_default_config_path, load_config,
        save_config, save_config_to, set_config_dir, update_config, update_config_at,
    },
    schema::{AuthConfig, DEFAULT_TOAST_TIMEOUT_MS, HomelabConfig, ServerConfig, ToastConfig},
};
