use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::HomelabConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "homelab.toml",
    "homelab.yaml",
    "homelab.yml",
    "homelab.json",
];

pub const ENV_API_BASE_URL: &str = "HOMELAB_API_BASE_URL";
pub const ENV_WEBSOCKET_BASE_URL: &str = "HOMELAB_WEBSOCKET_BASE_URL";
pub const ENV_TOKEN: &str = "HOMELAB_TOKEN";

static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Use `dir` instead of `~/.config/homelab/` for the user-global config.
pub fn set_config_dir(dir: PathBuf) {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.lock() {
        *guard = Some(dir);
    }
}

/// Drop a previous [`set_config_dir`] override.
pub fn clear_config_dir() {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.lock() {
        *guard = None;
    }
}

/// Returns the user-global config directory (`~/.config/homelab/` unless
/// overridden).
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = CONFIG_DIR_OVERRIDE.lock().ok().and_then(|g| g.clone()) {
        return Some(dir);
    }
    directories::ProjectDirs::from("", "", "homelab").map(|d| d.config_dir().to_path_buf())
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<HomelabConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply `HOMELAB_*`
/// environment overrides.
///
/// Search order:
/// 1. `./homelab.{toml,yaml,yml,json}` (project-local)
/// 2. `<config_dir>/homelab.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `HomelabConfig::default()` if nothing is found or the file
/// fails to parse.
pub fn discover_and_load() -> HomelabConfig {
    let config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                HomelabConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            HomelabConfig::default()
        },
    };
    apply_env_overrides(config)
}

/// Override config values from `HOMELAB_*` environment variables.
pub fn apply_env_overrides(config: HomelabConfig) -> HomelabConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

fn apply_env_overrides_with(
    mut config: HomelabConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> HomelabConfig {
    let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(url) = lookup(ENV_API_BASE_URL) {
        debug!(var = ENV_API_BASE_URL, "overriding api_base_url from env");
        config.server.api_base_url = url;
    }
    if let Some(url) = lookup(ENV_WEBSOCKET_BASE_URL) {
        debug!(var = ENV_WEBSOCKET_BASE_URL, "overriding websocket_base_url from env");
        config.server.websocket_base_url = url;
    }
    if let Some(token) = lookup(ENV_TOKEN) {
        config.auth.token = Some(Secret::new(token));
    }
    config
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .or_else(|| {
            let dir = config_dir()?;
            CONFIG_FILENAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|p| p.exists())
        })
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("homelab.toml")
}

/// Write `config` to the discovered config file, or to the default
/// `homelab.toml` when none exists yet.
///
/// Creates parent directories if needed. Returns the path written to.
pub fn save_config(config: &HomelabConfig) -> anyhow::Result<PathBuf> {
    let path = find_or_default_config_path();
    save_config_to(config, &path)?;
    Ok(path)
}

/// Write `config` to `path`, in the format its extension names.
pub fn save_config_to(config: &HomelabConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_config(config, path)?)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

/// Apply `update` to the discovered config file and save it back. See
/// [`update_config_at`].
pub fn update_config(update: impl FnOnce(&mut HomelabConfig)) -> anyhow::Result<PathBuf> {
    let path = find_or_default_config_path();
    update_config_at(&path, update)?;
    Ok(path)
}

/// Load the file at `path` as written, apply `update`, and save it back in
/// the same format. Starts from defaults when there is no file yet.
///
/// Neither `${VAR}` substitution nor env overrides are applied, so
/// placeholders in string fields are written back unexpanded.
pub fn update_config_at(
    path: &Path,
    update: impl FnOnce(&mut HomelabConfig),
) -> anyhow::Result<()> {
    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        parse_config(&raw, path)?
    } else {
        HomelabConfig::default()
    };
    update(&mut config);
    save_config_to(&config, path)
}

fn render_config(config: &HomelabConfig, path: &Path) -> anyhow::Result<String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => {
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("serialize config: {e}"))
        },
        "yaml" | "yml" => Ok(serde_yaml::to_string(config)?),
        "json" => Ok(serde_json::to_string_pretty(config)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<HomelabConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
