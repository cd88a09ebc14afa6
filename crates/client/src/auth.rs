use {homelab_config::HomelabConfig, secrecy::ExposeSecret};

/// Resolve the session token to start with.
///
/// Priority: explicit token (CLI flag) > config file / `HOMELAB_TOKEN` > none.
/// Blank values count as unset.
pub fn resolve_token(explicit: Option<&str>, config: &HomelabConfig) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .or_else(|| {
            config
                .auth
                .token
                .as_ref()
                .map(|t| t.expose_secret().trim().to_owned())
                .filter(|t| !t.is_empty())
        })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    fn config_with(token: Option<&str>) -> HomelabConfig {
        let mut config = HomelabConfig::default();
        config.auth.token = token.map(|t| Secret::new(t.to_owned()));
        config
    }

    #[test]
    fn explicit_wins() {
        let token = resolve_token(Some("cli-tok"), &config_with(Some("file-tok")));
        assert_eq!(token.as_deref(), Some("cli-tok"));
    }

    #[test]
    fn falls_back_to_config() {
        let token = resolve_token(None, &config_with(Some("file-tok")));
        assert_eq!(token.as_deref(), Some("file-tok"));
    }

    #[test]
    fn blank_counts_as_unset() {
        assert_eq!(
            resolve_token(Some("  "), &config_with(Some("file-tok"))).as_deref(),
            Some("file-tok")
        );
        assert!(resolve_token(None, &config_with(Some(""))).is_none());
    }

    #[test]
    fn without_credentials() {
        assert!(resolve_token(None, &HomelabConfig::default()).is_none());
    }
}
