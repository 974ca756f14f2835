//! CLI configuration: thin wrapper around `catalog_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --timeout, --insecure).

use catalog_core::{CatalogConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use catalog_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, profile_to_catalog_config,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the `CatalogConfig` for this invocation.
///
/// Flag overrides take priority over profile values. Without a matching
/// profile, `--api-url` alone is enough.
pub fn build_catalog_config(global: &GlobalOpts) -> Result<CatalogConfig, CliError> {
    let cfg = load_config_or_default();
    build_from(&cfg, global)
}

fn build_from(cfg: &Config, global: &GlobalOpts) -> Result<CatalogConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), &global.api_url) {
        (Some(profile), _) => profile.clone(),
        (None, _) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        (None, Some(url)) => Profile::new(url.clone()),
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let mut config = profile_to_catalog_config(&profile, &cfg.defaults)?;
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["catalog"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["theme", "show"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_default() -> Config {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::new("http://localhost:3000"));
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with_default();
        let resolved = build_from(
            &cfg,
            &global(&["--api-url", "http://10.0.0.5:8080", "--timeout", "5"]),
        )
        .unwrap();
        assert_eq!(resolved.api_url, "http://10.0.0.5:8080");
        assert_eq!(resolved.timeout, Duration::from_secs(5));
    }

    #[test]
    fn api_url_alone_is_enough() {
        let resolved =
            build_from(&Config::default(), &global(&["--api-url", "http://localhost:4000"]))
                .unwrap();
        assert_eq!(resolved.api_url, "http://localhost:4000");
    }

    #[test]
    fn missing_everything_is_no_config() {
        let err = build_from(&Config::default(), &global(&[])).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_explicit_profile_is_reported() {
        let err = build_from(&config_with_default(), &global(&["--profile", "prod"])).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "default"));
    }

    #[test]
    fn insecure_flag_disables_verification() {
        let resolved = build_from(&config_with_default(), &global(&["-k"])).unwrap();
        assert_eq!(resolved.tls, TlsVerification::DangerAcceptInvalid);
    }
}
