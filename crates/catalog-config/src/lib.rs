//! Shared configuration for the catalog CLI.
//!
//! TOML profiles layered with environment overrides, translation to
//! `catalog_core::CatalogConfig`, and persistence of the theme preference.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use catalog_core::{CatalogConfig, DEFAULT_LIMIT, Theme, TlsVerification};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `CATALOG_DEFAULTS__PAGE_LIMIT=20`.
pub const ENV_PREFIX: &str = "CATALOG_";

const CONFIG_FILE: &str = "config.toml";
const STATE_FILE: &str = "state.toml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    /// Returns the resolved name with the profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name.to_owned(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_limit() -> u32 {
    DEFAULT_LIMIT
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g. "http://localhost:3000").
    pub api_url: String,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the default page size.
    pub page_limit: Option<u32>,
}

impl Profile {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            page_limit: None,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Platform config directory (XDG on Linux).
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "catalog", "catalog").map_or_else(dirs_fallback, |dirs| {
        dirs.config_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("catalog");
    p
}

/// Resolve the config file path.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Resolve the UI state file path (theme preference).
pub fn state_path() -> PathBuf {
    config_dir().join(STATE_FILE)
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing file is fine) layered under `CATALOG_` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Write config to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `CatalogConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_catalog_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<CatalogConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let page_limit = profile.page_limit.unwrap_or(defaults.page_limit);
    if page_limit == 0 {
        return Err(ConfigError::Validation {
            field: "page_limit".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(CatalogConfig {
        api_url: profile.api_url.clone(),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        page_limit,
    })
}

// ── Theme preference ────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
struct UiState {
    #[serde(rename = "app-theme", default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

/// Saved theme, or `None` when nothing (valid) has been saved yet.
pub fn load_theme() -> Option<Theme> {
    load_theme_from(&state_path())
}

pub fn load_theme_from(path: &Path) -> Option<Theme> {
    let raw = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<UiState>(&raw) {
        Ok(state) => state.theme,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unreadable state file");
            None
        }
    }
}

pub fn save_theme(theme: Theme) -> Result<(), ConfigError> {
    save_theme_to(theme, &state_path())
}

pub fn save_theme_to(theme: Theme, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let state = UiState { theme: Some(theme) };
    std::fs::write(path, toml::to_string_pretty(&state)?)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Config {
        let mut cfg = Config::default();
        let mut local = Profile::new("http://localhost:3000");
        local.page_limit = Some(8);
        cfg.profiles.insert("default".into(), local);
        cfg.profiles
            .insert("staging".into(), Profile::new("https://staging.example.com"));
        cfg
    }

    #[test]
    fn save_then_load_from_path() {
        figment::Jail::expect_with(|jail| {
            let path = jail.directory().join("config.toml");
            save_config_to(&sample(), &path).unwrap();
            assert_eq!(load_config_from(&path).unwrap(), sample());
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        figment::Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CATALOG_DEFAULTS__PAGE_LIMIT", "25");
            jail.set_env("CATALOG_DEFAULT_PROFILE", "staging");
            let cfg = load_config_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(cfg.defaults.page_limit, 25);
            assert_eq!(cfg.default_profile.as_deref(), Some("staging"));
            Ok(())
        });
    }

    #[test]
    fn profile_lookup_uses_default_name() {
        let cfg = sample();
        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.api_url, "http://localhost:3000");

        assert!(matches!(
            cfg.profile(Some("missing")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_translation_fills_defaults() {
        let cfg = sample();
        let (_, profile) = cfg.profile(Some("staging")).unwrap();
        let core = profile_to_catalog_config(profile, &cfg.defaults).unwrap();
        assert_eq!(core.api_url, "https://staging.example.com");
        assert_eq!(core.timeout, Duration::from_secs(30));
        assert_eq!(core.page_limit, DEFAULT_LIMIT);
        assert_eq!(core.tls, TlsVerification::SystemDefaults);

        let (_, local) = cfg.profile(None).unwrap();
        assert_eq!(
            profile_to_catalog_config(local, &cfg.defaults).unwrap().page_limit,
            8
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let profile = Profile::new("not a url");
        assert!(matches!(
            profile_to_catalog_config(&profile, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));

        let profile = Profile::new("ftp://example.com");
        assert!(profile_to_catalog_config(&profile, &Defaults::default()).is_err());
    }

    #[test]
    fn insecure_profile_skips_verification() {
        let mut profile = Profile::new("https://localhost:3443");
        profile.insecure = Some(true);
        let core = profile_to_catalog_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(core.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn theme_round_trips_under_app_theme_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.toml");
        assert_eq!(load_theme_from(&path), None);

        save_theme_to(Theme::Dark, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("app-theme = \"dark\""));
        assert_eq!(load_theme_from(&path), Some(Theme::Dark));
    }

    #[test]
    fn corrupt_state_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "app-theme = \"purple\"").unwrap();
        assert_eq!(load_theme_from(&path), None);
    }
}
