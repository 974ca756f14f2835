// ── Runtime catalog configuration ──
//
// Describes *how* to reach the backend and how to page through it.
// Never touches disk: the CLI builds a `CatalogConfig` and hands it in.

use std::time::Duration;

use crate::query::DEFAULT_LIMIT;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for a single catalog backend.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Backend root URL (e.g. `http://localhost:3000`).
    pub api_url: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Page size used when a request does not name one.
    pub page_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".into(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_limit: DEFAULT_LIMIT,
        }
    }
}
