// HTTP transport settings for the products client.
//
// Everything that shapes the underlying `reqwest::Client` (request
// timeout, certificate trust, user agent) is decided here, once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// Which server certificates the client trusts.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Platform roots only.
    #[default]
    System,
    /// Platform roots plus the PEM certificate at this path, for backends
    /// behind an internal CA.
    CustomCa(PathBuf),
    /// Trust anything. Local backends with self-signed certificates.
    DangerAcceptInvalid,
}

/// How to build the HTTP client behind [`crate::ProductsClient`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout, connect through body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("catalog/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build the `reqwest::Client` described by this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("cannot build HTTP client: {e}")))
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA certificate {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}
