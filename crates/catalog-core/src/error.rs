// ── Core error types ──
//
// User-facing errors from catalog-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the store swaps them for a fixed
// message and keeps the technical detail in `reason` for logs.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request errors ───────────────────────────────────────────────
    /// A backend call failed. `message` is the canned text also published
    /// on the store's error state; `reason` is the transport detail.
    #[error("{message}")]
    Request { message: String, reason: String },

    #[error("Connection to {url} failed: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<catalog_api::Error> for CoreError {
    fn from(err: catalog_api::Error) -> Self {
        match err {
            catalog_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Request {
                        message: "Request failed".into(),
                        reason: e.to_string(),
                    }
                }
            }
            catalog_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            catalog_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Invalid base URL: {url}"),
            },
            catalog_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            catalog_api::Error::Api { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            catalog_api::Error::Api { status, message } => CoreError::Request {
                message: format!("Backend returned HTTP {status}"),
                reason: message,
            },
            catalog_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_canned_message() {
        let err = CoreError::Request {
            message: "Failed to create product.".into(),
            reason: "HTTP 500".into(),
        };
        assert_eq!(err.to_string(), "Failed to create product.");
        assert_eq!(err.user_message(), "Failed to create product.");
    }

    #[test]
    fn api_404_maps_to_not_found() {
        let err = CoreError::from(catalog_api::Error::Api {
            status: 404,
            message: "Not Found".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn invalid_url_maps_to_config() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = CoreError::from(catalog_api::Error::InvalidUrl(parse_err));
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
