// ── Product identity ──
//
// Backend-assigned ids and the temporary placeholder ids held by
// optimistic creates share one type so list lookups never care which.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const TEMPORARY_PREFIX: &str = "tmp-";

/// Identifier of a product in the catalog.
///
/// The backend hands out opaque strings (sometimes numeric). While a
/// create is in flight the store holds a `tmp-<uuid>` placeholder instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh placeholder id for an optimistic create.
    pub fn temporary() -> Self {
        Self(format!("{TEMPORARY_PREFIX}{}", Uuid::new_v4()))
    }

    /// Whether this is a placeholder that the backend has not confirmed.
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn temporary_ids_are_prefixed_and_unique() {
        let a = ProductId::temporary();
        let b = ProductId::temporary();
        assert!(a.is_temporary());
        assert!(a.as_str().starts_with("tmp-"));
        assert_ne!(a, b);
    }

    #[test]
    fn backend_ids_are_not_temporary() {
        assert!(!ProductId::from("42").is_temporary());
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&ProductId::from("7")).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
