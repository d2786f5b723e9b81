//! Server-assigned identifiers

use crate::error::ModelError;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Identifier the remote API assigns on first create
///
/// The API may send it as a JSON number or a string; both normalize to the
/// same textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QrCodeId(String);

impl QrCodeId {
    /// Wrap a raw identifier
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyId`] for an empty string
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(Self(raw))
    }

    /// Identifier as text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for QrCodeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for QrCodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for QrCodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
