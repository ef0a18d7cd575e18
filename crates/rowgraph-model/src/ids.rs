#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Identifier of a representation, stable within one mapper configuration.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct RepresentationId(String);

impl RepresentationId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidRepresentationId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepresentationId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepresentationId> for String {
    fn from(value: RepresentationId) -> Self {
        value.0
    }
}

impl fmt::Display for RepresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deterministic object identifier.
///
/// Generated identities take the form `<type-slug>--<uuid-shaped hex>` where the
/// hex part is the first 16 bytes of a SHA-256 digest over the object's
/// canonical content. Identities of already stored objects are opaque strings.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct StandardId(String);

impl StandardId {
    /// Wraps an identity coming from outside the engine (for example a store lookup).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_first_16_bytes_of_sha256(entity_type: &str, digest: [u8; 32]) -> Self {
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        let hex = hex::encode(out);
        Self(format!(
            "{}--{}-{}-{}-{}-{}",
            type_slug(entity_type),
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StandardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercases a type name and replaces anything outside `[a-z0-9]` with `-`.
pub fn type_slug(entity_type: &str) -> String {
    let slug: String = entity_type
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() {
        "object".to_string()
    } else {
        slug
    }
}
