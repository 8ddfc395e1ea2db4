//! Strongly-typed identifier value objects.
//!
//! All identifiers are UUID-v4 values rendered as hyphenated strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Generates a UUID-backed identifier newtype.
///
/// Each generated type gets `new`, `from_uuid`, `as_uuid`, `parse`,
/// `Display`, `FromStr` and transparent serde support.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns true for the all-zero UUID, which is never a valid identity.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// Parses an identifier from caller input.
            ///
            /// Rejects blank strings, malformed UUIDs and the nil UUID.
            pub fn parse(raw: &str) -> Result<Self, ValidationError> {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                let uuid = Uuid::parse_str(raw)
                    .map_err(|e| ValidationError::invalid_format($field, e.to_string()))?;
                if uuid.is_nil() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(uuid))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a runbook document.
    DocumentId,
    "document_id"
);

uuid_identifier!(
    /// Unique identifier for one immutable version of a document.
    VersionId,
    "version_id"
);

uuid_identifier!(
    /// Identifier of the source repository a document was imported from.
    RepositoryId,
    "repository_id"
);

/// Maximum length of a user identifier.
const MAX_USER_ID_LEN: usize = 255;

/// User identifier as issued by the platform's identity provider.
///
/// Used for document owners and for the actor of a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if blank or too long.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        let len = trimmed.chars().count();
        if len > MAX_USER_ID_LEN {
            return Err(ValidationError::too_long("user_id", MAX_USER_ID_LEN, len));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
