//! Validated identifier types shared across the crate.
//!
//! Database and collection names are newtypes that can only be constructed
//! through validation. Everything downstream (command builders, catalog
//! calls, scratch file names) accepts these types rather than raw strings,
//! so a name that could smuggle shell or URI syntax never reaches an
//! external invocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Identifier assigned to a captured backup, used to name the artifact.
pub type BackupId = Uuid;

/// Longest accepted database name, matching MongoDB's own limit.
pub const MAX_DATABASE_NAME_LEN: usize = 63;

/// Longest accepted collection name.
pub const MAX_COLLECTION_NAME_LEN: usize = 120;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("invalid database name: must be 1-63 characters from [A-Za-z0-9_-]")]
    InvalidDatabaseName,

    #[error("invalid collection name: must be 1-120 characters without '$', '\\0' or a 'system.' prefix")]
    InvalidCollectionName,
}

/// A database name that has passed the identifier check.
///
/// The accepted alphabet is `[A-Za-z0-9_-]` with a length of 1 to 63. This is
/// deliberately narrower than what MongoDB itself allows: the name is placed
/// on external command lines, and the restricted alphabet is the gate that
/// makes that safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String")]
#[schema(value_type = String, pattern = "^[A-Za-z0-9_-]{1,63}$")]
pub struct DatabaseName(String);

impl DatabaseName {
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();
        if is_valid_database_name(&name) {
            Ok(Self(name))
        } else {
            Err(IdentifierError::InvalidDatabaseName)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_database_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_DATABASE_NAME_LEN
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DatabaseName {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for DatabaseName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A collection name that has passed the identifier check.
///
/// Collection names never reach a command line (only driver calls), so the
/// check is looser than [`DatabaseName`]: printable, no `$`, no NUL, and not
/// in the reserved `system.` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String")]
#[schema(value_type = String)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();
        if is_valid_collection_name(&name) {
            Ok(Self(name))
        } else {
            Err(IdentifierError::InvalidCollectionName)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_COLLECTION_NAME_LEN
        && !name.contains(['$', '\0'])
        && !name.starts_with("system.")
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for CollectionName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_database_names() {
        for name in ["orders_db", "Orders-2024", "a", "x".repeat(63).as_str()] {
            assert!(DatabaseName::new(name).is_ok(), "{name:?} should be accepted");
        }
    }

    #[test]
    fn rejects_hostile_database_names() {
        for name in [
            "",
            " ",
            "orders db",
            "orders;rm -rf /",
            "orders`id`",
            "orders$(true)",
            "../../etc/passwd",
            "orders\ndb",
            "ordérs",
            "x".repeat(64).as_str(),
        ] {
            assert_eq!(
                DatabaseName::new(name),
                Err(IdentifierError::InvalidDatabaseName),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn database_name_deserializes_with_validation() {
        let ok: DatabaseName = serde_json::from_str("\"orders_db\"").unwrap();
        assert_eq!(ok.as_str(), "orders_db");

        let err = serde_json::from_str::<DatabaseName>("\"orders db\"");
        assert!(err.is_err());
    }

    #[test]
    fn collection_names_reject_reserved_and_hostile_input() {
        assert!(CollectionName::new("invoices").is_ok());
        assert!(CollectionName::new("invoices.archive").is_ok());
        assert!(CollectionName::new("system.users").is_err());
        assert!(CollectionName::new("inv$oices").is_err());
        assert!(CollectionName::new("").is_err());
    }
}
