use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Regex object for the canonical identifier format: 8-4-4-4-12 hexadecimal
/// groups separated by hyphens, case-insensitive.
pub static CANONICAL_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed canonical identifier [{0}]")]
pub struct ParseIdError(pub String);

/// An identifier validated against the canonical format at construction.
/// Raw id strings coming out of the store go through [`CanonicalId::parse`]
/// before they are used as grouping or update keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn parse(value: &str) -> Result<Self, ParseIdError> {
        if CANONICAL_ID_PATTERN.is_match(value) {
            Ok(CanonicalId(value.to_string()))
        } else {
            Err(ParseIdError(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CanonicalId {
    type Err = ParseIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CanonicalId::parse(value)
    }
}

impl TryFrom<String> for CanonicalId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CanonicalId::parse(&value)
    }
}

impl From<CanonicalId> for String {
    fn from(id: CanonicalId) -> String {
        id.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_canonical_lowercase() {
        let id = CanonicalId::parse("3f2e9b1c-8a4d-4c6e-9f0a-1b2c3d4e5f60").unwrap();
        assert_eq!(id.as_str(), "3f2e9b1c-8a4d-4c6e-9f0a-1b2c3d4e5f60");
    }

    #[test]
    fn accepts_uppercase_groups() {
        assert!(CanonicalId::parse("3F2E9B1C-8A4D-4C6E-9F0A-1B2C3D4E5F60").is_ok());
    }

    #[test]
    fn rejects_empty_string() {
        assert!(CanonicalId::parse("").is_err());
    }

    #[test]
    fn rejects_missing_hyphens() {
        assert!(CanonicalId::parse("3f2e9b1c8a4d4c6e9f0a1b2c3d4e5f60").is_err());
    }

    #[test]
    fn rejects_non_hexadecimal_characters() {
        assert!(CanonicalId::parse("3f2e9b1c-8a4d-4c6e-9f0a-1b2c3d4e5g60").is_err());
    }

    #[test]
    fn rejects_wrong_group_lengths() {
        assert!(CanonicalId::parse("3f2e9b1-c8a4d-4c6e-9f0a-1b2c3d4e5f60").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(CanonicalId::parse("3f2e9b1c-8a4d-4c6e-9f0a-1b2c3d4e5f60 ").is_err());
    }

    #[test]
    fn parse_error_carries_the_rejected_value() {
        let err = CanonicalId::parse("not-an-id").unwrap_err();
        assert_eq!(err, ParseIdError(String::from("not-an-id")));
    }
}
