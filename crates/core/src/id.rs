//! Strongly-typed identifiers used across the engine.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ReplenishmentError;

/// Identifier of one batch evaluation run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = ReplenishmentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| ReplenishmentError::invalid_input(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(RunId, "RunId");

/// Maximum accepted length of a SKU code.
pub const MAX_PRODUCT_CODE_LEN: usize = 64;

/// SKU code as supplied by the upstream inventory platform.
///
/// Surrounding whitespace is trimmed; the remainder must be non-empty, at most
/// [`MAX_PRODUCT_CODE_LEN`] characters and free of whitespace/control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductCode(String);

impl ProductCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProductCode {
    type Err = ReplenishmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(ReplenishmentError::invalid_input("product code cannot be empty"));
        }
        if code.chars().count() > MAX_PRODUCT_CODE_LEN {
            return Err(ReplenishmentError::invalid_input(format!(
                "product code longer than {MAX_PRODUCT_CODE_LEN} characters"
            )));
        }
        if code.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ReplenishmentError::invalid_input(format!(
                "product code `{code}` contains whitespace or control characters"
            )));
        }
        Ok(Self(code.to_string()))
    }
}

impl TryFrom<String> for ProductCode {
    type Error = ReplenishmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductCode> for String {
    fn from(value: ProductCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product type key into the rule table (e.g. `monthly_lenses`).
///
/// Lowercase ASCII letters, digits and underscores, starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductType(String);

impl ProductType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProductType {
    type Err = ReplenishmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let mut chars = key.chars();
        let well_formed = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(ReplenishmentError::invalid_input(format!(
                "malformed product type `{key}`"
            )));
        }
        Ok(Self(key.to_string()))
    }
}

impl TryFrom<String> for ProductType {
    type Error = ReplenishmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductType> for String {
    fn from(value: ProductType) -> Self {
        value.0
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
