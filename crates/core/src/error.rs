//! Replenishment error model.

use thiserror::Error;

use crate::id::ProductType;

/// Result type used across the replenishment engine.
pub type ReplenishmentResult<T> = Result<T, ReplenishmentError>;

/// Engine-level error.
///
/// Two families exist: bad caller input (stock, consumption, identifiers) and
/// bad configuration (missing or inconsistent product-type rules). Both are
/// deterministic; nothing here is worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplenishmentError {
    /// A per-SKU input failed validation (negative stock, malformed SKU code, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The rule table has no entry for the requested product type.
    #[error("configuration error: unknown product type `{0}`")]
    UnknownProductType(ProductType),

    /// A rule entry is present but unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ReplenishmentError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unknown_product_type(product_type: ProductType) -> Self {
        Self::UnknownProductType(product_type)
    }

    /// True for errors caused by the rule table rather than by the caller's input.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownProductType(_) | Self::Configuration(_))
    }
}
