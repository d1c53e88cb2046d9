//! `restock-core`: foundation building blocks for the replenishment engine.
//!
//! This crate contains **pure** primitives (no IO): the error taxonomy and the
//! validated identifiers shared by the rule table and the planning stages.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{ReplenishmentError, ReplenishmentResult};
pub use id::{ProductCode, ProductType, RunId};
pub use value_object::ValueObject;
