//! Product-type replenishment rules.
//!
//! This crate holds the static, per-product-type configuration consumed by the
//! planning stages: lead-time components, safety stock, supplier batching
//! constraints and delivery economics. The table is assembled once at startup
//! (from the built-in catalog or a TOML file) and is read-only afterwards.

pub mod catalog;
pub mod config;
pub mod rules;
pub mod table;

pub use config::{CONFIG_PATH_ENV, ConfigError, PlanningSettings, RestockConfig};
pub use rules::{ProductTypeRules, round_up_to_multiple};
pub use table::{ProductRuleTable, ProductRuleTableBuilder};
