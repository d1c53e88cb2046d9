//! TOML configuration: planning knobs plus the product-type rule table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use restock_core::{ProductType, ReplenishmentError};

use crate::rules::ProductTypeRules;
use crate::table::ProductRuleTable;

/// Environment variable holding the path of the configuration file.
pub const CONFIG_PATH_ENV: &str = "RESTOCK_CONFIG";

/// Planning settings that are not tied to one product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningSettings {
    /// Discount applied to members of a combined shipment, in percent.
    pub combined_delivery_savings_percent: f64,
    /// Days of coverage beyond total lead time still classified as high urgency.
    pub high_urgency_margin_days: u32,
    /// Days of coverage beyond total lead time still classified as medium urgency.
    pub medium_urgency_margin_days: u32,
}

impl Default for PlanningSettings {
    fn default() -> Self {
        Self {
            combined_delivery_savings_percent: 20.0,
            high_urgency_margin_days: 30,
            medium_urgency_margin_days: 60,
        }
    }
}

impl PlanningSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pct = self.combined_delivery_savings_percent;
        if !(pct.is_finite() && (0.0..=100.0).contains(&pct)) {
            return Err(ConfigError::Validation(format!(
                "combined_delivery_savings_percent must be within 0..=100, got {pct}"
            )));
        }
        if self.medium_urgency_margin_days < self.high_urgency_margin_days {
            return Err(ConfigError::Validation(
                "medium_urgency_margin_days must be >= high_urgency_margin_days".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("configuration validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Rules(#[from] ReplenishmentError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    planning: PlanningSettings,
    product_types: Option<BTreeMap<String, ProductTypeRules>>,
}

/// Fully loaded engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RestockConfig {
    pub planning: PlanningSettings,
    pub rules: ProductRuleTable,
}

impl RestockConfig {
    /// Default settings with the built-in catalog.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self {
            planning: PlanningSettings::default(),
            rules: ProductRuleTable::builtin()?,
        })
    }

    /// Parse a TOML document. A missing `[product_types]` table selects the
    /// built-in catalog.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(raw)?;
        raw.planning.validate()?;

        let rules = match raw.product_types {
            None => ProductRuleTable::builtin()?,
            Some(entries) => {
                let mut builder = ProductRuleTable::builder();
                for (name, rules) in entries {
                    let product_type: ProductType = name.parse().map_err(|_| {
                        ConfigError::Validation(format!("malformed product type key `{name}`"))
                    })?;
                    builder = builder.register(product_type, rules)?;
                }
                builder.build()
            }
        };

        Ok(Self {
            planning: raw.planning,
            rules,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            product_types = config.rules.len(),
            "loaded replenishment configuration"
        );
        Ok(config)
    }

    /// Load from the file named by `RESTOCK_CONFIG`, or fall back to the built-in
    /// catalog when the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_optional(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from).as_deref())
    }

    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::info!("{CONFIG_PATH_ENV} not set; using built-in product catalog");
                Self::builtin()
            }
        }
    }
}
