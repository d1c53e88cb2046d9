use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use restock_core::{ProductCode, ProductType, ValueObject};
use restock_rules::PlanningSettings;

/// Per-SKU request, as marshalled by the upstream stock/forecast collaborator.
///
/// Identifiers arrive as plain strings and are validated by the calculator, so a
/// malformed SKU code surfaces as an input error for that SKU only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentInput {
    pub product_code: String,
    pub current_stock: f64,
    /// Forecast units consumed per day; zero means no demand.
    pub daily_consumption: f64,
    pub product_type: String,
    #[serde(default)]
    pub combined_delivery: bool,
}

impl ReplenishmentInput {
    pub fn new(
        product_code: impl Into<String>,
        current_stock: f64,
        daily_consumption: f64,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            current_stock,
            daily_consumption,
            product_type: product_type.into(),
            combined_delivery: false,
        }
    }

    pub fn with_combined_delivery(mut self, combined: bool) -> Self {
        self.combined_delivery = combined;
        self
    }
}

/// Days until the SKU runs out of stock at the current consumption rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum StockCoverage {
    Days(f64),
    /// No consumption: the SKU never runs out.
    Unbounded,
}

impl StockCoverage {
    pub fn days(&self) -> Option<f64> {
        match self {
            StockCoverage::Days(d) => Some(*d),
            StockCoverage::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, StockCoverage::Unbounded)
    }
}

impl core::fmt::Display for StockCoverage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockCoverage::Days(d) => write!(f, "{d:.1} days"),
            StockCoverage::Unbounded => f.write_str("never"),
        }
    }
}

/// How soon the order has to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Critical when stock runs out within the lead time itself; high/medium when
    /// it runs out within the configured margins beyond it.
    pub fn classify(coverage: StockCoverage, total_lead_time_days: u32, settings: &PlanningSettings) -> Self {
        let Some(days) = coverage.days() else {
            return Urgency::Low;
        };
        let lead = f64::from(total_lead_time_days);
        if days <= lead {
            Urgency::Critical
        } else if days <= lead + f64::from(settings.high_urgency_margin_days) {
            Urgency::High
        } else if days <= lead + f64::from(settings.medium_urgency_margin_days) {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl core::fmt::Display for Urgency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering decision for one SKU. Fully derived from the input, the rule table
/// and the evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentDecision {
    pub product_code: ProductCode,
    pub product_type: ProductType,
    pub combined_delivery: bool,
    pub current_stock: f64,
    pub daily_consumption: f64,
    pub evaluation_date: NaiveDate,
    pub days_until_oos: StockCoverage,
    pub total_lead_time_days: u32,
    pub reorder_threshold_days: u32,
    pub should_create_order: bool,
    /// Units needed to cover the reorder threshold, before batch rounding.
    pub recommended_order: f64,
    /// Recommended quantity after multiplicity / minimum batch rounding.
    pub final_order: u64,
    /// `None` when coverage is unbounded.
    pub order_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub urgency: Urgency,
    pub delivery_partner: Option<String>,
}

impl ValueObject for ReplenishmentDecision {}

impl ReplenishmentDecision {
    /// Quantity that counts towards a shipment: `final_order` when an order is due,
    /// zero otherwise.
    pub fn ordered_quantity(&self) -> u64 {
        if self.should_create_order {
            self.final_order
        } else {
            0
        }
    }
}
