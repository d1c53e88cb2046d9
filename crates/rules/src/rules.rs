use serde::{Deserialize, Serialize};

use restock_core::{ReplenishmentError, ReplenishmentResult, ValueObject};

/// Replenishment rules for one product type.
///
/// Day counts are whole days. Quantities are in sellable units (packs, bottles).
/// Cost fields only feed the advisory shipment estimate; they never influence
/// whether an order is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTypeRules {
    pub manufacturing_time_days: u32,
    /// Delivery time when the SKU ships on its own.
    pub delivery_time_days: u32,
    /// Delivery time when the SKU rides a combined shipment (may exceed the solo value).
    pub combined_delivery_time_days: u32,
    pub safety_stock_days: u32,
    /// Smallest quantity the supplier accepts; 0 means no minimum.
    #[serde(default)]
    pub min_batch_size: u64,
    /// Order quantities must be a multiple of this (>= 1).
    pub multiplicity: u64,
    #[serde(default)]
    pub base_delivery_cost: f64,
    #[serde(default)]
    pub cost_per_kg: f64,
    #[serde(default)]
    pub unit_weight_kg: f64,
    /// Preferred carriers, best first.
    #[serde(default)]
    pub delivery_partners: Vec<String>,
}

impl ValueObject for ProductTypeRules {}

impl ProductTypeRules {
    /// Rules with the given lead-time components, multiplicity 1, no minimum batch
    /// and no cost data.
    pub fn new(
        manufacturing_time_days: u32,
        delivery_time_days: u32,
        combined_delivery_time_days: u32,
        safety_stock_days: u32,
    ) -> Self {
        Self {
            manufacturing_time_days,
            delivery_time_days,
            combined_delivery_time_days,
            safety_stock_days,
            min_batch_size: 0,
            multiplicity: 1,
            base_delivery_cost: 0.0,
            cost_per_kg: 0.0,
            unit_weight_kg: 0.0,
            delivery_partners: Vec::new(),
        }
    }

    pub fn with_batching(mut self, min_batch_size: u64, multiplicity: u64) -> Self {
        self.min_batch_size = min_batch_size;
        self.multiplicity = multiplicity;
        self
    }

    pub fn with_costs(mut self, base_delivery_cost: f64, cost_per_kg: f64, unit_weight_kg: f64) -> Self {
        self.base_delivery_cost = base_delivery_cost;
        self.cost_per_kg = cost_per_kg;
        self.unit_weight_kg = unit_weight_kg;
        self
    }

    pub fn with_delivery_partners<I, S>(mut self, partners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delivery_partners = partners.into_iter().map(Into::into).collect();
        self
    }

    /// Solo (not combined) manufacturing + delivery time.
    pub fn solo_lead_time_days(&self) -> u32 {
        self.manufacturing_time_days
            .saturating_add(self.delivery_time_days)
    }

    /// Longest reorder threshold these rules can produce (slower delivery route
    /// plus safety stock), or `None` when it does not fit in a day count.
    pub fn max_reorder_threshold_days(&self) -> Option<u32> {
        self.manufacturing_time_days
            .checked_add(self.delivery_time_days.max(self.combined_delivery_time_days))?
            .checked_add(self.safety_stock_days)
    }

    /// `min_batch_size` rounded up to the next multiple of `multiplicity`.
    pub fn effective_min_batch(&self) -> u64 {
        round_up_to_multiple(self.min_batch_size, self.multiplicity)
    }

    pub fn min_batch_is_aligned(&self) -> bool {
        self.multiplicity == 0 || self.min_batch_size % self.multiplicity == 0
    }

    pub fn primary_delivery_partner(&self) -> Option<&str> {
        self.delivery_partners.first().map(String::as_str)
    }

    /// Reject entries the engine cannot compute with.
    pub fn validate(&self) -> ReplenishmentResult<()> {
        if self.multiplicity == 0 {
            return Err(ReplenishmentError::configuration("multiplicity must be >= 1"));
        }
        if self.max_reorder_threshold_days().is_none() {
            return Err(ReplenishmentError::configuration(
                "lead time plus safety stock exceeds the supported day range",
            ));
        }
        for (name, value) in [
            ("base_delivery_cost", self.base_delivery_cost),
            ("cost_per_kg", self.cost_per_kg),
            ("unit_weight_kg", self.unit_weight_kg),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ReplenishmentError::configuration(format!(
                    "{name} must be a finite non-negative number"
                )));
            }
        }
        if self.delivery_partners.iter().any(|p| p.trim().is_empty()) {
            return Err(ReplenishmentError::configuration(
                "delivery partner names cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Smallest multiple of `multiple` that is >= `value`. A zero `multiple` leaves
/// the value untouched. When that multiple does not fit in a `u64`, the largest
/// multiple that does is returned.
pub fn round_up_to_multiple(value: u64, multiple: u64) -> u64 {
    if multiple == 0 {
        return value;
    }
    value
        .div_ceil(multiple)
        .checked_mul(multiple)
        .unwrap_or(u64::MAX / multiple * multiple)
}
