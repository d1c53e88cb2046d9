use std::sync::Arc;

use serde::{Deserialize, Serialize};

use restock_core::{ProductType, ReplenishmentResult, ValueObject};
use restock_rules::{ProductRuleTable, ProductTypeRules};

/// Lead-time components effective for one SKU evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTimeParams {
    pub manufacturing_time_days: u32,
    /// Solo or combined delivery time, depending on the shipment choice.
    pub effective_delivery_time_days: u32,
    pub safety_stock_days: u32,
}

impl ValueObject for LeadTimeParams {}

impl LeadTimeParams {
    pub fn from_rules(rules: &ProductTypeRules, combined: bool) -> Self {
        let effective_delivery_time_days = if combined {
            rules.combined_delivery_time_days
        } else {
            rules.delivery_time_days
        };
        Self {
            manufacturing_time_days: rules.manufacturing_time_days,
            effective_delivery_time_days,
            safety_stock_days: rules.safety_stock_days,
        }
    }

    /// Manufacturing + effective delivery. Validated rules never saturate.
    pub fn total_lead_time_days(&self) -> u32 {
        self.manufacturing_time_days
            .saturating_add(self.effective_delivery_time_days)
    }

    /// Days of coverage at or below which an order must be triggered.
    pub fn reorder_threshold_days(&self) -> u32 {
        self.total_lead_time_days()
            .saturating_add(self.safety_stock_days)
    }
}

/// Resolves lead-time parameters from the shared rule table.
#[derive(Debug, Clone)]
pub struct LeadTimeResolver {
    rules: Arc<ProductRuleTable>,
}

impl LeadTimeResolver {
    pub fn new(rules: Arc<ProductRuleTable>) -> Self {
        Self { rules }
    }

    pub fn shared_rules(&self) -> &Arc<ProductRuleTable> {
        &self.rules
    }

    /// Effective lead time and safety buffer for `product_type`.
    ///
    /// Fails with a configuration error when the product type is not registered.
    pub fn resolve(&self, product_type: &ProductType, combined: bool) -> ReplenishmentResult<LeadTimeParams> {
        self.resolve_with_rules(product_type, combined)
            .map(|(params, _)| params)
    }

    /// Same as [`resolve`](Self::resolve), also handing back the rule entry.
    pub fn resolve_with_rules(
        &self,
        product_type: &ProductType,
        combined: bool,
    ) -> ReplenishmentResult<(LeadTimeParams, &ProductTypeRules)> {
        let rules = self.rules.lookup(product_type)?;
        Ok((LeadTimeParams::from_rules(rules, combined), rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::ReplenishmentError;

    fn lens() -> ProductType {
        "lens".parse().unwrap()
    }

    fn resolver() -> LeadTimeResolver {
        let table = ProductRuleTable::builder()
            .register(lens(), ProductTypeRules::new(45, 10, 37, 15))
            .unwrap()
            .build();
        LeadTimeResolver::new(Arc::new(table))
    }

    #[test]
    fn solo_delivery_uses_solo_delivery_time() {
        let params = resolver().resolve(&lens(), false).unwrap();

        assert_eq!(params.manufacturing_time_days, 45);
        assert_eq!(params.effective_delivery_time_days, 10);
        assert_eq!(params.total_lead_time_days(), 55);
        assert_eq!(params.reorder_threshold_days(), 70);
    }

    #[test]
    fn combined_delivery_uses_combined_delivery_time() {
        let params = resolver().resolve(&lens(), true).unwrap();

        assert_eq!(params.effective_delivery_time_days, 37);
        assert_eq!(params.total_lead_time_days(), 82);
        assert_eq!(params.reorder_threshold_days(), 97);
    }

    #[test]
    fn unknown_product_type_is_a_configuration_error() {
        let err = resolver().resolve(&"solution".parse().unwrap(), false).unwrap_err();
        match err {
            ReplenishmentError::UnknownProductType(t) => assert_eq!(t.as_str(), "solution"),
            _ => panic!("Expected UnknownProductType"),
        }
    }

    #[test]
    fn resolve_with_rules_hands_back_the_entry() {
        let resolver = resolver();
        let (params, rules) = resolver.resolve_with_rules(&lens(), false).unwrap();
        assert_eq!(params, LeadTimeParams::from_rules(rules, false));
        assert_eq!(rules.safety_stock_days, 15);
    }
}
