//! Advisory delivery-cost estimate for an order group.
//!
//! The estimate never feeds back into the go/no-go decision; it only tells the
//! buyer what combining shipments on a date is worth.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use restock_core::{ProductCode, ReplenishmentResult};
use restock_rules::ProductRuleTable;

use crate::calculator::ReplenishmentCalculator;
use crate::grouping::OrderGroup;

/// Cost of shipping one ordering member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberCost {
    pub product_code: ProductCode,
    pub quantity: u64,
    pub base_cost: f64,
    pub weight_cost: f64,
    /// Discount granted for riding a combined shipment.
    pub savings: f64,
    pub delivery_partner: Option<String>,
}

impl MemberCost {
    pub fn gross(&self) -> f64 {
        self.base_cost + self.weight_cost
    }

    pub fn net(&self) -> f64 {
        self.gross() - self.savings
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentCostEstimate {
    pub order_date: NaiveDate,
    pub members: Vec<MemberCost>,
    pub gross_cost: f64,
    pub savings: f64,
    pub net_cost: f64,
}

/// Prices order groups from the rule table's delivery economics.
#[derive(Debug, Clone)]
pub struct ShipmentCostEstimator {
    rules: Arc<ProductRuleTable>,
    combined_savings_percent: f64,
}

impl ShipmentCostEstimator {
    pub fn new(rules: Arc<ProductRuleTable>, combined_savings_percent: f64) -> Self {
        Self {
            rules,
            combined_savings_percent,
        }
    }

    /// Price the members of `group` that have a due order.
    ///
    /// Combined-route members earn the savings discount only when at least two of
    /// them share the date; a lone combined member ships alone anyway.
    pub fn estimate(&self, group: &OrderGroup) -> ReplenishmentResult<ShipmentCostEstimate> {
        let combined_shipment = group.combined_members().count() >= 2;
        let discount = self.combined_savings_percent / 100.0;

        let mut members = Vec::with_capacity(group.order_count());
        for decision in group.ordering() {
            let rules = self.rules.lookup(&decision.product_type)?;
            let quantity = decision.final_order;
            let base_cost = rules.base_delivery_cost;
            let weight_cost = quantity as f64 * rules.unit_weight_kg * rules.cost_per_kg;
            let savings = if combined_shipment && decision.combined_delivery {
                (base_cost + weight_cost) * discount
            } else {
                0.0
            };
            members.push(MemberCost {
                product_code: decision.product_code.clone(),
                quantity,
                base_cost,
                weight_cost,
                savings,
                delivery_partner: decision.delivery_partner.clone(),
            });
        }

        let gross_cost: f64 = members.iter().map(MemberCost::gross).sum();
        let savings: f64 = members.iter().map(|m| m.savings).sum();

        Ok(ShipmentCostEstimate {
            order_date: group.order_date,
            members,
            gross_cost,
            savings,
            net_cost: gross_cost - savings,
        })
    }
}

impl ReplenishmentCalculator {
    /// Cost estimator sharing this calculator's rule table and savings setting.
    pub fn cost_estimator(&self) -> ShipmentCostEstimator {
        ShipmentCostEstimator::new(
            Arc::clone(self.resolver().shared_rules()),
            self.settings().combined_delivery_savings_percent,
        )
    }
}
