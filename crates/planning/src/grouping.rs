use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use restock_core::ValueObject;

use crate::decision::ReplenishmentDecision;

/// All decisions sharing one order date.
///
/// Members without a due order are kept for reporting but do not contribute to
/// the aggregate quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderGroup {
    pub order_date: NaiveDate,
    /// Members in insertion order.
    pub decisions: Vec<ReplenishmentDecision>,
}

impl ValueObject for OrderGroup {}

impl OrderGroup {
    pub fn new(order_date: NaiveDate) -> Self {
        Self {
            order_date,
            decisions: Vec::new(),
        }
    }

    /// Sum of `final_order` over members with a due order.
    pub fn aggregate_quantity(&self) -> u64 {
        self.decisions.iter().map(ReplenishmentDecision::ordered_quantity).sum()
    }

    /// Members with a due order.
    pub fn ordering(&self) -> impl Iterator<Item = &ReplenishmentDecision> {
        self.decisions.iter().filter(|d| d.should_create_order)
    }

    pub fn order_count(&self) -> usize {
        self.ordering().count()
    }

    /// Members with a due order that ship on the combined route.
    pub fn combined_members(&self) -> impl Iterator<Item = &ReplenishmentDecision> {
        self.ordering().filter(|d| d.combined_delivery)
    }
}

/// Date-keyed groups plus the decisions that have no order date at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderSchedule {
    /// Iterates in ascending order date.
    pub groups: BTreeMap<NaiveDate, OrderGroup>,
    /// Decisions with no order date: unbounded coverage, or an order date past
    /// the last representable calendar day.
    pub unscheduled: Vec<ReplenishmentDecision>,
}

impl OrderSchedule {
    pub fn group_for(&self, order_date: NaiveDate) -> Option<&OrderGroup> {
        self.groups.get(&order_date)
    }

    /// Total quantity due across every group.
    pub fn total_quantity(&self) -> u64 {
        self.groups.values().map(OrderGroup::aggregate_quantity).sum()
    }
}

/// Buckets decisions of one evaluation cycle by calendar order date.
///
/// Operates on a complete, already collected set of decisions; it is not an
/// incremental stage. Input decisions are cloned, never mutated.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderGroupingScheduler;

impl OrderGroupingScheduler {
    pub fn new() -> Self {
        Self
    }

    pub fn group<'a, I>(&self, decisions: I) -> OrderSchedule
    where
        I: IntoIterator<Item = &'a ReplenishmentDecision>,
    {
        let mut schedule = OrderSchedule::default();

        for decision in decisions {
            match decision.order_date {
                Some(order_date) => schedule
                    .groups
                    .entry(order_date)
                    .or_insert_with(|| OrderGroup::new(order_date))
                    .decisions
                    .push(decision.clone()),
                None => schedule.unscheduled.push(decision.clone()),
            }
        }

        for group in schedule.groups.values() {
            tracing::debug!(
                order_date = %group.order_date,
                members = group.decisions.len(),
                orders = group.order_count(),
                aggregate_quantity = group.aggregate_quantity(),
                "order group formed"
            );
        }

        schedule
    }
}
