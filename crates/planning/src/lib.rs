//! Replenishment planning.
//!
//! Maps (current stock, forecast consumption, product-type rules) to a per-SKU
//! ordering decision, then buckets decisions by order date for combined
//! shipments. Everything here is deterministic domain logic (no IO, no storage);
//! stock levels and forecasts are supplied by callers.

pub mod batch;
pub mod calculator;
pub mod cost;
pub mod decision;
pub mod grouping;
pub mod lead_time;
pub mod report;
pub mod validation;

pub use batch::{BatchEntry, BatchOutcome};
pub use calculator::{ReplenishmentCalculator, round_order_quantity};
pub use cost::{MemberCost, ShipmentCostEstimate, ShipmentCostEstimator};
pub use decision::{ReplenishmentDecision, ReplenishmentInput, StockCoverage, Urgency};
pub use grouping::{OrderGroup, OrderGroupingScheduler, OrderSchedule};
pub use lead_time::{LeadTimeParams, LeadTimeResolver};
pub use report::ReportFormatter;
pub use validation::validate_order_request;
