//! Plain-text and JSON renderings of decisions and groups.

use std::fmt::Write as _;

use serde::Serialize;

use crate::decision::{ReplenishmentDecision, Urgency};
use crate::grouping::{OrderGroup, OrderSchedule};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_decision(&self, d: &ReplenishmentDecision) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Product: {} ({})", d.product_code, d.product_type);
        let _ = writeln!(out, "Current stock: {:.0} units", d.current_stock);
        let _ = writeln!(out, "Daily consumption: {:.1} units/day", d.daily_consumption);
        let _ = writeln!(out, "Days until out of stock: {}", d.days_until_oos);
        let _ = writeln!(
            out,
            "Total lead time: {} days ({} delivery)",
            d.total_lead_time_days,
            if d.combined_delivery { "combined" } else { "solo" }
        );
        let _ = writeln!(out, "Reorder threshold: {} days", d.reorder_threshold_days);

        if d.should_create_order {
            let _ = writeln!(
                out,
                "Order: {} units (recommended {:.0})",
                d.final_order, d.recommended_order
            );
        } else {
            let _ = writeln!(out, "Order: not required");
        }

        match (d.order_date, d.delivery_date) {
            (Some(order), Some(delivery)) => {
                let _ = writeln!(out, "Order date: {order}, delivery: {delivery}");
            }
            _ if d.days_until_oos.is_unbounded() => {
                let _ = writeln!(out, "Order date: none (no consumption)");
            }
            _ => {
                let _ = writeln!(out, "Order date: none (beyond the planning calendar)");
            }
        }

        if let Some(partner) = &d.delivery_partner {
            let _ = writeln!(out, "Delivery partner: {partner}");
        }
        let _ = write!(out, "Urgency: {} - {}", d.urgency, urgency_advice(d.urgency));
        out
    }

    pub fn render_group(&self, group: &OrderGroup) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {} order(s), {} unit(s) total",
            group.order_date,
            group.order_count(),
            group.aggregate_quantity()
        );
        for d in &group.decisions {
            if d.should_create_order {
                let _ = writeln!(out, "  - {} x{} [{}]", d.product_code, d.final_order, d.urgency);
            } else {
                let _ = writeln!(out, "  - {} (watch only)", d.product_code);
            }
        }
        out
    }

    pub fn render_schedule(&self, schedule: &OrderSchedule) -> String {
        let mut out = String::new();
        for group in schedule.groups.values() {
            out.push_str(&self.render_group(group));
        }
        if !schedule.unscheduled.is_empty() {
            let codes: Vec<&str> = schedule.unscheduled.iter().map(|d| d.product_code.as_str()).collect();
            let _ = writeln!(out, "No order date: {}", codes.join(", "));
        }
        out
    }

    pub fn to_json<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        serde_json::to_string_pretty(value)
    }
}

fn urgency_advice(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "place the order immediately",
        Urgency::High => "place the order within the next few days",
        Urgency::Medium => "plan the order within the week",
        Urgency::Low => "plan the order ahead of time",
    }
}
