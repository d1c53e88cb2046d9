//! Built-in catalog: the four product families of the contact-lens business.
//!
//! Used when no configuration file is supplied.

use restock_core::{ProductType, ReplenishmentResult};

use crate::rules::ProductTypeRules;
use crate::table::ProductRuleTable;

pub const SOLUTION_360_500: &str = "solution_360_500";
pub const SOLUTION_120: &str = "solution_120";
pub const MONTHLY_LENSES: &str = "monthly_lenses";
pub const DAILY_LENSES: &str = "daily_lenses";

/// Average manufacturing time (30-60 days quoted by suppliers).
const MANUFACTURING_TIME_DAYS: u32 = 45;
/// Combined route delivery time; 45 + 37 = 82 days total lead time.
const COMBINED_DELIVERY_TIME_DAYS: u32 = 37;
const COST_PER_KG: f64 = 100.0;

const ROAD_CARRIERS: [&str; 3] = ["ТК Деловые Линии", "ТК ПЭК", "ТК Байкал-Сервис"];
const EXPRESS_COURIERS: [&str; 3] = ["DHL Express", "FedEx", "EMS"];

fn solution(min_batch: u64, multiplicity: u64, base_cost: f64, unit_weight_kg: f64) -> ProductTypeRules {
    ProductTypeRules::new(MANUFACTURING_TIME_DAYS, 30, COMBINED_DELIVERY_TIME_DAYS, 30)
        .with_batching(min_batch, multiplicity)
        .with_costs(base_cost, COST_PER_KG, unit_weight_kg)
        .with_delivery_partners(ROAD_CARRIERS)
}

fn lenses(min_batch: u64, multiplicity: u64) -> ProductTypeRules {
    ProductTypeRules::new(MANUFACTURING_TIME_DAYS, 10, COMBINED_DELIVERY_TIME_DAYS, 15)
        .with_batching(min_batch, multiplicity)
        .with_costs(8000.0, COST_PER_KG, 0.01)
        .with_delivery_partners(EXPRESS_COURIERS)
}

impl ProductRuleTable {
    /// The built-in catalog.
    pub fn builtin() -> ReplenishmentResult<Self> {
        Ok(ProductRuleTable::builder()
            .register(SOLUTION_360_500.parse::<ProductType>()?, solution(5000, 24, 5000.0, 0.5))?
            .register(SOLUTION_120.parse::<ProductType>()?, solution(5000, 48, 4000.0, 0.2))?
            .register(MONTHLY_LENSES.parse::<ProductType>()?, lenses(5000, 50))?
            .register(DAILY_LENSES.parse::<ProductType>()?, lenses(3000, 30))?
            .build())
    }
}
