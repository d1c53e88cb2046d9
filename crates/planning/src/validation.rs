use chrono::{Days, NaiveDate};

use restock_core::{ReplenishmentError, ReplenishmentResult};
use restock_rules::ProductTypeRules;

/// Check a buyer-entered order against the supplier's terms before it is placed.
///
/// The quantity must reach `min_batch_size` and be a multiple of `multiplicity`;
/// an expected delivery date, when given, cannot precede the earliest possible
/// solo delivery (evaluation date + manufacturing + delivery time).
pub fn validate_order_request(
    rules: &ProductTypeRules,
    quantity: u64,
    expected_delivery: Option<NaiveDate>,
    evaluation_date: NaiveDate,
) -> ReplenishmentResult<()> {
    if quantity == 0 {
        return Err(ReplenishmentError::invalid_input("order quantity must be positive"));
    }

    if quantity < rules.min_batch_size {
        return Err(ReplenishmentError::invalid_input(format!(
            "quantity {quantity} is below the minimum batch of {}",
            rules.min_batch_size
        )));
    }

    if rules.multiplicity > 0 && quantity % rules.multiplicity != 0 {
        return Err(ReplenishmentError::invalid_input(format!(
            "quantity {quantity} is not a multiple of {}",
            rules.multiplicity
        )));
    }

    if let Some(expected) = expected_delivery {
        let earliest = evaluation_date
            .checked_add_days(Days::new(u64::from(rules.solo_lead_time_days())))
            .ok_or_else(|| {
                ReplenishmentError::invalid_input("earliest delivery date is out of calendar range")
            })?;
        if expected < earliest {
            return Err(ReplenishmentError::invalid_input(format!(
                "expected delivery {expected} is earlier than the earliest possible {earliest}"
            )));
        }
    }

    Ok(())
}
