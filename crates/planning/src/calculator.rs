use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};

use restock_core::{ProductCode, ProductType, ReplenishmentError, ReplenishmentResult};
use restock_rules::{PlanningSettings, ProductRuleTable, ProductTypeRules, RestockConfig, round_up_to_multiple};

use crate::decision::{ReplenishmentDecision, ReplenishmentInput, StockCoverage, Urgency};
use crate::lead_time::LeadTimeResolver;

/// Computes per-SKU ordering decisions.
///
/// Pure and deterministic: the same input, rule table and evaluation date always
/// yield the same decision. Cloning is cheap (the rule table is shared).
#[derive(Debug, Clone)]
pub struct ReplenishmentCalculator {
    resolver: LeadTimeResolver,
    settings: PlanningSettings,
    evaluation_date: NaiveDate,
}

impl ReplenishmentCalculator {
    pub fn new(rules: Arc<ProductRuleTable>, evaluation_date: NaiveDate) -> Self {
        Self {
            resolver: LeadTimeResolver::new(rules),
            settings: PlanningSettings::default(),
            evaluation_date,
        }
    }

    /// Calculator evaluating as of today's UTC date.
    pub fn for_today(rules: Arc<ProductRuleTable>) -> Self {
        Self::new(rules, Utc::now().date_naive())
    }

    pub fn from_config(config: RestockConfig, evaluation_date: NaiveDate) -> Self {
        Self::new(Arc::new(config.rules), evaluation_date).with_settings(config.planning)
    }

    pub fn with_settings(mut self, settings: PlanningSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    pub fn settings(&self) -> &PlanningSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &LeadTimeResolver {
        &self.resolver
    }

    /// Evaluate one SKU.
    ///
    /// Fails with `InvalidInput` for malformed product codes or negative / non-finite
    /// quantities, and with a configuration error for any product type the rule
    /// table does not know (malformed keys included). No partial decision is
    /// produced on failure.
    pub fn evaluate(&self, input: &ReplenishmentInput) -> ReplenishmentResult<ReplenishmentDecision> {
        let product_code: ProductCode = input.product_code.parse()?;
        let product_type: ProductType = input.product_type.parse().map_err(|_| {
            ReplenishmentError::configuration(format!(
                "unknown product type `{}`",
                input.product_type.trim()
            ))
        })?;
        ensure_non_negative("current_stock", input.current_stock)?;
        ensure_non_negative("daily_consumption", input.daily_consumption)?;

        let (lead, rules) = self
            .resolver
            .resolve_with_rules(&product_type, input.combined_delivery)?;
        let total_lead_time_days = lead.total_lead_time_days();
        let reorder_threshold_days = lead.reorder_threshold_days();

        let mut decision = ReplenishmentDecision {
            product_code,
            product_type,
            combined_delivery: input.combined_delivery,
            current_stock: input.current_stock,
            daily_consumption: input.daily_consumption,
            evaluation_date: self.evaluation_date,
            days_until_oos: StockCoverage::Unbounded,
            total_lead_time_days,
            reorder_threshold_days,
            should_create_order: false,
            recommended_order: 0.0,
            final_order: 0,
            order_date: None,
            delivery_date: None,
            urgency: Urgency::Low,
            delivery_partner: rules.primary_delivery_partner().map(str::to_string),
        };

        if input.daily_consumption == 0.0 {
            tracing::debug!(
                product_code = %decision.product_code,
                "no consumption; stock never runs out"
            );
            return Ok(decision);
        }

        let days_until_oos = input.current_stock / input.daily_consumption;
        if !days_until_oos.is_finite() {
            tracing::debug!(
                product_code = %decision.product_code,
                "consumption too small to exhaust stock"
            );
            return Ok(decision);
        }
        let threshold = f64::from(reorder_threshold_days);

        let target_coverage = input.daily_consumption * threshold;
        let recommended_order = (target_coverage - input.current_stock).max(0.0);

        // Never back-dated: a due order is placed on the evaluation date.
        let offset_days = (days_until_oos - threshold).floor().max(0.0) as u64;
        let order_date = self.evaluation_date.checked_add_days(Days::new(offset_days));
        let delivery_date = order_date
            .and_then(|date| date.checked_add_days(Days::new(u64::from(total_lead_time_days))));
        let should_create_order = days_until_oos <= threshold;

        // A due order must be dated; a distant one may fall past the calendar.
        if should_create_order && delivery_date.is_none() {
            return Err(out_of_calendar(&decision.product_code));
        }

        decision.days_until_oos = StockCoverage::Days(days_until_oos);
        decision.should_create_order = should_create_order;
        decision.recommended_order = recommended_order;
        decision.final_order = round_order_quantity(recommended_order, rules);
        decision.order_date = delivery_date.and(order_date);
        decision.delivery_date = delivery_date;
        decision.urgency = Urgency::classify(decision.days_until_oos, total_lead_time_days, &self.settings);

        tracing::debug!(
            product_code = %decision.product_code,
            product_type = %decision.product_type,
            days_until_oos,
            reorder_threshold_days,
            should_create_order = decision.should_create_order,
            final_order = decision.final_order,
            order_date = ?decision.order_date,
            "evaluated replenishment"
        );

        Ok(decision)
    }
}

/// Round a recommended quantity to the supplier's batching constraints.
///
/// Fractional units round up, then up to the next multiple of `multiplicity`, and
/// the result is raised to `min_batch_size` (itself rounded up to a multiple).
/// Nothing to order stays nothing, whatever the minimum batch.
pub fn round_order_quantity(recommended: f64, rules: &ProductTypeRules) -> u64 {
    if recommended.is_nan() || recommended <= 0.0 {
        return 0;
    }
    let units = recommended.ceil() as u64;
    round_up_to_multiple(units, rules.multiplicity).max(rules.effective_min_batch())
}

fn ensure_non_negative(field: &str, value: f64) -> ReplenishmentResult<()> {
    if !value.is_finite() {
        return Err(ReplenishmentError::invalid_input(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(ReplenishmentError::invalid_input(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

fn out_of_calendar(product_code: &ProductCode) -> ReplenishmentError {
    ReplenishmentError::invalid_input(format!(
        "{product_code}: order date falls outside the supported calendar range"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn lens_rules() -> ProductTypeRules {
        ProductTypeRules::new(45, 10, 37, 15)
            .with_batching(5000, 50)
            .with_delivery_partners(["DHL Express"])
    }

    fn calculator() -> ReplenishmentCalculator {
        let table = ProductRuleTable::builder()
            .register("lens".parse().unwrap(), lens_rules())
            .unwrap()
            .register(
                "solution".parse().unwrap(),
                ProductTypeRules::new(5, 10, 10, 5).with_batching(5000, 24),
            )
            .unwrap()
            .register("loose".parse().unwrap(), ProductTypeRules::new(5, 10, 10, 5))
            .unwrap()
            .build();
        ReplenishmentCalculator::new(Arc::new(table), today())
    }

    fn lens_input(stock: f64, consumption: f64) -> ReplenishmentInput {
        ReplenishmentInput::new("LNS-030", stock, consumption, "lens")
    }

    #[test]
    fn comfortable_stock_does_not_trigger_an_order() {
        let d = calculator().evaluate(&lens_input(8000.0, 100.0)).unwrap();

        assert_eq!(d.total_lead_time_days, 55);
        assert_eq!(d.reorder_threshold_days, 70);
        assert_eq!(d.days_until_oos, StockCoverage::Days(80.0));
        assert!(!d.should_create_order);
        assert_eq!(d.recommended_order, 0.0);
        assert_eq!(d.final_order, 0);
        assert_eq!(d.order_date, today().checked_add_days(Days::new(10)));
        assert_eq!(d.delivery_date, today().checked_add_days(Days::new(65)));
        assert_eq!(d.urgency, Urgency::High);
        assert_eq!(d.delivery_partner.as_deref(), Some("DHL Express"));
    }

    #[test]
    fn combined_delivery_pulls_the_order_forward() {
        let input = lens_input(8000.0, 100.0).with_combined_delivery(true);
        let d = calculator().evaluate(&input).unwrap();

        assert_eq!(d.total_lead_time_days, 82);
        assert_eq!(d.reorder_threshold_days, 97);
        assert!(d.should_create_order);
        assert_eq!(d.recommended_order, 1700.0);
        // 1700 rounds to the 5000 minimum batch.
        assert_eq!(d.final_order, 5000);
        assert_eq!(d.order_date, Some(today()));
        assert_eq!(d.delivery_date, today().checked_add_days(Days::new(82)));
        assert_eq!(d.urgency, Urgency::Critical);
    }

    #[test]
    fn equality_with_threshold_triggers_an_order() {
        let d = calculator()
            .evaluate(&ReplenishmentInput::new("SOL-120", 100.0, 5.0, "loose"))
            .unwrap();

        assert_eq!(d.reorder_threshold_days, 20);
        assert_eq!(d.days_until_oos, StockCoverage::Days(20.0));
        assert!(d.should_create_order);
        assert_eq!(d.recommended_order, 0.0);
        assert_eq!(d.final_order, 0);
        assert_eq!(d.order_date, Some(today()));
    }

    #[test]
    fn zero_consumption_never_orders() {
        let d = calculator().evaluate(&lens_input(10.0, 0.0)).unwrap();

        assert_eq!(d.days_until_oos, StockCoverage::Unbounded);
        assert!(!d.should_create_order);
        assert_eq!(d.recommended_order, 0.0);
        assert_eq!(d.final_order, 0);
        assert_eq!(d.order_date, None);
        assert_eq!(d.delivery_date, None);
        assert_eq!(d.urgency, Urgency::Low);
    }

    #[test]
    fn empty_stock_orders_full_threshold_coverage() {
        let d = calculator().evaluate(&lens_input(0.0, 100.0)).unwrap();

        assert_eq!(d.days_until_oos, StockCoverage::Days(0.0));
        assert!(d.should_create_order);
        assert_eq!(d.recommended_order, 7000.0);
        assert_eq!(d.final_order, 7000);
    }

    #[test]
    fn recommended_quantity_rounds_up_to_multiplicity() {
        // threshold 20 days * 300/day = 6000, minus 10 in stock = 5990 -> 6000 (x24).
        let d = calculator()
            .evaluate(&ReplenishmentInput::new("SOL-360", 10.0, 300.0, "solution"))
            .unwrap();

        assert_eq!(d.recommended_order, 5990.0);
        assert_eq!(d.final_order, 6000);
        assert_eq!(d.final_order % 24, 0);
    }

    #[test]
    fn misaligned_min_batch_is_rounded_up() {
        // threshold 20 * 10 = 200 needed, far below the 5000 minimum -> 5016 (x24).
        let d = calculator()
            .evaluate(&ReplenishmentInput::new("SOL-360", 0.0, 10.0, "solution"))
            .unwrap();

        assert_eq!(d.final_order, 5016);
    }

    #[test]
    fn negative_stock_is_invalid_input() {
        match calculator().evaluate(&lens_input(-1.0, 100.0)) {
            Err(ReplenishmentError::InvalidInput(msg)) if msg.contains("current_stock") => {}
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn negative_or_nan_consumption_is_invalid_input() {
        for consumption in [-0.5, f64::NAN, f64::INFINITY] {
            match calculator().evaluate(&lens_input(100.0, consumption)) {
                Err(ReplenishmentError::InvalidInput(msg)) if msg.contains("daily_consumption") => {}
                other => panic!("Expected InvalidInput for {consumption}, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_product_code_is_invalid_input() {
        let input = ReplenishmentInput::new("   ", 100.0, 1.0, "lens");
        assert!(matches!(
            calculator().evaluate(&input),
            Err(ReplenishmentError::InvalidInput(_))
        ));
    }

    #[test]
    fn unknown_product_type_is_a_configuration_error() {
        let input = ReplenishmentInput::new("GLS-1", 100.0, 1.0, "glasses");
        let err = calculator().evaluate(&input).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let calc = calculator();
        let input = lens_input(1234.5, 17.25);
        assert_eq!(calc.evaluate(&input).unwrap(), calc.evaluate(&input).unwrap());
    }

    #[test]
    fn rounding_keeps_zero_at_zero() {
        assert_eq!(round_order_quantity(0.0, &lens_rules()), 0);
        assert_eq!(round_order_quantity(-3.0, &lens_rules()), 0);
        assert_eq!(round_order_quantity(0.2, &lens_rules()), 5000);
        assert_eq!(round_order_quantity(5001.0, &lens_rules()), 5050);
    }

    #[test]
    fn slow_mover_beyond_the_calendar_is_not_an_error() {
        // 1e8 days of cover puts the order date past the last representable year.
        let d = calculator()
            .evaluate(&ReplenishmentInput::new("SLOW-1", 1.0e8, 1.0, "lens"))
            .unwrap();

        assert_eq!(d.days_until_oos, StockCoverage::Days(1.0e8));
        assert!(!d.should_create_order);
        assert_eq!(d.final_order, 0);
        assert_eq!(d.order_date, None);
        assert_eq!(d.delivery_date, None);
        assert_eq!(d.urgency, Urgency::Low);
    }

    #[test]
    fn subnormal_consumption_is_treated_as_no_demand() {
        let d = calculator()
            .evaluate(&lens_input(1.0e10, f64::MIN_POSITIVE / 4.0))
            .unwrap();

        assert_eq!(d.days_until_oos, StockCoverage::Unbounded);
        assert!(!d.should_create_order);
        assert_eq!(d.order_date, None);
    }

    #[test]
    fn huge_demand_still_rounds_to_a_multiple() {
        let d = calculator()
            .evaluate(&ReplenishmentInput::new("SOL-360", 0.0, 1.0e18, "solution"))
            .unwrap();

        assert!(d.should_create_order);
        assert_eq!(d.final_order % 24, 0);
        assert_eq!(d.final_order, u64::MAX / 24 * 24);
    }

    #[test]
    fn malformed_product_type_is_a_configuration_error() {
        for product_type in ["Lens", "daily-lenses", ""] {
            let input = ReplenishmentInput::new("X-1", 10.0, 1.0, product_type);
            match calculator().evaluate(&input) {
                Err(ReplenishmentError::Configuration(msg)) if msg.contains("unknown product type") => {}
                other => panic!("Expected Configuration for {product_type:?}, got {other:?}"),
            }
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: coverage is exact division and drives the order flag.
            #[test]
            fn order_flag_follows_coverage(
                stock in 0.0f64..100_000.0,
                consumption in 0.01f64..1_000.0
            ) {
                let d = calculator().evaluate(&lens_input(stock, consumption)).unwrap();
                let days = stock / consumption;
                prop_assert_eq!(d.days_until_oos, StockCoverage::Days(days));
                prop_assert_eq!(d.should_create_order, days <= f64::from(d.reorder_threshold_days));
            }

            /// Property: final quantity is a multiple of multiplicity, zero when nothing is needed.
            #[test]
            fn final_order_respects_batching(
                stock in 0.0f64..100_000.0,
                consumption in 0.0f64..1_000.0,
                combined in any::<bool>()
            ) {
                let input = ReplenishmentInput::new("SOL-360", stock, consumption, "solution")
                    .with_combined_delivery(combined);
                let d = calculator().evaluate(&input).unwrap();
                prop_assert_eq!(d.final_order % 24, 0);
                if d.recommended_order == 0.0 {
                    prop_assert_eq!(d.final_order, 0);
                } else {
                    prop_assert!(d.final_order >= 5016);
                    prop_assert!(d.final_order as f64 >= d.recommended_order);
                }
            }

            /// Property: never back-dated, and delivery is order date plus lead time.
            #[test]
            fn dates_are_forward_and_consistent(
                stock in 0.0f64..100_000.0,
                consumption in 0.1f64..1_000.0,
                combined in any::<bool>()
            ) {
                let input = lens_input(stock, consumption).with_combined_delivery(combined);
                let d = calculator().evaluate(&input).unwrap();
                let order_date = d.order_date.unwrap();
                prop_assert!(order_date >= today());
                prop_assert_eq!(
                    d.delivery_date,
                    order_date.checked_add_days(Days::new(u64::from(d.total_lead_time_days)))
                );
            }

            /// Property: evaluation is deterministic.
            #[test]
            fn evaluate_is_deterministic(
                stock in 0.0f64..100_000.0,
                consumption in 0.0f64..1_000.0
            ) {
                let calc = calculator();
                let input = lens_input(stock, consumption);
                prop_assert_eq!(calc.evaluate(&input).unwrap(), calc.evaluate(&input).unwrap());
            }
        }
    }
}
