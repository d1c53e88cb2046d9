use chrono::NaiveDate;
use rayon::prelude::*;

use restock_core::{ReplenishmentError, RunId};

use crate::calculator::ReplenishmentCalculator;
use crate::decision::{ReplenishmentDecision, ReplenishmentInput};
use crate::grouping::{OrderGroupingScheduler, OrderSchedule};

/// Below this many inputs a batch is evaluated on the calling thread.
const PARALLEL_THRESHOLD: usize = 64;

/// Outcome of one SKU within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    /// Raw code as supplied, so failed entries can still be attributed.
    pub product_code: String,
    pub outcome: Result<ReplenishmentDecision, ReplenishmentError>,
}

/// Result of evaluating a batch of SKUs in one cycle.
///
/// Entries keep input order. A failed SKU never prevents the others from being
/// evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub run_id: RunId,
    pub evaluation_date: NaiveDate,
    pub entries: Vec<BatchEntry>,
}

impl BatchOutcome {
    pub fn decisions(&self) -> impl Iterator<Item = &ReplenishmentDecision> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ReplenishmentError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.product_code.as_str(), err)))
    }

    pub fn success_count(&self) -> usize {
        self.decisions().count()
    }

    pub fn failure_count(&self) -> usize {
        self.entries.len() - self.success_count()
    }

    /// Number of SKUs for which an order is due.
    pub fn order_count(&self) -> usize {
        self.decisions().filter(|d| d.should_create_order).count()
    }

    /// Group the successful decisions by order date.
    pub fn schedule(&self) -> OrderSchedule {
        OrderGroupingScheduler::new().group(self.decisions())
    }
}

impl ReplenishmentCalculator {
    /// Evaluate every input, collecting per-SKU successes and failures.
    pub fn evaluate_batch(&self, inputs: &[ReplenishmentInput]) -> BatchOutcome {
        let run_id = RunId::new();

        let evaluate = |input: &ReplenishmentInput| BatchEntry {
            product_code: input.product_code.clone(),
            outcome: self.evaluate(input),
        };

        let entries: Vec<BatchEntry> = if inputs.len() > PARALLEL_THRESHOLD {
            inputs.par_iter().map(evaluate).collect()
        } else {
            inputs.iter().map(evaluate).collect()
        };

        let outcome = BatchOutcome {
            run_id,
            evaluation_date: self.evaluation_date(),
            entries,
        };

        for (product_code, err) in outcome.failures() {
            tracing::warn!(
                run_id = %run_id,
                product_code,
                configuration = err.is_configuration(),
                error = %err,
                "SKU evaluation failed"
            );
        }

        tracing::info!(
            run_id = %run_id,
            evaluation_date = %outcome.evaluation_date,
            skus = outcome.entries.len(),
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            orders = outcome.order_count(),
            "replenishment batch evaluated"
        );

        outcome
    }
}
