//! Time reserves and tension coefficients.

use crate::config::IndependentReserveRule;
use crate::graph::GraphIndex;
use crate::interner::TaskIdx;

use super::types::TaskTiming;

/// Independent reserve of `task`: `max(0, late_start - bound)`, where the
/// bound is a predecessor's early finish chosen by `rule`, or 0 for start
/// tasks.
pub(crate) fn independent_reserve(
    index: &GraphIndex,
    timings: &[TaskTiming],
    task: TaskIdx,
    rule: IndependentReserveRule,
) -> i64 {
    let preds = &index.predecessors[task as usize];
    let bound = match rule {
        IndependentReserveRule::FirstPredecessor => preds
            .first()
            .map(|&pred| timings[pred as usize].early_finish),
        IndependentReserveRule::LatestPredecessor => preds
            .iter()
            .map(|&pred| timings[pred as usize].early_finish)
            .max(),
    }
    .unwrap_or(0);

    (timings[task as usize].late_start - bound).max(0)
}

/// Tension coefficient `1 - total_reserve / duration`.
///
/// Defined only for tasks with positive reserve and positive duration.
pub(crate) fn tension_coefficient(total_reserve: i64, duration: i64) -> Option<f64> {
    if total_reserve <= 0 || duration == 0 {
        return None;
    }
    Some(1.0 - total_reserve as f64 / duration as f64)
}
