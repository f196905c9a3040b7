//! Types for critical path calculation.

/// Per-task timing information produced by the forward and backward passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub early_start: i64,
    /// Earliest possible finish time (from forward pass).
    pub early_finish: i64,
    /// Latest allowable start time (from backward pass).
    pub late_start: i64,
    /// Latest allowable finish time (from backward pass).
    pub late_finish: i64,
}

impl TaskTiming {
    /// Total reserve (float) = late_start - early_start.
    pub fn total_reserve(&self) -> i64 {
        self.late_start - self.early_start
    }

    pub fn is_critical(&self) -> bool {
        self.total_reserve() == 0
    }
}
