//! Critical Path Method scheduling.
//!
//! Computes early and late times over an explicit topological order, then
//! derives total and independent reserves, tension coefficients and the set
//! of critical (zero-reserve) tasks.

mod calculation;
mod engine;
mod reserves;
mod types;

pub use engine::{compute, CpmEngine};
pub use types::TaskTiming;
