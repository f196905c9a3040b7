//! Critical Path Method (CPM) scheduling engine.
//!
//! Given tasks with durations and finish-to-start dependencies, computes
//! early/late start and finish times, project duration, the critical path,
//! total and independent reserves and tension coefficients. Exposed to Rust
//! callers directly and to Python through the `cpm_engine` extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;

mod config;
pub mod critical_path;
pub mod graph;
mod interner;
pub mod logging;
mod models;
pub mod timeline;

pub use config::{ConfigError, CpmConfig, IndependentReserveRule};
pub use critical_path::{compute, CpmEngine, TaskTiming};
pub use graph::{InvalidGraphError, TaskGraph};
pub use models::{ScheduleResults, Task, TaskSchedule};
pub use timeline::{project_timeline, ScheduledTask, TimelineError};

/// Run the Critical Path Method over a list of tasks.
///
/// # Arguments
/// * `tasks` - Tasks in declaration order; any order of dependencies is accepted
/// * `config` - Engine configuration (defaults to the first-predecessor reserve rule)
///
/// # Returns
/// * ScheduleResults with timings, reserves, tension coefficients and critical path
///
/// # Raises
/// * ValueError for an empty graph, negative duration, duplicate or undefined
///   task, circular dependency, or unknown reserve rule
#[pyfunction]
#[pyo3(signature = (tasks, config=None))]
fn compute_schedule(tasks: Vec<Task>, config: Option<CpmConfig>) -> PyResult<ScheduleResults> {
    let config = config.unwrap_or_default();
    let engine = CpmEngine::new(&config)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;

    match engine.compute(&TaskGraph::from_tasks(tasks)) {
        Ok(results) => Ok(results),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Place computed schedules on the calendar, with day 0 at `project_start`.
#[pyfunction]
#[pyo3(name = "project_timeline")]
fn py_project_timeline(
    results: &ScheduleResults,
    project_start: NaiveDate,
) -> PyResult<Vec<ScheduledTask>> {
    project_timeline(results, project_start)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// The cpm_engine Python module.
#[pymodule]
fn cpm_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Task>()?;
    m.add_class::<TaskSchedule>()?;
    m.add_class::<ScheduleResults>()?;
    m.add_class::<ScheduledTask>()?;

    // Config types
    m.add_class::<CpmConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(compute_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_project_timeline, m)?)?;

    Ok(())
}
