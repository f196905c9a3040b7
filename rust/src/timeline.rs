//! Calendar projection of a computed schedule.
//!
//! Turns day offsets into dated bars for a Gantt-style chart. Drawing the
//! chart is left to the caller.

use chrono::{Days, NaiveDate};
use pyo3::prelude::*;
use thiserror::Error;

use crate::models::{ScheduleResults, TaskSchedule};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Dates for task {task} fall outside the supported calendar range")]
    DateOutOfRange { task: String },
}

/// A task placed on the calendar.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    #[pyo3(get)]
    pub task_id: String,
    /// Early start date.
    #[pyo3(get)]
    pub start_date: NaiveDate,
    /// Early finish date (exclusive end of the bar).
    #[pyo3(get)]
    pub end_date: NaiveDate,
    #[pyo3(get)]
    pub late_start_date: NaiveDate,
    #[pyo3(get)]
    pub late_end_date: NaiveDate,
    #[pyo3(get)]
    pub duration_days: i64,
    #[pyo3(get)]
    pub critical: bool,
}

#[pymethods]
impl ScheduledTask {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledTask(task_id={:?}, start={}, end={}, critical={})",
            self.task_id, self.start_date, self.end_date, self.critical
        )
    }
}

fn offset_date(
    start: NaiveDate,
    days: i64,
    task: &TaskSchedule,
) -> Result<NaiveDate, TimelineError> {
    u64::try_from(days)
        .ok()
        .and_then(|days| start.checked_add_days(Days::new(days)))
        .ok_or_else(|| TimelineError::DateOutOfRange {
            task: task.task_id.clone(),
        })
}

/// Place every task of `results` on the calendar, with day 0 at
/// `project_start`. Tasks keep their declaration order.
pub fn project_timeline(
    results: &ScheduleResults,
    project_start: NaiveDate,
) -> Result<Vec<ScheduledTask>, TimelineError> {
    results
        .iter()
        .map(|task| -> Result<ScheduledTask, TimelineError> {
            Ok(ScheduledTask {
                task_id: task.task_id.clone(),
                start_date: offset_date(project_start, task.early_start, task)?,
                end_date: offset_date(project_start, task.early_finish, task)?,
                late_start_date: offset_date(project_start, task.late_start, task)?,
                late_end_date: offset_date(project_start, task.late_finish, task)?,
                duration_days: task.duration,
                critical: task.is_critical(),
            })
        })
        .collect()
}
