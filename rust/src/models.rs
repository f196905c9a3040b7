//! Core data types for the CPM engine.

use pyo3::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::HashMap;

// Note: We use std HashMap for the dict views handed to Python

/// A task in the project network.
///
/// `duration` is signed so that bad input can be represented and rejected by
/// the engine instead of failing at the conversion boundary.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub duration: i64,
    /// Finish-to-start predecessors. Treated as a set; the first entry is
    /// significant only for the first-predecessor independent reserve rule.
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
}

impl Task {
    pub fn new<I, S>(id: impl Into<String>, duration: i64, predecessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            duration,
            predecessors: predecessors.into_iter().map(Into::into).collect(),
        }
    }

    /// A task with no predecessors is a project start node.
    pub fn is_start(&self) -> bool {
        self.predecessors.is_empty()
    }
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, duration, predecessors=Vec::new()))]
    fn py_new(id: String, duration: i64, predecessors: Vec<String>) -> Self {
        Self {
            id,
            duration,
            predecessors,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, duration={}, predecessors={:?})",
            self.id, self.duration, self.predecessors
        )
    }
}

/// Computed timings and reserves of one task.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct TaskSchedule {
    #[pyo3(get)]
    pub task_id: String,
    #[pyo3(get)]
    pub duration: i64,
    /// Deduplicated predecessor ids in declaration order.
    #[pyo3(get)]
    pub predecessors: Vec<String>,
    #[pyo3(get)]
    pub early_start: i64,
    #[pyo3(get)]
    pub early_finish: i64,
    #[pyo3(get)]
    pub late_start: i64,
    #[pyo3(get)]
    pub late_finish: i64,
    /// late_start - early_start.
    #[pyo3(get)]
    pub total_reserve: i64,
    #[pyo3(get)]
    pub independent_reserve: i64,
    /// `None` for critical tasks and for zero-duration tasks with slack.
    #[pyo3(get)]
    pub tension_coefficient: Option<f64>,
}

impl TaskSchedule {
    pub fn is_critical(&self) -> bool {
        self.total_reserve == 0
    }
}

#[pymethods]
impl TaskSchedule {
    #[pyo3(name = "is_critical")]
    fn py_is_critical(&self) -> bool {
        self.is_critical()
    }

    fn __repr__(&self) -> String {
        format!(
            "TaskSchedule(task_id={:?}, es={}, ef={}, ls={}, lf={}, reserve={})",
            self.task_id,
            self.early_start,
            self.early_finish,
            self.late_start,
            self.late_finish,
            self.total_reserve
        )
    }
}

/// Result of one CPM computation. Replaced wholesale on recomputation.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleResults {
    /// Per-task schedules in declaration order.
    #[pyo3(get)]
    pub tasks: Vec<TaskSchedule>,
    /// Project duration.
    #[pyo3(get)]
    pub total_time: i64,
    /// Zero-reserve tasks in topological order.
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    positions: FxHashMap<String, usize>,
}

impl ScheduleResults {
    pub(crate) fn new(
        tasks: Vec<TaskSchedule>,
        total_time: i64,
        critical_path: Vec<String>,
    ) -> Self {
        let positions = tasks
            .iter()
            .enumerate()
            .map(|(pos, t)| (t.task_id.clone(), pos))
            .collect();
        Self {
            tasks,
            total_time,
            critical_path,
            positions,
        }
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskSchedule> {
        self.positions.get(task_id).map(|&pos| &self.tasks[pos])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskSchedule> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_critical(&self, task_id: &str) -> bool {
        self.get(task_id).is_some_and(TaskSchedule::is_critical)
    }

    /// Defined tension coefficients in declaration order.
    pub fn tension_coefficients(&self) -> Vec<(&str, f64)> {
        self.tasks
            .iter()
            .filter_map(|t| t.tension_coefficient.map(|k| (t.task_id.as_str(), k)))
            .collect()
    }

    /// One dependency-ordered chain of critical tasks from project start to
    /// project end.
    ///
    /// Follows zero-slack edges (predecessor finishes exactly when the
    /// successor starts), taking the first such task in declaration order at
    /// every step, until a critical task with no such successor is reached.
    /// Zero-duration end milestones are included. Parallel critical branches are not enumerated; use
    /// `critical_path` for the full set.
    pub fn critical_chain(&self) -> Vec<&str> {
        let mut tight_successors: FxHashMap<&str, Vec<&TaskSchedule>> = FxHashMap::default();
        for task in self.tasks.iter().filter(|t| t.is_critical()) {
            for pred in &task.predecessors {
                let Some(pred_schedule) = self.get(pred) else {
                    continue;
                };
                if pred_schedule.is_critical() && pred_schedule.early_finish == task.early_start {
                    tight_successors.entry(pred.as_str()).or_default().push(task);
                }
            }
        }

        let Some(mut current) = self
            .tasks
            .iter()
            .find(|t| t.is_critical() && t.early_start == 0)
        else {
            return Vec::new();
        };

        // Tight edges form a DAG, so the walk terminates
        let mut chain = vec![current.task_id.as_str()];
        while let Some(next) = tight_successors
            .get(current.task_id.as_str())
            .and_then(|succs| succs.first().copied())
        {
            chain.push(next.task_id.as_str());
            current = next;
        }
        chain
    }

    fn field_map<T>(&self, field: impl Fn(&TaskSchedule) -> T) -> HashMap<String, T> {
        self.tasks
            .iter()
            .map(|t| (t.task_id.clone(), field(t)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ScheduleResults {
    type Item = &'a TaskSchedule;
    type IntoIter = std::slice::Iter<'a, TaskSchedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[pymethods]
impl ScheduleResults {
    /// Look up one task's schedule.
    #[pyo3(name = "task")]
    fn py_task(&self, task_id: &str) -> Option<TaskSchedule> {
        self.get(task_id).cloned()
    }

    #[pyo3(name = "critical_chain")]
    fn py_critical_chain(&self) -> Vec<String> {
        self.critical_chain().into_iter().map(str::to_string).collect()
    }

    #[getter]
    fn early_start(&self) -> HashMap<String, i64> {
        self.field_map(|t| t.early_start)
    }

    #[getter]
    fn early_finish(&self) -> HashMap<String, i64> {
        self.field_map(|t| t.early_finish)
    }

    #[getter]
    fn late_start(&self) -> HashMap<String, i64> {
        self.field_map(|t| t.late_start)
    }

    #[getter]
    fn late_finish(&self) -> HashMap<String, i64> {
        self.field_map(|t| t.late_finish)
    }

    #[getter]
    fn total_reserves(&self) -> HashMap<String, i64> {
        self.field_map(|t| t.total_reserve)
    }

    #[getter]
    fn independent_reserves(&self) -> HashMap<String, i64> {
        self.field_map(|t| t.independent_reserve)
    }

    /// Only tasks whose coefficient is defined appear in the dict.
    #[getter(tension_coefficients)]
    fn py_tension_coefficients(&self) -> HashMap<String, f64> {
        self.tension_coefficients()
            .into_iter()
            .map(|(id, k)| (id.to_string(), k))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleResults(tasks={}, total_time={}, critical_path={:?})",
            self.tasks.len(),
            self.total_time,
            self.critical_path
        )
    }
}
