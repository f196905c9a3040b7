//! CPM engine entry point.

use crate::config::{ConfigError, CpmConfig, IndependentReserveRule};
use crate::graph::{GraphIndex, InvalidGraphError, TaskGraph};
use crate::interner::TaskIdx;
use crate::models::{ScheduleResults, TaskSchedule};
use crate::{log_debug, log_phases};

use super::calculation::{backward_pass, forward_pass};
use super::reserves::{independent_reserve, tension_coefficient};

/// Critical Path Method engine.
///
/// Holds only configuration; every [`CpmEngine::compute`] call is independent
/// and may run concurrently with others.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpmEngine {
    reserve_rule: IndependentReserveRule,
    verbosity: u8,
}

impl CpmEngine {
    pub fn new(config: &CpmConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            reserve_rule: config.reserve_rule()?,
            verbosity: config.verbosity,
        })
    }

    pub fn reserve_rule(&self) -> IndependentReserveRule {
        self.reserve_rule
    }

    /// Compute early/late times, reserves, tension coefficients and the
    /// critical path of `graph`.
    ///
    /// All-or-nothing: any invalid input yields an error and no partial result.
    pub fn compute(&self, graph: &TaskGraph) -> Result<ScheduleResults, InvalidGraphError> {
        let verbosity = self.verbosity;
        let index = GraphIndex::build(graph)?;
        let order = index.topological_order()?;

        log_phases!(verbosity, "CPM: {} tasks", index.len());
        log_debug!(
            verbosity,
            "  topological order: {:?}",
            order.iter().map(|&t| index.id(t)).collect::<Vec<_>>()
        );

        let (mut timings, total_time) = forward_pass(&index, &order, verbosity)?;
        backward_pass(&index, &order, &mut timings, total_time, verbosity);

        let tasks: Vec<TaskSchedule> = timings
            .iter()
            .enumerate()
            .map(|(idx, timing)| {
                let total_reserve = timing.total_reserve();
                debug_assert!(
                    total_reserve >= 0,
                    "negative reserve for {}",
                    index.id(idx as TaskIdx)
                );
                let duration = index.durations[idx];

                TaskSchedule {
                    task_id: index.id(idx as TaskIdx).to_string(),
                    duration,
                    predecessors: index.predecessors[idx]
                        .iter()
                        .map(|&pred| index.id(pred).to_string())
                        .collect(),
                    early_start: timing.early_start,
                    early_finish: timing.early_finish,
                    late_start: timing.late_start,
                    late_finish: timing.late_finish,
                    total_reserve,
                    independent_reserve: independent_reserve(
                        &index,
                        &timings,
                        idx as TaskIdx,
                        self.reserve_rule,
                    ),
                    tension_coefficient: tension_coefficient(total_reserve, duration),
                }
            })
            .collect();

        let critical_path: Vec<String> = order
            .iter()
            .filter(|&&task| timings[task as usize].is_critical())
            .map(|&task| index.id(task).to_string())
            .collect();

        log_phases!(
            verbosity,
            "CPM: total time {}, critical path {}",
            total_time,
            critical_path.join(" -> ")
        );

        Ok(ScheduleResults::new(tasks, total_time, critical_path))
    }
}

/// Compute a schedule with the default configuration.
pub fn compute(graph: &TaskGraph) -> Result<ScheduleResults, InvalidGraphError> {
    CpmEngine::default().compute(graph)
}
