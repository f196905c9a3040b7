//! Critical path calculation using forward and backward passes.

use crate::graph::{GraphIndex, InvalidGraphError};
use crate::interner::TaskIdx;
use crate::{log_debug, log_tasks};

use super::types::TaskTiming;

/// Forward pass: earliest start/finish of every task.
///
/// `order` must be a topological order of `index`. Returns the timings
/// (late fields still zero) indexed by task, and the project duration.
/// Fails if a finish time does not fit in an `i64`.
pub(crate) fn forward_pass(
    index: &GraphIndex,
    order: &[TaskIdx],
    verbosity: u8,
) -> Result<(Vec<TaskTiming>, i64), InvalidGraphError> {
    let mut timings = vec![TaskTiming::default(); index.len()];

    for &task in order {
        let idx = task as usize;

        // Earliest start = latest finish among predecessors
        let early_start = index.predecessors[idx]
            .iter()
            .map(|&pred| timings[pred as usize].early_finish)
            .max()
            .unwrap_or(0);

        let early_finish = early_start
            .checked_add(index.durations[idx])
            .ok_or_else(|| InvalidGraphError::DurationOverflow {
                task: index.id(task).to_string(),
            })?;

        let timing = &mut timings[idx];
        timing.early_start = early_start;
        timing.early_finish = early_finish;

        log_tasks!(
            verbosity,
            "  forward {}: es={} ef={}",
            index.id(task),
            timing.early_start,
            timing.early_finish
        );
    }

    let total_time = timings.iter().map(|t| t.early_finish).max().unwrap_or(0);
    Ok((timings, total_time))
}

/// Backward pass: latest start/finish of every task.
///
/// Every late finish starts at `total_time` and is tightened by each
/// successor's late start, visiting tasks in reverse topological order so a
/// task's late finish is final before it is read. Late finishes stay within
/// `[early_finish, total_time]`, so the subtraction cannot overflow.
pub(crate) fn backward_pass(
    index: &GraphIndex,
    order: &[TaskIdx],
    timings: &mut [TaskTiming],
    total_time: i64,
    verbosity: u8,
) {
    for timing in timings.iter_mut() {
        timing.late_finish = total_time;
    }

    for &task in order.iter().rev() {
        let idx = task as usize;
        let late_start = timings[idx].late_finish - index.durations[idx];
        timings[idx].late_start = late_start;

        for &pred in &index.predecessors[idx] {
            let pred_timing = &mut timings[pred as usize];
            if late_start < pred_timing.late_finish {
                log_debug!(
                    verbosity,
                    "    tighten {}: lf {} -> {} (via {})",
                    index.id(pred),
                    pred_timing.late_finish,
                    late_start,
                    index.id(task)
                );
                pred_timing.late_finish = late_start;
            }
        }

        log_tasks!(
            verbosity,
            "  backward {}: ls={} lf={}",
            index.id(task),
            timings[idx].late_start,
            timings[idx].late_finish
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TaskGraph;
    use crate::models::Task;

    fn make_task(id: &str, duration: i64, deps: &[&str]) -> Task {
        Task::new(id, duration, deps.iter().copied())
    }

    fn run_passes(tasks: Vec<Task>) -> (GraphIndex, Vec<TaskTiming>, i64) {
        let index = GraphIndex::build(&TaskGraph::from_tasks(tasks)).unwrap();
        let order = index.topological_order().unwrap();
        let (mut timings, total_time) = forward_pass(&index, &order, 0).unwrap();
        backward_pass(&index, &order, &mut timings, total_time, 0);
        (index, timings, total_time)
    }

    #[test]
    fn test_chain() {
        // a -> b -> c (all on critical path)
        let (_, timings, total_time) = run_passes(vec![
            make_task("a", 2, &[]),
            make_task("b", 3, &["a"]),
            make_task("c", 4, &["b"]),
        ]);

        assert_eq!(total_time, 9);
        assert_eq!(timings[1].early_start, 2);
        assert_eq!(timings[2].early_start, 5);
        assert!(timings.iter().all(TaskTiming::is_critical));
    }

    #[test]
    fn test_parallel_paths_with_slack() {
        // a (2) -> target (1)
        // b (5) -> target (1)
        let (_, timings, total_time) = run_passes(vec![
            make_task("a", 2, &[]),
            make_task("b", 5, &[]),
            make_task("target", 1, &["a", "b"]),
        ]);

        assert_eq!(total_time, 6);
        assert_eq!(timings[0].total_reserve(), 3);
        assert_eq!(timings[0].late_finish, 5);
        assert!(timings[1].is_critical());
        assert!(timings[2].is_critical());
    }

    #[test]
    fn test_diamond() {
        // Path via b: 2 + 3 + 1 = 6
        // Path via c: 2 + 5 + 1 = 8 (critical)
        let (_, timings, total_time) = run_passes(vec![
            make_task("a", 2, &[]),
            make_task("b", 3, &["a"]),
            make_task("c", 5, &["a"]),
            make_task("d", 1, &["b", "c"]),
        ]);

        assert_eq!(total_time, 8);
        assert_eq!(timings[1].total_reserve(), 2);
        assert!(timings[0].is_critical());
        assert!(timings[2].is_critical());
        assert!(timings[3].is_critical());
    }

    #[test]
    fn test_unrelated_sink_finishes_at_total_time() {
        // short has no successors; its late finish is the project end
        let (_, timings, total_time) = run_passes(vec![
            make_task("long", 10, &[]),
            make_task("short", 3, &[]),
        ]);

        assert_eq!(total_time, 10);
        assert_eq!(timings[1].late_finish, 10);
        assert_eq!(timings[1].late_start, 7);
    }

    #[test]
    fn test_milestones() {
        // zero-duration start and end markers
        let (_, timings, total_time) = run_passes(vec![
            make_task("kickoff", 0, &[]),
            make_task("work", 4, &["kickoff"]),
            make_task("done", 0, &["work"]),
        ]);

        assert_eq!(total_time, 4);
        assert_eq!(timings[2].early_start, 4);
        assert_eq!(timings[2].early_finish, 4);
        assert!(timings.iter().all(TaskTiming::is_critical));
    }

    #[test]
    fn test_finish_time_overflow() {
        let half = i64::MAX / 2 + 1;
        let graph = TaskGraph::from_tasks(vec![
            make_task("a", half, &[]),
            make_task("b", half, &["a"]),
        ]);
        let index = GraphIndex::build(&graph).unwrap();
        let order = index.topological_order().unwrap();

        assert_eq!(
            forward_pass(&index, &order, 0).unwrap_err(),
            InvalidGraphError::DurationOverflow {
                task: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_reverse_declaration_order() {
        let (index, timings, total_time) = run_passes(vec![
            make_task("c", 4, &["b"]),
            make_task("b", 3, &["a"]),
            make_task("a", 2, &[]),
        ]);

        assert_eq!(total_time, 9);
        let c = index.interner.get("c").unwrap() as usize;
        assert_eq!(timings[c].early_start, 5);
        assert_eq!(timings[c].late_finish, 9);
    }
}
