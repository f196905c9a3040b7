//! Task graph snapshot, validation and topological ordering.

use rustc_hash::FxHashSet;
use std::collections::{HashMap, VecDeque};
use std::hash::BuildHasher;
use thiserror::Error;

use crate::interner::{TaskIdInterner, TaskIdx};
use crate::models::Task;

/// Reasons a task graph cannot be scheduled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidGraphError {
    #[error("Task graph is empty")]
    EmptyGraph,
    #[error("Task {task} has negative duration {duration}")]
    NegativeDuration { task: String, duration: i64 },
    #[error("Task {0} is defined more than once")]
    DuplicateTask(String),
    #[error("Task {task} depends on undefined task {predecessor}")]
    DanglingReference { task: String, predecessor: String },
    #[error("Dependencies given for undefined task {0}")]
    UnknownTask(String),
    /// Lists every task Kahn's algorithm could not order: the cycle members
    /// and anything downstream of them, in declaration order.
    #[error("Circular dependency detected, unresolved tasks: {}", .tasks.join(", "))]
    Cycle { tasks: Vec<String> },
    #[error("Finish time of task {task} exceeds the representable range")]
    DurationOverflow { task: String },
}

/// An ordered, read-only snapshot of the tasks to schedule.
///
/// Declaration order is kept: results are reported in it and it breaks ties
/// in the topological order. It is never assumed to be topological itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskGraph {
    tasks: Vec<Task>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Builder-style append.
    pub fn with_task<I, S>(mut self, id: impl Into<String>, duration: i64, predecessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks.push(Task::new(id, duration, predecessors));
        self
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Build a graph from a duration table and a predecessor table.
    ///
    /// `durations` fixes the declaration order. Tasks missing from
    /// `dependencies` have no predecessors. A `dependencies` key without a
    /// duration is rejected.
    pub fn from_maps<D, S>(
        durations: D,
        dependencies: &HashMap<String, Vec<String>, S>,
    ) -> Result<Self, InvalidGraphError>
    where
        D: IntoIterator<Item = (String, i64)>,
        S: BuildHasher,
    {
        let tasks: Vec<Task> = durations
            .into_iter()
            .map(|(id, duration)| {
                let predecessors = dependencies.get(&id).cloned().unwrap_or_default();
                Task {
                    id,
                    duration,
                    predecessors,
                }
            })
            .collect();

        let defined: FxHashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let mut unknown: Vec<&String> = dependencies
            .keys()
            .filter(|id| !defined.contains(id.as_str()))
            .collect();
        // HashMap iteration order is arbitrary; report the smallest id
        unknown.sort();
        if let Some(id) = unknown.first() {
            return Err(InvalidGraphError::UnknownTask((*id).clone()));
        }

        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl From<Vec<Task>> for TaskGraph {
    fn from(tasks: Vec<Task>) -> Self {
        Self::from_tasks(tasks)
    }
}

/// Validated, integer-indexed view of a [`TaskGraph`].
///
/// Index `i` is the `i`-th declared task. Predecessor lists are deduplicated
/// (first occurrence kept); successor lists are in declaration order of the
/// successor.
#[derive(Debug, Clone)]
pub(crate) struct GraphIndex {
    pub interner: TaskIdInterner,
    pub durations: Vec<i64>,
    pub predecessors: Vec<Vec<TaskIdx>>,
    pub successors: Vec<Vec<TaskIdx>>,
}

impl GraphIndex {
    /// Validate the graph and build the index. Cycles are detected later by
    /// [`GraphIndex::topological_order`].
    pub fn build(graph: &TaskGraph) -> Result<Self, InvalidGraphError> {
        if graph.is_empty() {
            return Err(InvalidGraphError::EmptyGraph);
        }

        if let Some(task) = graph.tasks().iter().find(|t| t.duration < 0) {
            return Err(InvalidGraphError::NegativeDuration {
                task: task.id.clone(),
                duration: task.duration,
            });
        }

        let n = graph.len();
        let mut interner = TaskIdInterner::with_capacity(n);
        for task in graph.tasks() {
            let (_, inserted) = interner.intern(&task.id);
            if !inserted {
                return Err(InvalidGraphError::DuplicateTask(task.id.clone()));
            }
        }

        let mut durations = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<TaskIdx>> = Vec::with_capacity(n);
        let mut successors: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];

        for (idx, task) in graph.tasks().iter().enumerate() {
            let mut preds: Vec<TaskIdx> = Vec::with_capacity(task.predecessors.len());
            for pred_id in &task.predecessors {
                let Some(pred) = interner.get(pred_id) else {
                    return Err(InvalidGraphError::DanglingReference {
                        task: task.id.clone(),
                        predecessor: pred_id.clone(),
                    });
                };
                if !preds.contains(&pred) {
                    preds.push(pred);
                    successors[pred as usize].push(idx as TaskIdx);
                }
            }
            durations.push(task.duration);
            predecessors.push(preds);
        }

        Ok(Self {
            interner,
            durations,
            predecessors,
            successors,
        })
    }

    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn id(&self, idx: TaskIdx) -> &str {
        self.interner.resolve(idx)
    }

    /// Topological order using Kahn's algorithm.
    ///
    /// Predecessors come before successors. Ready tasks are released in
    /// declaration order, so the result is fully determined by the graph.
    pub fn topological_order(&self) -> Result<Vec<TaskIdx>, InvalidGraphError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();

        let mut queue: VecDeque<TaskIdx> = (0..n)
            .filter(|&idx| in_degree[idx] == 0)
            .map(|idx| idx as TaskIdx)
            .collect();

        let mut order: Vec<TaskIdx> = Vec::with_capacity(n);

        while let Some(task) = queue.pop_front() {
            order.push(task);

            for &succ in &self.successors[task as usize] {
                let degree = &mut in_degree[succ as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() != n {
            let tasks = (0..n)
                .filter(|&idx| in_degree[idx] > 0)
                .map(|idx| self.id(idx as TaskIdx).to_string())
                .collect();
            return Err(InvalidGraphError::Cycle { tasks });
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, duration: i64, deps: &[&str]) -> Task {
        Task::new(id, duration, deps.iter().copied())
    }

    fn order_ids(index: &GraphIndex) -> Vec<String> {
        index
            .topological_order()
            .unwrap()
            .into_iter()
            .map(|idx| index.id(idx).to_string())
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        let result = GraphIndex::build(&TaskGraph::new());
        assert_eq!(result.unwrap_err(), InvalidGraphError::EmptyGraph);
    }

    #[test]
    fn test_negative_duration() {
        let graph = TaskGraph::from_tasks(vec![
            make_task("a", 2, &[]),
            make_task("b", -1, &["a"]),
        ]);
        assert_eq!(
            GraphIndex::build(&graph).unwrap_err(),
            InvalidGraphError::NegativeDuration {
                task: "b".to_string(),
                duration: -1,
            }
        );
    }

    #[test]
    fn test_duplicate_task() {
        let graph = TaskGraph::from_tasks(vec![
            make_task("a", 2, &[]),
            make_task("a", 3, &[]),
        ]);
        assert_eq!(
            GraphIndex::build(&graph).unwrap_err(),
            InvalidGraphError::DuplicateTask("a".to_string())
        );
    }

    #[test]
    fn test_dangling_reference() {
        let graph = TaskGraph::from_tasks(vec![
            make_task("a", 2, &[]),
            make_task("b", 3, &["ghost"]),
        ]);
        assert_eq!(
            GraphIndex::build(&graph).unwrap_err(),
            InvalidGraphError::DanglingReference {
                task: "b".to_string(),
                predecessor: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_predecessors_collapse() {
        let graph = TaskGraph::from_tasks(vec![
            make_task("a", 1, &[]),
            make_task("b", 1, &[]),
            make_task("c", 1, &["b", "a", "b"]),
        ]);
        let index = GraphIndex::build(&graph).unwrap();

        assert_eq!(index.predecessors[2], vec![1, 0]);
        assert_eq!(index.successors[1], vec![2]);
        assert_eq!(index.successors[0], vec![2]);
    }

    #[test]
    fn test_two_task_cycle() {
        let graph = TaskGraph::from_tasks(vec![
            make_task("b1", 1, &["b2"]),
            make_task("b2", 1, &["b1"]),
        ]);
        let index = GraphIndex::build(&graph).unwrap();

        assert_eq!(
            index.topological_order().unwrap_err(),
            InvalidGraphError::Cycle {
                tasks: vec!["b1".to_string(), "b2".to_string()],
            }
        );
    }

    #[test]
    fn test_cycle_lists_downstream_tasks() {
        // d only waits on the a <-> b loop; it cannot be ordered either
        let graph = TaskGraph::from_tasks(vec![
            make_task("start", 1, &[]),
            make_task("a", 1, &["start", "b"]),
            make_task("b", 1, &["a"]),
            make_task("d", 1, &["b"]),
        ]);
        let index = GraphIndex::build(&graph).unwrap();

        assert_eq!(
            index.topological_order().unwrap_err(),
            InvalidGraphError::Cycle {
                tasks: vec!["a".to_string(), "b".to_string(), "d".to_string()],
            }
        );
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let graph = TaskGraph::from_tasks(vec![
            make_task("start", 1, &[]),
            make_task("loop", 1, &["loop"]),
        ]);
        let index = GraphIndex::build(&graph).unwrap();

        assert_eq!(
            index.topological_order().unwrap_err(),
            InvalidGraphError::Cycle {
                tasks: vec!["loop".to_string()],
            }
        );
    }

    #[test]
    fn test_order_ignores_declaration_order() {
        // Declared backwards: c depends on b depends on a
        let graph = TaskGraph::from_tasks(vec![
            make_task("c", 1, &["b"]),
            make_task("b", 1, &["a"]),
            make_task("a", 1, &[]),
        ]);
        let index = GraphIndex::build(&graph).unwrap();

        assert_eq!(order_ids(&index), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_order_is_deterministic() {
        let graph = TaskGraph::new()
            .with_task("b1", 5, Vec::<&str>::new())
            .with_task("b2", 8, Vec::<&str>::new())
            .with_task("b3", 3, Vec::<&str>::new())
            .with_task("b4", 6, ["b1"])
            .with_task("b5", 4, ["b1"])
            .with_task("b6", 1, ["b3"])
            .with_task("b7", 2, ["b2", "b5", "b6"])
            .with_task("b8", 6, ["b2", "b5", "b6"])
            .with_task("b9", 3, ["b4", "b7"])
            .with_task("b10", 9, ["b3"])
            .with_task("b11", 7, ["b2", "b5", "b6", "b10"]);
        let index = GraphIndex::build(&graph).unwrap();

        let expected = vec!["b1", "b2", "b3", "b4", "b5", "b6", "b10", "b7", "b8", "b11", "b9"];
        assert_eq!(order_ids(&index), expected);
        assert_eq!(order_ids(&index), expected);
    }

    #[test]
    fn test_from_maps() {
        let mut dependencies = HashMap::new();
        dependencies.insert("b".to_string(), vec!["a".to_string()]);

        let graph = TaskGraph::from_maps(
            vec![("a".to_string(), 2), ("b".to_string(), 3)],
            &dependencies,
        )
        .unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.tasks()[0].is_start());
        assert_eq!(graph.tasks()[1].predecessors, vec!["a".to_string()]);
    }

    #[test]
    fn test_from_maps_unknown_task() {
        let mut dependencies = HashMap::new();
        dependencies.insert("zeta".to_string(), vec![]);
        dependencies.insert("omega".to_string(), vec!["a".to_string()]);

        let result = TaskGraph::from_maps(vec![("a".to_string(), 2)], &dependencies);
        assert_eq!(
            result.unwrap_err(),
            InvalidGraphError::UnknownTask("omega".to_string())
        );
    }
}
