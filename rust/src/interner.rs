//! Task id interning.
//!
//! Task ids arrive as strings; the passes work on dense integer indices so
//! every per-task quantity can live in a plain `Vec`.

use rustc_hash::FxHashMap;

/// Interned task index (u32 for compact adjacency lists).
pub type TaskIdx = u32;

/// Bidirectional mapping between task id strings and dense indices.
///
/// Indices are handed out in first-seen order, so for a graph the index of a
/// task is its declaration position.
#[derive(Debug, Clone)]
pub struct TaskIdInterner {
    to_idx: FxHashMap<String, TaskIdx>,
    from_idx: Vec<String>,
}

impl TaskIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Intern an id. Returns `(index, newly_inserted)`.
    pub fn intern(&mut self, id: &str) -> (TaskIdx, bool) {
        if let Some(&idx) = self.to_idx.get(id) {
            return (idx, false);
        }
        let idx = self.from_idx.len() as TaskIdx;
        self.from_idx.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        (idx, true)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }

    /// Resolve an index back to its id.
    ///
    /// Indices only come from this interner, so an out-of-range index is a bug.
    #[inline]
    pub fn resolve(&self, idx: TaskIdx) -> &str {
        &self.from_idx[idx as usize]
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }
}

impl Default for TaskIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
