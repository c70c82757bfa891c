use crate::model::seed::Seed;

const HISTORY_LIMIT: usize = 100;

/// Which part of the dashboard a batch touched. The UI uses it to jump to the
/// affected view after undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Tasks,
    Projects,
    Documents,
    Users,
}

/// A snapshot of every collection taken before a committed batch
#[derive(Debug, Clone)]
pub struct Entry {
    pub label: &'static str,
    pub scope: Scope,
    pub snapshot: Seed,
}

/// Bounded undo/redo stacks of whole-state snapshots
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<Entry>,
    redo: Vec<Entry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state before a new batch. Clears the redo stack.
    pub fn push(&mut self, entry: Entry) {
        self.undo.push(entry);
        if self.undo.len() > HISTORY_LIMIT {
            self.undo.drain(..self.undo.len() - HISTORY_LIMIT);
        }
        self.redo.clear();
    }

    /// Pop the last snapshot, parking `current` on the redo stack.
    /// Returns the snapshot to restore.
    pub fn undo(&mut self, current: Seed) -> Option<Entry> {
        let entry = self.undo.pop()?;
        self.redo.push(Entry {
            label: entry.label,
            scope: entry.scope,
            snapshot: current,
        });
        Some(entry)
    }

    pub fn redo(&mut self, current: Seed) -> Option<Entry> {
        let entry = self.redo.pop()?;
        self.undo.push(Entry {
            label: entry.label,
            scope: entry.scope,
            snapshot: current,
        });
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn peek_undo(&self) -> Option<&Entry> {
        self.undo.last()
    }
}
