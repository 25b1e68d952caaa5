use std::collections::VecDeque;

/// State to restore after an undo
#[derive(Debug, PartialEq)]
pub enum Restore<'a, T> {
    /// The checkpoint now on top of the undo stack
    Snapshot(&'a T),
    /// The undo stack is empty; restore the state from before the first checkpoint
    Baseline,
}

/// Bounded linear undo/redo history over immutable snapshots.
///
/// Any new push clears the redo stack. When a maximum depth is set the oldest
/// checkpoints are dropped first.
#[derive(Debug, Clone)]
pub struct UndoRedoHistory<T> {
    /// Snapshots that can be undone, most recent at the back
    undo_stack: VecDeque<T>,
    /// Snapshots that can be redone, most recent at the back
    redo_stack: Vec<T>,
    max_depth: Option<usize>,
}

impl<T> Default for UndoRedoHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UndoRedoHistory<T> {
    /// Creates an unbounded history
    pub fn new() -> Self {
        Self::with_max_depth(None)
    }

    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Record a checkpoint; invalidates everything that could be redone.
    ///
    /// Returns the newest checkpoint dropped to respect the depth limit. That
    /// snapshot is the state a full undo now goes back to.
    pub fn push(&mut self, snapshot: T) -> Option<T> {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
        let mut evicted = None;
        if let Some(max) = self.max_depth {
            while self.undo_stack.len() > max {
                evicted = self.undo_stack.pop_front();
            }
        }
        evicted
    }

    /// Moves the latest checkpoint onto the redo stack and returns the state to
    /// restore. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Restore<'_, T>> {
        let undone = self.undo_stack.pop_back()?;
        self.redo_stack.push(undone);
        Some(match self.undo_stack.back() {
            Some(top) => Restore::Snapshot(top),
            None => Restore::Baseline,
        })
    }

    /// Moves the latest undone checkpoint back onto the undo stack and returns
    /// it. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let redone = self.redo_stack.pop()?;
        self.undo_stack.push_back(redone);
        self.undo_stack.back()
    }

    /// Undoes every checkpoint. Existing redo entries are kept beneath the newly
    /// undone ones. Returns how many checkpoints moved.
    pub fn undo_all(&mut self) -> usize {
        let moved = self.undo_stack.len();
        while let Some(undone) = self.undo_stack.pop_back() {
            self.redo_stack.push(undone);
        }
        moved
    }

    /// Wipes both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn size_of_undo(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn size_of_redo(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The checkpoint that reflects the current state, if any
    pub fn current(&self) -> Option<&T> {
        self.undo_stack.back()
    }
}
