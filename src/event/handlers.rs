use log::debug;

use crate::command::history::{Restore, UndoRedoHistory};
use crate::event::{DrawStrokeEvent, DrawStrokeKind, UndoRedoEvent};
use crate::stroke::Stroke;

/// Watches stroke drawing and records stroke-list checkpoints for undo/redo.
///
/// The baseline is the stroke list a full undo returns to. It starts as the
/// list the handler was created with and moves forward whenever the depth
/// limit drops the oldest checkpoint.
#[derive(Debug, Default)]
pub struct UndoRedoEventHandler {
    history: UndoRedoHistory<Vec<Stroke>>,
    baseline: Vec<Stroke>,
}

impl UndoRedoEventHandler {
    /// Creates a new undo/redo event handler; `None` keeps unlimited history
    pub fn new(max_depth: Option<usize>, baseline: Vec<Stroke>) -> Self {
        Self {
            history: UndoRedoHistory::with_max_depth(max_depth),
            baseline,
        }
    }

    /// Get a reference to the checkpoint history
    pub fn history(&self) -> &UndoRedoHistory<Vec<Stroke>> {
        &self.history
    }

    pub fn baseline(&self) -> &[Stroke] {
        &self.baseline
    }

    /// Records a checkpoint when a stroke commit changed a non-empty stroke
    /// list. The list is copied; the sketch keeps mutating its own.
    /// Returns whether a checkpoint was pushed.
    pub fn on_spying_strokes_update(&mut self, event: &DrawStrokeEvent<'_>) -> bool {
        if event.kind != DrawStrokeKind::Stop || !event.model_changed || event.strokes.is_empty() {
            return false;
        }
        self.checkpoint(event.strokes.to_vec());
        true
    }

    /// Pushes an explicit checkpoint, e.g. for an erased canvas
    pub fn checkpoint(&mut self, strokes: Vec<Stroke>) {
        debug!("History checkpoint with {} strokes", strokes.len());
        if let Some(evicted) = self.history.push(strokes) {
            debug!("Depth limit reached; baseline now has {} strokes", evicted.len());
            self.baseline = evicted;
        }
    }

    /// Steps back one checkpoint and returns the stroke list to restore
    pub fn undo(&mut self) -> Option<Vec<Stroke>> {
        match self.history.undo()? {
            Restore::Snapshot(strokes) => Some(strokes.clone()),
            Restore::Baseline => Some(self.baseline.clone()),
        }
    }

    /// Reapplies the last undone checkpoint and returns its stroke list
    pub fn redo(&mut self) -> Option<Vec<Stroke>> {
        self.history.redo().cloned()
    }

    /// Undoes every checkpoint and returns the baseline, or `None` when there
    /// was nothing to undo
    pub fn undo_all(&mut self) -> Option<Vec<Stroke>> {
        match self.history.undo_all() {
            0 => None,
            _ => Some(self.baseline.clone()),
        }
    }

    /// Forgets every checkpoint and starts over from `baseline`
    pub fn reset(&mut self, baseline: Vec<Stroke>) {
        self.history.clear();
        self.baseline = baseline;
    }

    pub fn counts(&self) -> UndoRedoEvent {
        UndoRedoEvent {
            undo_count: self.history.size_of_undo(),
            redo_count: self.history.size_of_redo(),
        }
    }
}
