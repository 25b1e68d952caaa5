use serde::{Deserialize, Serialize};

use crate::geometry::AffineTransform;
use crate::input::GestureEvent;
use crate::stroke::Stroke;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawStrokeKind {
    Start,
    Drawing,
    Stop,
}

/// Progress report from stroke drawing, borrowed from the live sketch.
///
/// `from_index` is the first node of `active` still to be drawn for `Start` and
/// `Drawing`, and the index of the committed stroke in `strokes` for a
/// committing `Stop`. `model_changed` is true only when the sketch's stroke
/// list itself changed.
#[derive(Debug, Clone, Copy)]
pub struct DrawStrokeEvent<'a> {
    pub kind: DrawStrokeKind,
    pub strokes: &'a [Stroke],
    pub active: Option<&'a Stroke>,
    pub from_index: usize,
    pub model_changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoRedoEvent {
    pub undo_count: usize,
    pub redo_count: usize,
}

/// Owned notifications broadcast on the event bus, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Gesture(GestureEvent),
    StrokeDrawn {
        kind: DrawStrokeKind,
        from_index: usize,
        model_changed: bool,
        stroke_count: usize,
    },
    TransformChanged(AffineTransform),
    UndoRedo(UndoRedoEvent),
    /// The stroke list was replaced by undo, redo or erase
    StrokesRestored {
        stroke_count: usize,
    },
}

impl From<&DrawStrokeEvent<'_>> for EditorEvent {
    fn from(event: &DrawStrokeEvent<'_>) -> Self {
        EditorEvent::StrokeDrawn {
            kind: event.kind,
            from_index: event.from_index,
            model_changed: event.model_changed,
            stroke_count: event.strokes.len(),
        }
    }
}
