use sketch_input::command::{Restore, UndoRedoHistory};
use sketch_input::event::{DrawStrokeEvent, DrawStrokeKind, UndoRedoEventHandler};
use sketch_input::geometry::Point;
use sketch_input::stroke::{PathNode, Stroke};

fn dot(x: f64) -> Stroke {
    Stroke::new(0xFF00_0000, 0.01, false, PathNode::Line(Point::new(x, 0.5)))
}

fn stop_event(strokes: &[Stroke], model_changed: bool) -> DrawStrokeEvent<'_> {
    DrawStrokeEvent {
        kind: DrawStrokeKind::Stop,
        strokes,
        active: strokes.last(),
        from_index: strokes.len().saturating_sub(1),
        model_changed,
    }
}

#[test]
fn test_undo_then_redo_restores_state() {
    let mut history = UndoRedoHistory::new();
    history.push(1);
    history.push(2);
    history.push(3);

    assert_eq!(history.undo(), Some(Restore::Snapshot(&2)));
    assert_eq!(history.redo(), Some(&3));
    assert_eq!(history.size_of_undo(), 3);
    assert_eq!(history.size_of_redo(), 0);
}

#[test]
fn test_push_invalidates_redo() {
    let mut history = UndoRedoHistory::new();
    history.push("a");
    history.push("b");
    history.undo();
    assert!(history.can_redo());

    history.push("c");
    assert!(!history.can_redo());
    assert_eq!(history.redo(), None);
    assert_eq!(history.current(), Some(&"c"));
}

#[test]
fn test_undo_past_first_checkpoint_restores_baseline() {
    let mut history = UndoRedoHistory::new();
    history.push(10);
    assert_eq!(history.undo(), Some(Restore::Baseline));
    assert_eq!(history.undo(), None);
    assert_eq!(history.redo(), Some(&10));
}

#[test]
fn test_depth_limit_drops_oldest() {
    let mut history = UndoRedoHistory::with_max_depth(Some(2));
    for n in 0..5 {
        history.push(n);
    }
    assert_eq!(history.size_of_undo(), 2);
    assert_eq!(history.undo(), Some(Restore::Snapshot(&3)));
    assert_eq!(history.undo(), Some(Restore::Baseline));
    assert_eq!(history.undo(), None);
}

#[test]
fn test_undo_all_keeps_everything_redoable() {
    let mut history = UndoRedoHistory::new();
    history.push(1);
    history.push(2);
    history.push(3);
    history.undo();

    assert_eq!(history.undo_all(), 2);
    assert_eq!(history.size_of_undo(), 0);
    assert_eq!(history.size_of_redo(), 3);
    assert_eq!(history.redo(), Some(&1));
    assert_eq!(history.redo(), Some(&2));
    assert_eq!(history.redo(), Some(&3));
}

#[test]
fn test_clear_wipes_both_stacks() {
    let mut history = UndoRedoHistory::new();
    history.push(1);
    history.push(2);
    history.undo();
    history.clear();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn test_handler_checkpoints_only_committed_stops() {
    let mut handler = UndoRedoEventHandler::new(None, Vec::new());
    let strokes = vec![dot(0.1)];

    let drawing = DrawStrokeEvent {
        kind: DrawStrokeKind::Drawing,
        ..stop_event(&strokes, true)
    };
    assert!(!handler.on_spying_strokes_update(&drawing));
    assert!(!handler.on_spying_strokes_update(&stop_event(&strokes, false)));
    assert!(!handler.on_spying_strokes_update(&stop_event(&[], true)));
    assert!(handler.on_spying_strokes_update(&stop_event(&strokes, true)));

    let counts = handler.counts();
    assert_eq!(counts.undo_count, 1);
    assert_eq!(counts.redo_count, 0);
}

#[test]
fn test_checkpoints_are_independent_copies() {
    let mut handler = UndoRedoEventHandler::new(None, Vec::new());
    let mut strokes = vec![dot(0.1)];
    handler.on_spying_strokes_update(&stop_event(&strokes, true));

    strokes[0].add_node(PathNode::Line(Point::new(0.9, 0.9)));
    strokes.push(dot(0.2));

    let saved = handler.history().current().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].len(), 1);
}
