//! The editing session: wires raw touch input through gesture recognition into
//! stroke drawing, pinch transforms and undo/redo history.
//!
//! The `SketchSession` owns the live `Sketch` and is driven by one caller feeding
//! samples in the order they were received. Every call runs to completion;
//! nothing is scheduled or deferred.
//!
//! # Data flow
//!
//! - drag and tap gestures go to the `DrawStrokeTool`, which grows the active
//!   stroke and commits it to the sketch
//! - pinch gestures go to the `PinchTransformTool`, whose transform becomes the
//!   canvas transform used to map later gestures
//! - commits are reported to the `UndoRedoEventHandler`, which checkpoints a copy
//!   of the stroke list
//!
//! Notifications go out on the `EventBus` and, when attached, to a
//! `StrokeRenderer` and an `AnalyticsSink`.
//!
//! # Example
//!
//! ```rust,no_run
//! use sketch_input::brush::BrushSet;
//! use sketch_input::config::SketchConfig;
//! use sketch_input::document::Sketch;
//! use sketch_input::input::{TouchPhase, TouchSample};
//! use sketch_input::state::SketchSession;
//!
//! let sketch = Sketch::new(800, 600).unwrap();
//! let brushes = BrushSet::new(&[0xFF00_0000], 0.01, 0.04).unwrap();
//! let mut session = SketchSession::new(SketchConfig::default(), sketch, brushes).unwrap();
//!
//! session.handle_touch(&TouchSample::new(0, 100.0, 100.0, TouchPhase::Down, 0));
//! session.handle_touch(&TouchSample::new(0, 100.0, 100.0, TouchPhase::Up, 50));
//! assert_eq!(session.sketch().strokes().len(), 1);
//! ```

use log::{debug, info};
use thiserror::Error;

use crate::analytics::{AnalyticsSink, LogAnalytics};
use crate::brush::{BrushChoice, BrushSet};
use crate::config::{ConfigError, ConfigResult, SketchConfig};
use crate::document::Sketch;
use crate::error::SketchResult;
use crate::event::{DrawStrokeEvent, DrawStrokeKind, EditorEvent, EventBus, UndoRedoEvent, UndoRedoEventHandler};
use crate::geometry::{AffineTransform, Point};
use crate::input::{GestureEvent, GesturePhase, GestureRecognizer, PinchPointers, RecognizerState, TouchSample};
use crate::renderer::StrokeRenderer;
use crate::state::persistence::{PersistenceError, PersistenceResult, SketchRepository};
use crate::stroke::Stroke;
use crate::tools::{DrawStrokeTool, PinchTransformTool};

/// Errors raised while starting a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct SketchSession {
    config: SketchConfig,
    sketch: Sketch,
    brushes: BrushSet,
    brush_choice: BrushChoice,
    recognizer: GestureRecognizer,
    draw_tool: DrawStrokeTool,
    pinch_tool: PinchTransformTool,
    /// Canvas-to-parent transform
    canvas_transform: AffineTransform,
    history: UndoRedoEventHandler,
    event_bus: EventBus,
    renderer: Option<Box<dyn StrokeRenderer>>,
    analytics: Box<dyn AnalyticsSink>,
}

impl std::fmt::Debug for SketchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchSession")
            .field("sketch", &self.sketch.id())
            .field("strokes", &self.sketch.strokes().len())
            .field("brush_choice", &self.brush_choice)
            .field("recognizer", &self.recognizer.state())
            .field("canvas_transform", &self.canvas_transform)
            .field("history", &self.history.counts())
            .finish()
    }
}

impl SketchSession {
    /// Starts a session on `sketch`. Its existing strokes become the undo
    /// baseline. Fails if `config` does not validate.
    pub fn new(config: SketchConfig, sketch: Sketch, brushes: BrushSet) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            recognizer: GestureRecognizer::new(config.gesture_config()),
            draw_tool: DrawStrokeTool::new(config.stroke_config()),
            pinch_tool: PinchTransformTool::new(),
            history: UndoRedoEventHandler::new(config.history_depth(), sketch.strokes().to_vec()),
            canvas_transform: AffineTransform::IDENTITY,
            brush_choice: BrushChoice::default(),
            event_bus: EventBus::new(),
            renderer: None,
            analytics: Box::new(LogAnalytics),
            config,
            sketch,
            brushes,
        })
    }

    /// Starts a session on the sketch stored in `repository`
    pub fn load(
        config: SketchConfig,
        repository: &dyn SketchRepository,
        brushes: BrushSet,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self::new(config, repository.load_sketch()?, brushes)?)
    }

    pub fn with_renderer(mut self, renderer: Box<dyn StrokeRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_analytics(mut self, analytics: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    /// Copy of the sketch for saving off the edit sequence
    pub fn snapshot(&self) -> Sketch {
        self.sketch.snapshot()
    }

    pub fn save(&self, repository: &dyn SketchRepository) -> PersistenceResult<()> {
        repository.save_sketch(&self.sketch)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn brushes(&self) -> &BrushSet {
        &self.brushes
    }

    pub fn brush_choice(&self) -> BrushChoice {
        self.brush_choice
    }

    pub fn select_brush(&mut self, choice: BrushChoice) -> SketchResult<()> {
        self.brushes.brush(choice)?;
        self.brush_choice = choice;
        Ok(())
    }

    /// Sets the selected brush's width from a slider value in pixels. Pens of the
    /// set share the width, so this updates every pen at once.
    pub fn set_brush_size_px(&mut self, px: f64) -> SketchResult<f64> {
        let brush = self.brushes.brush(self.brush_choice)?;
        Ok(brush
            .size_cell()
            .set_pixels(px, self.sketch.width(), &self.config.brush_width_limits()))
    }

    pub fn set_curve_smoothing(&mut self, enabled: bool) {
        self.config.curve_smoothing = enabled;
        self.draw_tool.set_curve_smoothing(enabled);
    }

    pub fn canvas_transform(&self) -> AffineTransform {
        self.canvas_transform
    }

    /// Replaces the canvas transform, e.g. when the view resets its zoom
    pub fn set_canvas_transform(&mut self, transform: AffineTransform) {
        self.apply_transform(transform);
    }

    pub fn recognizer_state(&self) -> RecognizerState {
        self.recognizer.state()
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.draw_tool.active_stroke()
    }

    pub fn history_counts(&self) -> UndoRedoEvent {
        self.history.counts()
    }

    /// Feeds one raw sample through the pipeline and returns the gesture events
    /// it produced
    pub fn handle_touch(&mut self, sample: &TouchSample) -> Vec<GestureEvent> {
        let events = self.recognizer.handle(sample);
        for event in &events {
            self.event_bus.emit(EditorEvent::Gesture(*event));
            self.dispatch(event);
        }
        events
    }

    fn dispatch(&mut self, event: &GestureEvent) {
        match *event {
            GestureEvent::GestureStart | GestureEvent::GestureStop => {}
            GestureEvent::Drag {
                phase,
                point,
                timestamp_ms,
            } => match phase {
                GesturePhase::Start => self.begin_stroke(point, timestamp_ms),
                GesturePhase::Move => self.extend_stroke(point, timestamp_ms),
                GesturePhase::Stop => {
                    self.extend_stroke(point, timestamp_ms);
                    self.end_stroke();
                }
            },
            GestureEvent::Tap { point, .. } => self.tap_dot(point),
            GestureEvent::Pinch { phase, pointers } => self.pinch(phase, &pointers),
        }
    }

    fn begin_stroke(&mut self, point: Point, timestamp_ms: u64) {
        let Ok(brush) = self.brushes.brush(self.brush_choice) else {
            return;
        };
        let stroke = self.draw_tool.begin_stroke(&self.sketch, brush, point, timestamp_ms);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw_stroke_from(stroke, 0);
        }
        let event = DrawStrokeEvent {
            kind: DrawStrokeKind::Start,
            strokes: self.sketch.strokes(),
            active: Some(stroke),
            from_index: 0,
            model_changed: false,
        };
        self.event_bus.emit(EditorEvent::from(&event));
    }

    fn extend_stroke(&mut self, point: Point, timestamp_ms: u64) {
        if self.draw_tool.extend_stroke(&self.sketch, point, timestamp_ms).is_none() {
            return;
        }
        let Some(stroke) = self.draw_tool.active_stroke() else {
            return;
        };
        let from_index = stroke.len() - 1;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw_stroke_from(stroke, from_index);
        }
        let event = DrawStrokeEvent {
            kind: DrawStrokeKind::Drawing,
            strokes: self.sketch.strokes(),
            active: Some(stroke),
            from_index,
            model_changed: false,
        };
        self.event_bus.emit(EditorEvent::from(&event));
    }

    fn end_stroke(&mut self) {
        let drawn_nodes = self.draw_tool.active_stroke().map_or(0, Stroke::len);
        let commit = self.draw_tool.end_stroke(&mut self.sketch);

        let Some(index) = commit.index else {
            // discarded: repaint without the preview
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.erase_canvas();
                renderer.draw_strokes(commit.strokes);
            }
            let event = DrawStrokeEvent {
                kind: DrawStrokeKind::Stop,
                strokes: commit.strokes,
                active: None,
                from_index: commit.strokes.len(),
                model_changed: false,
            };
            self.event_bus.emit(EditorEvent::from(&event));
            return;
        };

        let committed = &commit.strokes[index];
        if let Some(renderer) = self.renderer.as_mut() {
            if committed.len() > drawn_nodes {
                renderer.draw_stroke_from(committed, drawn_nodes);
            }
        }
        self.analytics.log_event(
            "stroke_committed",
            &[
                ("nodes", committed.len().to_string()),
                ("eraser", committed.is_eraser().to_string()),
            ],
        );
        let event = DrawStrokeEvent {
            kind: DrawStrokeKind::Stop,
            strokes: commit.strokes,
            active: Some(committed),
            from_index: index,
            model_changed: commit.committed,
        };
        let pushed = self.history.on_spying_strokes_update(&event);
        self.event_bus.emit(EditorEvent::from(&event));
        if pushed {
            self.emit_history_counts();
        }
    }

    fn tap_dot(&mut self, point: Point) {
        let Ok(brush) = self.brushes.brush(self.brush_choice) else {
            return;
        };
        let Some(stroke) = self.draw_tool.tap_dot(&mut self.sketch, brush, point) else {
            return;
        };
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw_stroke_from(stroke, 0);
        }
        self.analytics.log_event("dot_committed", &[("eraser", stroke.is_eraser().to_string())]);

        let strokes = self.sketch.strokes();
        let event = DrawStrokeEvent {
            kind: DrawStrokeKind::Stop,
            strokes,
            active: strokes.last(),
            from_index: strokes.len() - 1,
            model_changed: true,
        };
        let pushed = self.history.on_spying_strokes_update(&event);
        self.event_bus.emit(EditorEvent::from(&event));
        if pushed {
            self.emit_history_counts();
        }
    }

    fn pinch(&mut self, phase: GesturePhase, pointers: &PinchPointers) {
        match phase {
            GesturePhase::Start => self.pinch_tool.begin(self.canvas_transform, pointers.parent),
            GesturePhase::Move => {
                if let Some(transform) = self.pinch_tool.update(pointers.parent) {
                    self.apply_transform(transform);
                }
            }
            GesturePhase::Stop => {
                if let Some(transform) = self.pinch_tool.end() {
                    let parts = transform.decompose();
                    self.analytics.log_event(
                        "canvas_pinched",
                        &[
                            ("scale", format!("{:.3}", parts.scale_x)),
                            ("rotation", format!("{:.1}", parts.rotation_degrees)),
                        ],
                    );
                }
            }
        }
    }

    fn apply_transform(&mut self, transform: AffineTransform) {
        self.canvas_transform = transform;
        self.recognizer.set_canvas_transform(transform);
        self.event_bus.emit(EditorEvent::TransformChanged(transform));
    }

    /// Restores the previous checkpoint. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        self.draw_tool.cancel_stroke();
        let Some(strokes) = self.history.undo() else {
            debug!("Nothing to undo");
            return false;
        };
        info!("Undo to {} strokes", strokes.len());
        self.analytics.log_event("undo", &[("strokes", strokes.len().to_string())]);
        self.restore(strokes);
        true
    }

    /// Reapplies the last undone checkpoint. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.draw_tool.cancel_stroke();
        let Some(strokes) = self.history.redo() else {
            debug!("Nothing to redo");
            return false;
        };
        info!("Redo to {} strokes", strokes.len());
        self.analytics.log_event("redo", &[("strokes", strokes.len().to_string())]);
        self.restore(strokes);
        true
    }

    /// Undoes every checkpoint back to the baseline; they all stay redoable
    pub fn undo_all(&mut self) -> bool {
        self.draw_tool.cancel_stroke();
        let Some(baseline) = self.history.undo_all() else {
            return false;
        };
        let redoable = self.history.counts().redo_count;
        info!("Undid all checkpoints, {} redoable", redoable);
        self.analytics.log_event("undo_all", &[("redoable", redoable.to_string())]);
        self.restore(baseline);
        true
    }

    /// Erases every stroke as one undoable step
    pub fn erase_all(&mut self) -> bool {
        self.draw_tool.cancel_stroke();
        if self.sketch.strokes().is_empty() {
            return false;
        }
        self.analytics.log_event("erase_all", &[("strokes", self.sketch.strokes().len().to_string())]);
        self.history.checkpoint(Vec::new());
        self.restore(Vec::new());
        true
    }

    /// Forgets all undo and redo checkpoints; the current strokes become the baseline
    pub fn clear_history(&mut self) {
        self.history.reset(self.sketch.strokes().to_vec());
        self.emit_history_counts();
    }

    fn restore(&mut self, strokes: Vec<Stroke>) {
        self.sketch.replace_strokes(strokes);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.erase_canvas();
            renderer.draw_strokes(self.sketch.strokes());
        }
        self.event_bus.emit(EditorEvent::StrokesRestored {
            stroke_count: self.sketch.strokes().len(),
        });
        self.emit_history_counts();
    }

    fn emit_history_counts(&self) {
        self.event_bus.emit(EditorEvent::UndoRedo(self.history.counts()));
    }
}
