use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::draw_stroke_helper::DrawStrokeHelper;
use crate::brush::Brush;
use crate::document::Sketch;
use crate::geometry::{Point, Rect};
use crate::stroke::{PathNode, Stroke};

/// Sampling and smoothing options for stroke drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Minimum distance between accepted points, in canvas pixels
    pub min_segment_length_px: f64,
    /// Minimum time between accepted points
    pub min_segment_interval_ms: u64,
    pub curve_smoothing: bool,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            min_segment_length_px: 3.0,
            min_segment_interval_ms: 8,
            curve_smoothing: false,
        }
    }
}

/// Outcome of finishing a stroke
#[derive(Debug)]
pub struct StrokeCommit<'a> {
    pub committed: bool,
    /// Index of the committed stroke in the sketch
    pub index: Option<usize>,
    /// The sketch's stroke list after the call
    pub strokes: &'a [Stroke],
}

// Transient state: the stroke being drawn
#[derive(Debug)]
struct ActiveStroke {
    stroke: Stroke,
    helper: DrawStrokeHelper,
    /// Last accepted point, canvas pixels
    last_accepted: Point,
    last_accepted_ms: u64,
    /// Most recent rejected point (normalized), flushed on commit
    pending: Option<Point>,
    intersects_canvas: bool,
}

/// Builds strokes from drag and tap input.
///
/// Points arrive in canvas-local pixels and are stored normalized to the
/// sketch size. A stroke is committed to the sketch only if at least one
/// accepted point landed inside the canvas.
#[derive(Debug, Default)]
pub struct DrawStrokeTool {
    config: StrokeConfig,
    active: Option<ActiveStroke>,
}

impl DrawStrokeTool {
    pub fn new(config: StrokeConfig) -> Self {
        Self { config, active: None }
    }

    pub fn config(&self) -> &StrokeConfig {
        &self.config
    }

    /// Switches between straight and curve mode for strokes begun afterwards
    pub fn set_curve_smoothing(&mut self, enabled: bool) {
        self.config.curve_smoothing = enabled;
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref().map(|active| &active.stroke)
    }

    /// Starts a stroke with the brush's current width and color
    pub fn begin_stroke(&mut self, sketch: &Sketch, brush: &Brush, point: Point, timestamp_ms: u64) -> &Stroke {
        if self.active.is_some() {
            debug!("Discarding unfinished stroke");
        }
        let normalized = sketch.normalize(point);
        let active = self.active.insert(ActiveStroke {
            stroke: brush.create_stroke(normalized),
            helper: DrawStrokeHelper::new(self.config.curve_smoothing, normalized),
            last_accepted: point,
            last_accepted_ms: timestamp_ms,
            pending: None,
            intersects_canvas: Rect::UNIT.contains(normalized),
        });
        &active.stroke
    }

    /// Offers a new point to the stroke in progress.
    ///
    /// The point is accepted only when enough time and distance separate it from
    /// the last accepted point. Returns the node appended, if any; in curve mode
    /// accepted points are buffered until a full segment is available.
    pub fn extend_stroke(&mut self, sketch: &Sketch, point: Point, timestamp_ms: u64) -> Option<PathNode> {
        let active = self.active.as_mut()?;
        let normalized = sketch.normalize(point);

        let elapsed = timestamp_ms.saturating_sub(active.last_accepted_ms);
        let distance = point.distance(active.last_accepted);
        if elapsed < self.config.min_segment_interval_ms
            || distance < self.config.min_segment_length_px
            || distance == 0.0
        {
            trace!("Rejected point {:?} (dt={}ms, d={:.2}px)", point, elapsed, distance);
            // a repeat of the last accepted point has nothing to flush
            if distance > 0.0 {
                active.pending = Some(normalized);
            }
            return None;
        }

        active.last_accepted = point;
        active.last_accepted_ms = timestamp_ms;
        active.pending = None;
        active.intersects_canvas |= Rect::UNIT.contains(normalized);

        let node = active.helper.push(normalized)?;
        active.stroke.add_node(node);
        Some(node)
    }

    /// Finishes the stroke in progress, committing it to the sketch if it ever
    /// touched the canvas. Buffered and rejected trailing points are flushed as
    /// final nodes before the commit.
    pub fn end_stroke<'a>(&mut self, sketch: &'a mut Sketch) -> StrokeCommit<'a> {
        let Some(mut active) = self.active.take() else {
            return StrokeCommit {
                committed: false,
                index: None,
                strokes: sketch.strokes(),
            };
        };

        if !active.intersects_canvas {
            debug!("Stroke never touched the canvas; discarded");
            return StrokeCommit {
                committed: false,
                index: None,
                strokes: sketch.strokes(),
            };
        }

        if let Some(node) = active.helper.flush() {
            active.stroke.add_node(node);
        }
        if let Some(pending) = active.pending.take().filter(|p| *p != active.stroke.last_anchor()) {
            active.stroke.add_node(PathNode::Line(pending));
        }

        let nodes = active.stroke.len();
        let index = sketch.add_stroke(active.stroke);
        info!("Committed stroke {} with {} nodes", index, nodes);
        StrokeCommit {
            committed: true,
            index: Some(index),
            strokes: sketch.strokes(),
        }
    }

    /// Drops the stroke in progress without touching the sketch
    pub fn cancel_stroke(&mut self) -> Option<Stroke> {
        self.active.take().map(|active| active.stroke)
    }

    /// Commits a single-node stroke for a tap inside the canvas
    pub fn tap_dot<'a>(&mut self, sketch: &'a mut Sketch, brush: &Brush, point: Point) -> Option<&'a Stroke> {
        let normalized = sketch.normalize(point);
        if !Rect::UNIT.contains(normalized) {
            debug!("Tap outside the canvas at {:?}", point);
            return None;
        }
        let index = sketch.add_stroke(brush.create_stroke(normalized));
        info!("Committed dot stroke {}", index);
        sketch.strokes().get(index)
    }
}
