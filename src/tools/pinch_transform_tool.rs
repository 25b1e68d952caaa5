use log::{debug, warn};

use crate::geometry::transform::wrap_degrees;
use crate::geometry::{AffineTransform, Point};

/// Pointer vectors shorter than this are treated as coincident fingers
const DEGENERATE_LENGTH: f64 = 1e-6;

/// Incremental change of one pinch relative to its start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchDelta {
    /// Pivot displacement in parent space
    pub translation: Point,
    /// Signed rotation in degrees, within (-180, 180]
    pub rotation_degrees: f64,
    /// Uniform scale factor
    pub scale: f64,
}

impl PinchDelta {
    pub const NONE: PinchDelta = PinchDelta {
        translation: Point::ZERO,
        rotation_degrees: 0.0,
        scale: 1.0,
    };
}

#[derive(Debug, Clone, Copy)]
struct PinchState {
    start_transform: AffineTransform,
    start_pivot: Point,
    start_pivot_canvas: Point,
    start_vector: Point,
    current: AffineTransform,
}

/// Derives the canvas transform from two-finger motion.
///
/// Transforms map canvas space to parent space. The canvas point that sat under
/// the fingers' midpoint at pinch start stays under the midpoint for every
/// update.
#[derive(Debug, Default)]
pub struct PinchTransformTool {
    state: Option<PinchState>,
}

impl PinchTransformTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Captures the start of a pinch. `pointers` are in parent space.
    pub fn begin(&mut self, start_transform: AffineTransform, pointers: [Point; 2]) {
        let start_pivot = pointers[0].midpoint(pointers[1]);
        let start_pivot_canvas = match start_transform.invert() {
            Some(inverse) => inverse.map_point(start_pivot),
            None => {
                warn!("Pinch started on a singular transform");
                start_pivot
            }
        };
        debug!("Pinch pivot {:?} (canvas {:?})", start_pivot, start_pivot_canvas);
        self.state = Some(PinchState {
            start_transform,
            start_pivot,
            start_pivot_canvas,
            start_vector: pointers[1] - pointers[0],
            current: start_transform,
        });
    }

    /// Computes the transform for the current finger positions. Returns `None`
    /// when no pinch is in progress.
    pub fn update(&mut self, pointers: [Point; 2]) -> Option<AffineTransform> {
        let state = self.state.as_mut()?;
        let delta = pinch_delta(state.start_pivot, state.start_vector, pointers);

        let next = state
            .start_transform
            .pre_scale_about(delta.scale, state.start_pivot_canvas)
            .pre_rotate_about(delta.rotation_degrees, state.start_pivot_canvas)
            .post_translate(delta.translation.x, delta.translation.y);

        if !next.is_finite() {
            warn!("Discarding non-finite pinch transform");
            return Some(state.current);
        }
        state.current = next;
        Some(next)
    }

    /// Ends the pinch, returning the last transform computed for it
    pub fn end(&mut self) -> Option<AffineTransform> {
        self.state.take().map(|state| state.current)
    }
}

/// Translation, rotation and scale between the start pair and `pointers`.
/// Coincident fingers at either end yield no scale and no rotation.
pub fn pinch_delta(start_pivot: Point, start_vector: Point, pointers: [Point; 2]) -> PinchDelta {
    let stop_pivot = pointers[0].midpoint(pointers[1]);
    let stop_vector = pointers[1] - pointers[0];
    let translation = stop_pivot - start_pivot;

    let start_length = start_vector.length();
    let stop_length = stop_vector.length();
    if start_length < DEGENERATE_LENGTH || stop_length < DEGENERATE_LENGTH {
        return PinchDelta {
            translation,
            ..PinchDelta::NONE
        };
    }

    PinchDelta {
        translation,
        rotation_degrees: wrap_degrees(stop_vector.angle_degrees() - start_vector.angle_degrees()),
        scale: stop_length / start_length,
    }
}
