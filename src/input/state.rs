use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Stable identifier of one finger for the life of a gesture
pub type PointerId = u32;

/// Lifecycle phase of a raw touch sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    /// First finger touched down
    Down,
    /// An additional finger touched down
    PointerDown,
    Move,
    /// A finger lifted while others remain
    PointerUp,
    /// The last finger lifted
    Up,
    Cancel,
}

/// A single raw pointer sample, in the recognizer's input (parent) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub pointer_id: PointerId,
    pub position: Point,
    pub phase: TouchPhase,
    pub timestamp_ms: u64,
}

impl TouchSample {
    pub fn new(pointer_id: PointerId, x: f64, y: f64, phase: TouchPhase, timestamp_ms: u64) -> Self {
        Self {
            pointer_id,
            position: Point::new(x, y),
            phase,
            timestamp_ms,
        }
    }
}
