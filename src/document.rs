use std::cell::Cell;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SketchError, SketchResult};
use crate::geometry::{Point, Rect};
use crate::stroke::Stroke;

/// The full drawing: canvas size plus an ordered list of strokes it owns.
///
/// `strokes_bound` is computed lazily and cached until the next structural
/// change to the stroke list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SketchData")]
pub struct Sketch {
    id: Uuid,
    width: u32,
    height: u32,
    strokes: Vec<Stroke>,
    #[serde(skip)]
    strokes_bound: Cell<Option<Rect>>,
}

#[derive(Deserialize)]
struct SketchData {
    id: Uuid,
    width: u32,
    height: u32,
    strokes: Vec<Stroke>,
}

impl TryFrom<SketchData> for Sketch {
    type Error = SketchError;

    fn try_from(data: SketchData) -> Result<Self, Self::Error> {
        Sketch::with_strokes(data.id, data.width, data.height, data.strokes)
    }
}

impl PartialEq for Sketch {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.width == other.width
            && self.height == other.height
            && self.strokes == other.strokes
    }
}

impl Sketch {
    /// Creates an empty sketch with a fresh id
    pub fn new(width: u32, height: u32) -> SketchResult<Self> {
        Self::with_strokes(Uuid::new_v4(), width, height, Vec::new())
    }

    pub fn with_strokes(id: Uuid, width: u32, height: u32, strokes: Vec<Stroke>) -> SketchResult<Self> {
        if width == 0 || height == 0 {
            return Err(SketchError::EmptyCanvas { width, height });
        }
        Ok(Self {
            id,
            width,
            height,
            strokes,
            strokes_bound: Cell::new(None),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Maps a canvas-local pixel position into normalized [0,1] canvas space
    pub fn normalize(&self, point: Point) -> Point {
        Point::new(point.x / f64::from(self.width), point.y / f64::from(self.height))
    }

    /// Appends a stroke and returns its index
    pub fn add_stroke(&mut self, stroke: Stroke) -> usize {
        self.strokes.push(stroke);
        self.strokes_bound.set(None);
        self.strokes.len() - 1
    }

    pub fn clear_strokes(&mut self) {
        self.strokes.clear();
        self.strokes_bound.set(None);
    }

    /// Swaps the whole stroke list, e.g. when restoring a history checkpoint
    pub fn replace_strokes(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
        self.strokes_bound.set(None);
    }

    /// An independent copy suitable for handing to persistence
    pub fn snapshot(&self) -> Sketch {
        self.clone()
    }

    /// Union of every stroke's bound, padded by half the stroke width and
    /// clamped to the canvas. `None` when there are no strokes.
    ///
    /// Widths are normalized to the canvas width, so the vertical padding is
    /// scaled by `width / height`.
    pub fn strokes_bound(&self) -> Option<Rect> {
        if let Some(cached) = self.strokes_bound.get() {
            return Some(cached);
        }

        let aspect = f64::from(self.width) / f64::from(self.height);
        let bound = self
            .strokes
            .iter()
            .map(|stroke| {
                let half = stroke.width() * 0.5;
                stroke.bound().expand(half, half * aspect)
            })
            .reduce(|acc, rect| acc.union(&rect))?
            .clamp_to(&Rect::UNIT);

        self.strokes_bound.set(Some(bound));
        Some(bound)
    }
}
