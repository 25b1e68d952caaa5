use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};
use crate::geometry::Point;
use crate::stroke::{PathNode, Stroke, TRANSPARENT};

/// Pixel range a brush width slider may produce
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushWidthLimits {
    pub min_px: f64,
    pub max_px: f64,
}

impl Default for BrushWidthLimits {
    fn default() -> Self {
        Self {
            min_px: 1.0,
            max_px: 64.0,
        }
    }
}

/// A brush width shared by every brush cloned from the same cell.
///
/// Changing the width through one handle changes it for all of them, which is
/// how every pen of a picker tracks one width slider. The width is stored
/// normalized to the canvas width.
#[derive(Debug, Clone)]
pub struct SharedBrushSize(Arc<Mutex<f64>>);

impl SharedBrushSize {
    pub fn new(size: f64) -> Self {
        Self(Arc::new(Mutex::new(size)))
    }

    pub fn get(&self) -> f64 {
        *self.0.lock()
    }

    pub fn set(&self, size: f64) {
        *self.0.lock() = size;
    }

    /// Clamps `px` into `limits`, stores it normalized to `canvas_width` and
    /// returns the stored value. A NaN slider value falls to the minimum; an
    /// inverted range resolves to `max_px`.
    pub fn set_pixels(&self, px: f64, canvas_width: u32, limits: &BrushWidthLimits) -> f64 {
        let px = if px.is_nan() { limits.min_px } else { px };
        let clamped = px.max(limits.min_px).min(limits.max_px);
        let normalized = clamped / f64::from(canvas_width.max(1));
        self.set(normalized);
        normalized
    }

    /// True when both handles point at the same cell
    pub fn shares_cell_with(&self, other: &SharedBrushSize) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Produces strokes with the brush's current width and color baked in
#[derive(Debug, Clone)]
pub struct Brush {
    size: SharedBrushSize,
    color: u32,
    is_eraser: bool,
}

impl Brush {
    pub fn pen(color: u32, size: SharedBrushSize) -> Self {
        Self {
            size,
            color,
            is_eraser: false,
        }
    }

    pub fn eraser(size: SharedBrushSize) -> Self {
        Self {
            size,
            color: TRANSPARENT,
            is_eraser: true,
        }
    }

    pub fn size(&self) -> f64 {
        self.size.get()
    }

    pub fn size_cell(&self) -> &SharedBrushSize {
        &self.size
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    /// Erasers keep their transparent color and return `false`
    pub fn set_color(&mut self, color: u32) -> bool {
        if self.is_eraser {
            return false;
        }
        self.color = color;
        true
    }

    pub fn is_eraser(&self) -> bool {
        self.is_eraser
    }

    /// New stroke anchored at the normalized point `first`
    pub fn create_stroke(&self, first: Point) -> Stroke {
        Stroke::new(self.color, self.size(), self.is_eraser, PathNode::Line(first))
    }
}

/// Which brush of a set is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushChoice {
    Pen(usize),
    Eraser,
}

impl Default for BrushChoice {
    fn default() -> Self {
        BrushChoice::Pen(0)
    }
}

/// A picker's worth of pens sharing one width cell, plus an eraser that owns
/// its own cell.
#[derive(Debug, Clone)]
pub struct BrushSet {
    pens: Vec<Brush>,
    eraser: Brush,
}

impl BrushSet {
    pub fn new(colors: &[u32], pen_size: f64, eraser_size: f64) -> SketchResult<Self> {
        if colors.is_empty() {
            return Err(SketchError::NoBrushes);
        }
        let shared = SharedBrushSize::new(pen_size);
        let pens = colors
            .iter()
            .map(|&color| Brush::pen(color, shared.clone()))
            .collect();
        Ok(Self {
            pens,
            eraser: Brush::eraser(SharedBrushSize::new(eraser_size)),
        })
    }

    pub fn pens(&self) -> &[Brush] {
        &self.pens
    }

    pub fn pen(&self, index: usize) -> SketchResult<&Brush> {
        self.pens.get(index).ok_or(SketchError::BrushOutOfRange {
            index,
            len: self.pens.len(),
        })
    }

    pub fn eraser(&self) -> &Brush {
        &self.eraser
    }

    pub fn brush(&self, choice: BrushChoice) -> SketchResult<&Brush> {
        match choice {
            BrushChoice::Pen(index) => self.pen(index),
            BrushChoice::Eraser => Ok(&self.eraser),
        }
    }

    /// The width cell every pen in this set shares
    pub fn pen_size(&self) -> &SharedBrushSize {
        // pens is never empty
        self.pens[0].size_cell()
    }

    pub fn eraser_size(&self) -> &SharedBrushSize {
        self.eraser.size_cell()
    }
}
