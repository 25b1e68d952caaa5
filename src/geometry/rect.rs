use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned rectangle. `left <= right` and `top <= bottom` for any rect
/// built through the constructors below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// The normalized canvas area, [0,1] x [0,1]
    pub const UNIT: Rect = Rect {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    pub fn from_min_max(min: Point, max: Point) -> Self {
        Self {
            left: min.x.min(max.x),
            top: min.y.min(max.y),
            right: min.x.max(max.x),
            bottom: min.y.max(max.y),
        }
    }

    /// A zero-area rect sitting on a single point
    pub fn from_point(point: Point) -> Self {
        Self {
            left: point.x,
            top: point.y,
            right: point.x,
            bottom: point.y,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Grows the rect just enough to include `point`
    pub fn union_point(&self, point: Point) -> Rect {
        Rect {
            left: self.left.min(point.x),
            top: self.top.min(point.y),
            right: self.right.max(point.x),
            bottom: self.bottom.max(point.y),
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Expands each horizontal edge by `dx` and each vertical edge by `dy`
    pub fn expand(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            left: self.left - dx,
            top: self.top - dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Clamps every edge into `bounds`
    pub fn clamp_to(&self, bounds: &Rect) -> Rect {
        Rect {
            left: self.left.clamp(bounds.left, bounds.right),
            top: self.top.clamp(bounds.top, bounds.bottom),
            right: self.right.clamp(bounds.left, bounds.right),
            bottom: self.bottom.clamp(bounds.top, bounds.bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_point_only_grows() {
        let rect = Rect::from_point(Point::new(0.5, 0.5));
        let grown = rect.union_point(Point::new(0.2, 0.8));
        assert!(grown.contains_rect(&rect));
        assert_eq!(grown.left, 0.2);
        assert_eq!(grown.bottom, 0.8);

        let same = grown.union_point(Point::new(0.4, 0.6));
        assert_eq!(same, grown);
    }

    #[test]
    fn test_clamp_to_unit() {
        let rect = Rect::from_min_max(Point::new(-0.1, 0.3), Point::new(1.4, 0.9));
        let clamped = rect.clamp_to(&Rect::UNIT);
        assert_eq!(clamped.left, 0.0);
        assert_eq!(clamped.right, 1.0);
        assert_eq!(clamped.top, 0.3);
        assert!(Rect::UNIT.contains_rect(&clamped));
    }
}
