use serde::{Deserialize, Serialize};

use crate::error::SketchError;
use crate::geometry::{Point, Rect};

/// Fully transparent ARGB color, the only color an eraser stroke may carry
pub const TRANSPARENT: u32 = 0x0000_0000;

/// One segment of a stroke path. The last point is always the segment's
/// endpoint and serves as its anchor for bounds and hit computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub enum PathNode {
    /// Straight line to the endpoint
    Line(Point),
    /// Quadratic curve: control, endpoint
    Quad(Point, Point),
    /// Cubic curve: first control, second control, endpoint
    Cubic(Point, Point, Point),
}

impl PathNode {
    pub fn from_points(points: &[Point]) -> Result<Self, SketchError> {
        match *points {
            [end] => Ok(PathNode::Line(end)),
            [control, end] => Ok(PathNode::Quad(control, end)),
            [c1, c2, end] => Ok(PathNode::Cubic(c1, c2, end)),
            _ => Err(SketchError::InvalidPathNode(points.len())),
        }
    }

    pub fn anchor(&self) -> Point {
        match *self {
            PathNode::Line(end) | PathNode::Quad(_, end) | PathNode::Cubic(_, _, end) => end,
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match *self {
            PathNode::Line(end) => vec![end],
            PathNode::Quad(control, end) => vec![control, end],
            PathNode::Cubic(c1, c2, end) => vec![c1, c2, end],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PathNode::Line(_) => 1,
            PathNode::Quad(..) => 2,
            PathNode::Cubic(..) => 3,
        }
    }
}

impl TryFrom<Vec<Point>> for PathNode {
    type Error = SketchError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        PathNode::from_points(&points)
    }
}

impl From<PathNode> for Vec<Point> {
    fn from(node: PathNode) -> Self {
        node.points()
    }
}

/// One continuous drawn mark.
///
/// A stroke always holds at least one node, and its `bound` is the union of every
/// node anchor added so far. The bound is grown in place on each append and never
/// shrinks. Coordinates and width are normalized to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrokeData")]
pub struct Stroke {
    color: u32,
    width: f64,
    is_eraser: bool,
    nodes: Vec<PathNode>,
    bound: Rect,
}

/// Wire shape of a stroke, validated on the way back in
#[derive(Deserialize)]
struct StrokeData {
    color: u32,
    width: f64,
    is_eraser: bool,
    nodes: Vec<PathNode>,
}

impl TryFrom<StrokeData> for Stroke {
    type Error = SketchError;

    fn try_from(data: StrokeData) -> Result<Self, Self::Error> {
        let mut nodes = data.nodes.into_iter();
        let first = nodes.next().ok_or(SketchError::EmptyStroke)?;
        let mut stroke = Stroke::new(data.color, data.width, data.is_eraser, first);
        for node in nodes {
            stroke.add_node(node);
        }
        Ok(stroke)
    }
}

impl Stroke {
    /// Create a stroke starting at `first`. Eraser strokes ignore `color`.
    pub fn new(color: u32, width: f64, is_eraser: bool, first: PathNode) -> Self {
        Self {
            color: if is_eraser { TRANSPARENT } else { color },
            width,
            is_eraser,
            bound: Rect::from_point(first.anchor()),
            nodes: vec![first],
        }
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    /// Sets the stroke color. Returns `false` and leaves the stroke untouched
    /// for erasers, which stay transparent.
    pub fn set_color(&mut self, color: u32) -> bool {
        if self.is_eraser {
            return false;
        }
        self.color = color;
        true
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn is_eraser(&self) -> bool {
        self.is_eraser
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn bound(&self) -> Rect {
        self.bound
    }

    pub fn last_anchor(&self) -> Point {
        // nodes is never empty
        self.nodes.last().map(PathNode::anchor).unwrap_or_default()
    }

    /// Appends a node and grows the bound to include its anchor
    pub fn add_node(&mut self, node: PathNode) {
        self.bound = self.bound.union_point(node.anchor());
        self.nodes.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_node_from_points() {
        let a = Point::new(0.1, 0.2);
        let b = Point::new(0.3, 0.4);
        let c = Point::new(0.5, 0.6);
        assert_eq!(PathNode::from_points(&[a]).unwrap(), PathNode::Line(a));
        assert_eq!(PathNode::from_points(&[a, b]).unwrap().anchor(), b);
        assert_eq!(PathNode::from_points(&[a, b, c]).unwrap().anchor(), c);
        assert_eq!(PathNode::from_points(&[]), Err(SketchError::InvalidPathNode(0)));
        assert_eq!(
            PathNode::from_points(&[a, b, c, a]),
            Err(SketchError::InvalidPathNode(4))
        );
    }

    #[test]
    fn test_eraser_stays_transparent() {
        let mut eraser = Stroke::new(0xFF00_00FF, 0.05, true, PathNode::Line(Point::new(0.5, 0.5)));
        assert_eq!(eraser.color(), TRANSPARENT);
        assert!(!eraser.set_color(0xFFFF_0000));
        assert_eq!(eraser.color(), TRANSPARENT);

        let mut pen = Stroke::new(0xFF00_00FF, 0.05, false, PathNode::Line(Point::new(0.5, 0.5)));
        assert!(pen.set_color(0xFFFF_0000));
        assert_eq!(pen.color(), 0xFFFF_0000);
    }

    #[test]
    fn test_bound_uses_anchor_only() {
        let mut stroke = Stroke::new(0xFF00_0000, 0.01, false, PathNode::Line(Point::new(0.5, 0.5)));
        stroke.add_node(PathNode::Quad(Point::new(0.0, 0.0), Point::new(0.6, 0.7)));
        let bound = stroke.bound();
        assert_eq!(bound.left, 0.5);
        assert_eq!(bound.top, 0.5);
        assert_eq!(bound.right, 0.6);
        assert_eq!(bound.bottom, 0.7);
    }

    #[test]
    fn test_deserialize_rejects_empty_nodes() {
        let json = r#"{"color":0,"width":0.1,"is_eraser":false,"nodes":[],"bound":{"left":0,"top":0,"right":0,"bottom":0}}"#;
        assert!(serde_json::from_str::<Stroke>(json).is_err());
    }
}
