use crate::geometry::Point;
use crate::stroke::PathNode;

/// Helper for turning accepted stroke points into path nodes.
///
/// In straight mode every point becomes a line node immediately. In curve mode
/// points are buffered three at a time and emitted as one cubic node; each
/// cubic after the first takes its first control point by reflecting the
/// previous segment's second control point through the previous endpoint, so
/// consecutive segments share a tangent.
#[derive(Debug, Clone)]
pub(crate) struct DrawStrokeHelper {
    curve_smoothing: bool,
    buffer: Vec<Point>,
    last_end: Point,
    last_control: Option<Point>,
}

impl DrawStrokeHelper {
    pub(crate) fn new(curve_smoothing: bool, start: Point) -> Self {
        Self {
            curve_smoothing,
            buffer: Vec::with_capacity(3),
            last_end: start,
            last_control: None,
        }
    }

    /// Feed one accepted point; returns a node once one is complete
    pub(crate) fn push(&mut self, point: Point) -> Option<PathNode> {
        if !self.curve_smoothing {
            self.last_end = point;
            return Some(PathNode::Line(point));
        }

        self.buffer.push(point);
        if self.buffer.len() < 3 {
            return None;
        }

        let first_control = match self.last_control {
            Some(control) => control.reflect_through(self.last_end),
            None => self.buffer[0],
        };
        let second_control = self.buffer[1];
        let end = self.buffer[2];
        self.buffer.clear();
        self.last_control = Some(second_control);
        self.last_end = end;
        Some(PathNode::Cubic(first_control, second_control, end))
    }

    /// Emits whatever is still buffered as one final node
    pub(crate) fn flush(&mut self) -> Option<PathNode> {
        let node = match *self.buffer.as_slice() {
            [] => None,
            [end] => Some(PathNode::Line(end)),
            [control, end] => Some(PathNode::Quad(control, end)),
            [c1, c2, end, ..] => Some(PathNode::Cubic(c1, c2, end)),
        };
        if let Some(node) = node {
            self.last_end = node.anchor();
        }
        self.buffer.clear();
        node
    }

    pub(crate) fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_mode_emits_every_point() {
        let mut helper = DrawStrokeHelper::new(false, Point::new(0.0, 0.0));
        assert_eq!(helper.push(Point::new(0.1, 0.1)), Some(PathNode::Line(Point::new(0.1, 0.1))));
        assert_eq!(helper.buffered(), 0);
        assert_eq!(helper.flush(), None);
    }

    #[test]
    fn test_curve_mode_groups_three_points() {
        let mut helper = DrawStrokeHelper::new(true, Point::new(0.0, 0.0));
        assert_eq!(helper.push(Point::new(0.1, 0.0)), None);
        assert_eq!(helper.push(Point::new(0.2, 0.1)), None);
        let node = helper.push(Point::new(0.3, 0.1)).unwrap();
        assert_eq!(
            node,
            PathNode::Cubic(Point::new(0.1, 0.0), Point::new(0.2, 0.1), Point::new(0.3, 0.1))
        );
    }

    #[test]
    fn test_curve_join_mirrors_previous_control() {
        let mut helper = DrawStrokeHelper::new(true, Point::new(0.0, 0.0));
        helper.push(Point::new(0.1, 0.0));
        helper.push(Point::new(0.2, 0.1));
        helper.push(Point::new(0.3, 0.1));

        helper.push(Point::new(0.4, 0.2));
        helper.push(Point::new(0.5, 0.2));
        let Some(PathNode::Cubic(c1, _, end)) = helper.push(Point::new(0.6, 0.3)) else {
            panic!("expected a cubic node");
        };
        // previous control (0.2, 0.1) mirrored through (0.3, 0.1)
        assert!(c1.distance(Point::new(0.4, 0.1)) < 1e-12);
        assert_eq!(end, Point::new(0.6, 0.3));
    }

    #[test]
    fn test_flush_emits_partial_segment() {
        let mut helper = DrawStrokeHelper::new(true, Point::new(0.0, 0.0));
        helper.push(Point::new(0.1, 0.0));
        helper.push(Point::new(0.2, 0.1));
        assert_eq!(
            helper.flush(),
            Some(PathNode::Quad(Point::new(0.1, 0.0), Point::new(0.2, 0.1)))
        );
        assert_eq!(helper.buffered(), 0);
    }
}
