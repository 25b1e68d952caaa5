use serde::{Deserialize, Serialize};

use super::Point;

/// Determinants smaller than this are treated as singular
const SINGULAR_EPSILON: f64 = 1e-12;

/// Components of an affine transform, applied as scale, then rotate, then translate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decomposed {
    pub translation_x: f64,
    pub translation_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Signed rotation in degrees, within (-180, 180]
    pub rotation_degrees: f64,
}

impl Default for Decomposed {
    fn default() -> Self {
        Self {
            translation_x: 0.0,
            translation_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_degrees: 0.0,
        }
    }
}

/// Immutable 2D affine transform backed by a 3x3 row-major matrix.
///
/// A point is mapped as `(a*x + b*y + c, d*x + e*y + f)` where the first two
/// rows are `[a, b, c]` and `[d, e, f]`. Every combinator returns a new value;
/// there is no shared mutable matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    matrix: [[f64; 3]; 3],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: [[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]],
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            matrix: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation about the origin. In a y-down space positive angles turn clockwise.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            matrix: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Uniform scale that keeps `pivot` fixed
    pub fn scaling_about(scale: f64, pivot: Point) -> Self {
        Self::translation(-pivot.x, -pivot.y)
            .then(&Self::scaling(scale, scale))
            .then(&Self::translation(pivot.x, pivot.y))
    }

    /// Rotation that keeps `pivot` fixed
    pub fn rotation_about(degrees: f64, pivot: Point) -> Self {
        Self::translation(-pivot.x, -pivot.y)
            .then(&Self::rotation(degrees))
            .then(&Self::translation(pivot.x, pivot.y))
    }

    pub fn from_components(components: Decomposed) -> Self {
        Self::scaling(components.scale_x, components.scale_y)
            .then(&Self::rotation(components.rotation_degrees))
            .then(&Self::translation(components.translation_x, components.translation_y))
    }

    pub fn from_matrix(matrix: [[f64; 3]; 3]) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> [[f64; 3]; 3] {
        self.matrix
    }

    /// Returns the transform that applies `self` first and `next` second
    pub fn then(&self, next: &AffineTransform) -> AffineTransform {
        AffineTransform {
            matrix: multiply_matrices(&next.matrix, &self.matrix),
        }
    }

    /// Returns the transform that applies `first` before `self`
    pub fn pre_concat(&self, first: &AffineTransform) -> AffineTransform {
        first.then(self)
    }

    pub fn post_translate(&self, dx: f64, dy: f64) -> AffineTransform {
        self.then(&Self::translation(dx, dy))
    }

    pub fn pre_scale_about(&self, scale: f64, pivot: Point) -> AffineTransform {
        self.pre_concat(&Self::scaling_about(scale, pivot))
    }

    pub fn pre_rotate_about(&self, degrees: f64, pivot: Point) -> AffineTransform {
        self.pre_concat(&Self::rotation_about(degrees, pivot))
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.matrix;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Inverse transform, or `None` when the matrix is singular
    pub fn invert(&self) -> Option<AffineTransform> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON || !det.is_finite() {
            return None;
        }
        let [[a, b, c], [d, e, f], _] = self.matrix;
        let inv_det = 1.0 / det;
        let ia = e * inv_det;
        let ib = -b * inv_det;
        let id = -d * inv_det;
        let ie = a * inv_det;
        Some(AffineTransform {
            matrix: [
                [ia, ib, -(ia * c + ib * f)],
                [id, ie, -(id * c + ie * f)],
                [0.0, 0.0, 1.0],
            ],
        })
    }

    pub fn map_point(&self, point: Point) -> Point {
        let m = &self.matrix;
        Point::new(
            m[0][0] * point.x + m[0][1] * point.y + m[0][2],
            m[1][0] * point.x + m[1][1] * point.y + m[1][2],
        )
    }

    /// Maps a displacement, ignoring translation
    pub fn map_vector(&self, vector: Point) -> Point {
        let m = &self.matrix;
        Point::new(
            m[0][0] * vector.x + m[0][1] * vector.y,
            m[1][0] * vector.x + m[1][1] * vector.y,
        )
    }

    pub fn decompose(&self) -> Decomposed {
        let [[a, b, c], [d, e, f], _] = self.matrix;
        let scale_x = a.hypot(d);
        let (rotation_degrees, scale_y) = if scale_x > SINGULAR_EPSILON {
            (wrap_degrees(d.atan2(a).to_degrees()), self.determinant() / scale_x)
        } else {
            (0.0, b.hypot(e))
        };
        Decomposed {
            translation_x: c,
            translation_y: f,
            scale_x,
            scale_y,
            rotation_degrees,
        }
    }

    pub fn translation_x(&self) -> f64 {
        self.matrix[0][2]
    }

    pub fn translation_y(&self) -> f64 {
        self.matrix[1][2]
    }

    pub fn scale_x(&self) -> f64 {
        self.decompose().scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.decompose().scale_y
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.decompose().rotation_degrees
    }

    pub fn with_translation(&self, dx: f64, dy: f64) -> AffineTransform {
        Self::from_components(Decomposed {
            translation_x: dx,
            translation_y: dy,
            ..self.decompose()
        })
    }

    pub fn with_scale(&self, scale: f64) -> AffineTransform {
        Self::from_components(Decomposed {
            scale_x: scale,
            scale_y: scale,
            ..self.decompose()
        })
    }

    pub fn with_rotation(&self, degrees: f64) -> AffineTransform {
        Self::from_components(Decomposed {
            rotation_degrees: wrap_degrees(degrees),
            ..self.decompose()
        })
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.iter().flatten().all(|v| v.is_finite())
    }

    pub fn approx_eq(&self, other: &AffineTransform, epsilon: f64) -> bool {
        self.matrix
            .iter()
            .flatten()
            .zip(other.matrix.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

/// Wraps an angle in degrees into (-180, 180]
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

const fn const_multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    let mut i = 0;
    while i < 3 {
        let mut j = 0;
        while j < 3 {
            let mut k = 0;
            while k < 3 {
                result[i][j] += a[i][k] * b[k][j];
                k += 1;
            }
            j += 1;
        }
        i += 1;
    }
    result
}

fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    const_multiply_matrices(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert!((wrap_degrees(190.0) + 170.0).abs() < EPS);
        assert!((wrap_degrees(-190.0) - 170.0).abs() < EPS);
        assert!((wrap_degrees(720.0 + 45.0) - 45.0).abs() < EPS);
    }

    #[test]
    fn test_compose_order() {
        let scale_then_move = AffineTransform::scaling(2.0, 2.0).then(&AffineTransform::translation(10.0, 0.0));
        assert_point_eq(scale_then_move.map_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));

        let move_then_scale = AffineTransform::translation(10.0, 0.0).then(&AffineTransform::scaling(2.0, 2.0));
        assert_point_eq(move_then_scale.map_point(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));
    }

    #[test]
    fn test_rotation_direction() {
        let rotate = AffineTransform::rotation(90.0);
        assert_point_eq(rotate.map_point(Point::new(1.0, 0.0)), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_invert_round_trip() {
        let transform = AffineTransform::from_components(Decomposed {
            translation_x: 15.0,
            translation_y: -4.0,
            scale_x: 1.5,
            scale_y: 1.5,
            rotation_degrees: 33.0,
        });
        let inverse = transform.invert().unwrap();
        let p = Point::new(3.0, 7.0);
        assert_point_eq(inverse.map_point(transform.map_point(p)), p);
        assert!(transform.then(&inverse).approx_eq(&AffineTransform::IDENTITY, EPS));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(AffineTransform::scaling(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn test_decompose_matches_components() {
        let components = Decomposed {
            translation_x: -20.0,
            translation_y: 8.0,
            scale_x: 0.75,
            scale_y: 0.75,
            rotation_degrees: -120.0,
        };
        let decomposed = AffineTransform::from_components(components).decompose();
        assert!((decomposed.translation_x - components.translation_x).abs() < EPS);
        assert!((decomposed.translation_y - components.translation_y).abs() < EPS);
        assert!((decomposed.scale_x - 0.75).abs() < EPS);
        assert!((decomposed.scale_y - 0.75).abs() < EPS);
        assert!((decomposed.rotation_degrees + 120.0).abs() < EPS);
    }

    #[test]
    fn test_pivot_combinators_keep_pivot() {
        let pivot = Point::new(40.0, 25.0);
        let transform = AffineTransform::translation(5.0, 5.0)
            .pre_scale_about(3.0, pivot)
            .pre_rotate_about(45.0, pivot);
        assert_point_eq(transform.map_point(pivot), Point::new(45.0, 30.0));
    }

    #[test]
    fn test_with_combinators_replace_one_component() {
        let transform = AffineTransform::from_components(Decomposed {
            translation_x: 1.0,
            translation_y: 2.0,
            scale_x: 2.0,
            scale_y: 2.0,
            rotation_degrees: 10.0,
        });
        let rotated = transform.with_rotation(-30.0).decompose();
        assert!((rotated.rotation_degrees + 30.0).abs() < EPS);
        assert!((rotated.scale_x - 2.0).abs() < EPS);
        assert!((rotated.translation_y - 2.0).abs() < EPS);

        let scaled = transform.with_scale(0.5).decompose();
        assert!((scaled.scale_y - 0.5).abs() < EPS);
        assert!((scaled.rotation_degrees - 10.0).abs() < EPS);
    }
}
