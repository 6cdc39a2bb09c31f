//! Minimal 2D vector math used by pose integration and path geometry.

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use libm::{atan2, cos, hypot, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D vector `(x, y)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    /// x component.
    pub x: f64,
    /// y component.
    pub y: f64,
}

impl Vector {
    /// Construct a vector from cartesian components.
    pub const fn new(x: f64, y: f64) -> Self {
        Vector { x, y }
    }

    /// Construct a vector of length `r` pointing at angle `phi` (rad).
    pub fn from_polar(r: f64, phi: f64) -> Self {
        Vector::new(r * cos(phi), r * sin(phi))
    }

    /// Length of the vector.
    pub fn norm(&self) -> f64 {
        hypot(self.x, self.y)
    }

    /// Angle to the x-axis, in `(-PI, PI]`.
    pub fn phi(&self) -> f64 {
        atan2(self.y, self.x)
    }

    /// Dot product.
    pub fn dot(&self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the cross product.
    pub fn cross(&self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector in the same direction.
    pub fn unit(&self) -> Vector {
        *self / self.norm()
    }

    /// Unit vector perpendicular to this one, rotated counter-clockwise.
    pub fn normal(&self) -> Vector {
        let u = self.unit();
        Vector::new(-u.y, u.x)
    }

    /// Signed angle from `other` to `self`, in `(-PI, PI]`.
    pub fn angle_to(&self, other: Vector) -> f64 {
        -atan2(self.cross(other), self.dot(other))
    }

    /// Rotate counter-clockwise by `alpha` radians.
    pub fn rotate(&self, alpha: f64) -> Vector {
        let (s, c) = (sin(alpha), cos(alpha));
        Vector::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Vector;
    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Vector::new(x, y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Directed segment from `start` to `end`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// First point of the segment.
    pub start: Vector,
    /// Last point of the segment.
    pub end: Vector,
}

impl Line {
    /// Segment between two points.
    pub const fn new(start: Vector, end: Vector) -> Self {
        Line { start, end }
    }

    /// Moves the segment `dy` to its left, seen along `start -> end`.
    /// A negative `dy` shifts it to the right.
    pub fn shift_y(&mut self, dy: f64) {
        let shift = (self.end - self.start).normal() * dy;
        self.start += shift;
        self.end += shift;
    }

    /// Heading of the segment (rad).
    pub fn phi(&self) -> f64 {
        (self.end - self.start).phi()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({} -> {})", self.start, self.end)
    }
}

/// Project `x` onto the line through `a` and `b`.
pub fn point_on_line(a: Vector, b: Vector, x: Vector) -> Vector {
    let ax = x - a;
    let ab = b - a;
    a + ab * (ax.dot(ab) / ab.dot(ab))
}

/// Signed distance from `x` to the line through `a` and `b`.
/// Points left of the direction `a -> b` are positive.
pub fn distance_to_line(a: Vector, b: Vector, x: Vector) -> f64 {
    let ab = b - a;
    ab.cross(x - a) / ab.norm()
}

/// Distance from the projection of `x` to the endpoint `b`, measured along
/// `a -> b`. Negative once `x` is past `b`.
pub fn distance_to_b(a: Vector, b: Vector, x: Vector) -> f64 {
    let ab = b - a;
    ab.dot(b - x) / ab.norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_3};
    const EPSILON: f64 = 1e-9;

    fn close(a: Vector, b: Vector) -> bool {
        (a - b).norm() < EPSILON
    }

    #[test]
    fn test_polar() {
        let b = Vector::from_polar(1.0, FRAC_PI_3);
        assert!((b.norm() - 1.0).abs() < EPSILON);
        assert!((b.phi() - FRAC_PI_3).abs() < EPSILON);
        assert_eq!(b.x, cos(FRAC_PI_3));
        assert_eq!(b.y, sin(FRAC_PI_3));

        let a = Vector::new(0.0, 1.0);
        assert_eq!(a.norm(), 1.0);
        assert!((a.phi() - FRAC_PI_2).abs() < EPSILON);
        assert_eq!(a.to_string(), "(0.000, 1.000)");
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector::new(0.0, 1.0);
        let b = Vector::new(1.0, 0.0);

        assert_eq!(a + b, Vector::new(1.0, 1.0));
        assert_eq!(a - b, Vector::new(-1.0, 1.0));
        assert_eq!(-a, Vector::new(0.0, -1.0));
        assert_eq!(Vector::new(2.0, 4.0) * 2.0, Vector::new(4.0, 8.0));
        assert_eq!(Vector::new(2.0, 4.0) / 2.0, Vector::new(1.0, 2.0));

        let mut c = a;
        c += b;
        assert_eq!(c, Vector::from((1.0, 1.0)));

        assert_eq!(a.dot(b), 0.0);
        assert_eq!(b.cross(a), 1.0);
        assert_eq!(Vector::new(2.0, 0.0).unit(), Vector::new(1.0, 0.0));
        assert_eq!(Vector::new(2.0, 0.0).normal(), Vector::new(-0.0, 1.0));
    }

    #[test]
    fn test_rotation_and_angles() {
        let a = Vector::new(0.0, 1.0);
        let b = Vector::new(1.0, 0.0);

        assert!(close(b.rotate(FRAC_PI_2), a));
        assert!((a.angle_to(b) - FRAC_PI_2).abs() < EPSILON);
        assert!((b.angle_to(a) + FRAC_PI_2).abs() < EPSILON);
        assert_eq!(b.angle_to(b), 0.0);
    }

    #[test]
    fn test_line_helpers() {
        let p = point_on_line(
            Vector::new(1.0, 1.0),
            Vector::new(3.0, 3.0),
            Vector::new(1.0, 3.0),
        );
        assert!(close(p, Vector::new(2.0, 2.0)));

        let a = Vector::new(0.0, 0.0);
        let b = Vector::new(1.0, 0.0);
        assert!(close(point_on_line(a, b, Vector::new(0.5, 0.5)), Vector::new(0.5, 0.0)));
        assert!((distance_to_line(a, b, Vector::new(0.5, 0.5)) - 0.5).abs() < EPSILON);
        assert!((distance_to_line(a, b, Vector::new(0.5, -0.5)) + 0.5).abs() < EPSILON);
        assert!((distance_to_b(a, b, Vector::new(0.5, 0.5)) - 0.5).abs() < EPSILON);
        assert!((distance_to_b(a, b, Vector::new(0.8, 1.0)) - 0.2).abs() < EPSILON);
        assert!(distance_to_b(a, b, Vector::new(1.5, 0.0)) < 0.0);

        // along the y-axis, right of the line is negative
        let b = Vector::new(0.0, 1.0);
        assert!((distance_to_line(a, b, Vector::new(0.5, 0.5)) + 0.5).abs() < EPSILON);
        assert!((distance_to_line(a, b, Vector::new(-0.5, 0.5)) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_line_shift_and_phi() {
        let mut line = Line::new(Vector::new(0.0, 0.0), Vector::new(2.0, 0.0));
        assert_eq!(line.phi(), 0.0);

        line.shift_y(1.5);
        assert!(close(line.start, Vector::new(0.0, 1.5)));
        assert!(close(line.end, Vector::new(2.0, 1.5)));

        let mut diagonal = Line::new(Vector::new(1.0, 1.0), Vector::new(2.0, 2.0));
        diagonal.shift_y(-core::f64::consts::SQRT_2);
        assert!(close(diagonal.start, Vector::new(2.0, 0.0)));
        assert!(close(diagonal.end, Vector::new(3.0, 1.0)));
        assert!((diagonal.phi() - core::f64::consts::FRAC_PI_4).abs() < EPSILON);
        assert_eq!(line.to_string(), "Line((0.000, 1.500) -> (2.000, 1.500))");
    }
}
