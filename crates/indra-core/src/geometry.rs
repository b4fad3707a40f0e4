use std::f64::consts::TAU;
use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;
use crate::error::{IndraError, Result};

/// A point of the extended complex plane (the Riemann sphere).
///
/// Serializes as `[re, im]` for finite points and `null` for ∞.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Point {
    Finite(Complex64),
    Infinity,
}

impl Point {
    pub fn new(re: f64, im: f64) -> Self {
        Point::Finite(Complex64::new(re, im))
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// The complex value, or `None` for ∞.
    pub fn finite(self) -> Option<Complex64> {
        match self {
            Point::Finite(z) => Some(z),
            Point::Infinity => None,
        }
    }

    /// Euclidean distance. Two infinite points are at distance 0, a finite
    /// and an infinite point are infinitely far apart.
    pub fn distance(self, other: Self) -> f64 {
        match (self, other) {
            (Point::Finite(p), Point::Finite(q)) => (p - q).norm(),
            (Point::Infinity, Point::Infinity) => 0.0,
            _ => f64::INFINITY,
        }
    }

    pub fn approx_eq(self, other: Self, tol: f64) -> bool {
        self.distance(other) < tol
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(*other, EPSILON)
    }
}

impl From<Complex64> for Point {
    fn from(z: Complex64) -> Self {
        Point::Finite(z)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Finite(z) => write!(f, "{z}"),
            Point::Infinity => write!(f, "∞"),
        }
    }
}

fn is_finite(z: Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

// ---------------------------------------------------------------------------
// Circle
// ---------------------------------------------------------------------------

/// A circle with a marked interior.
///
/// The interior is the side of the boundary containing `inside`. The default
/// inside point is the center (the disk); an inside point outside the disk,
/// including ∞, makes the exterior the interior.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Circle {
    center: Complex64,
    radius: f64,
    inside: Point,
}

impl Circle {
    pub fn new(center: Complex64, radius: f64) -> Result<Self> {
        Self::with_inside(center, radius, Point::Finite(center))
    }

    pub fn with_inside(center: Complex64, radius: f64, inside: Point) -> Result<Self> {
        if !is_finite(center) {
            return Err(IndraError::InvalidGeometry(format!(
                "circle center must be finite, got {center}"
            )));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(IndraError::InvalidGeometry(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        let circle = Self {
            center,
            radius,
            inside,
        };
        if circle.side(inside).is_none() {
            return Err(IndraError::InvalidGeometry(format!(
                "inside point {inside} lies on the circle"
            )));
        }
        Ok(circle)
    }

    pub fn center(&self) -> Complex64 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn inside(&self) -> Point {
        self.inside
    }

    /// Point on the boundary at angle `theta` from the center.
    pub fn point_at(&self, theta: f64) -> Complex64 {
        self.center + Complex64::from_polar(self.radius, theta)
    }

    /// `Some(true)` strictly inside the disk, `Some(false)` strictly outside,
    /// `None` on the boundary.
    fn side(&self, p: Point) -> Option<bool> {
        match p {
            Point::Infinity => Some(false),
            Point::Finite(z) => {
                let d = (z - self.center).norm();
                if (d - self.radius).abs() < EPSILON {
                    None
                } else {
                    Some(d < self.radius)
                }
            }
        }
    }

    /// Whether the interior is the bounded disk.
    pub fn is_disk(&self) -> bool {
        self.side(self.inside) == Some(true)
    }

    pub fn contains(&self, p: Point) -> bool {
        match self.side(p) {
            Some(side) => Some(side) == self.side(self.inside),
            None => false,
        }
    }
}

impl PartialEq for Circle {
    fn eq(&self, other: &Self) -> bool {
        (self.center - other.center).norm() < EPSILON
            && (self.radius - other.radius).abs() < EPSILON
            && self.is_disk() == other.is_disk()
    }
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// A line in normal form `cos(direction)·x + sin(direction)·y = offset`.
///
/// `direction ∈ [0, 2π)` and `offset ≥ 0`, which makes the representation
/// unique except for lines through the origin.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Line {
    direction: f64,
    offset: f64,
    inside: Point,
}

impl Line {
    /// Line whose interior is the half-plane containing the origin side,
    /// marked by the point `(offset - 1)·e^{i·direction}`.
    pub fn new(direction: f64, offset: f64) -> Result<Self> {
        let inside = Point::Finite(Complex64::from_polar(offset - 1.0, direction));
        Self::with_inside(direction, offset, inside)
    }

    pub fn with_inside(direction: f64, offset: f64, inside: Point) -> Result<Self> {
        if !(0.0..TAU).contains(&direction) {
            return Err(IndraError::InvalidGeometry(format!(
                "line direction must lie in [0, 2π), got {direction}"
            )));
        }
        if !(offset.is_finite() && offset >= 0.0) {
            return Err(IndraError::InvalidGeometry(format!(
                "line offset must be non-negative, got {offset}"
            )));
        }
        let line = Self {
            direction,
            offset,
            inside,
        };
        if line.side(inside).is_none() {
            return Err(IndraError::InvalidGeometry(format!(
                "inside point {inside} does not mark a half-plane"
            )));
        }
        Ok(line)
    }

    /// The line through two distinct finite points.
    pub fn through(p: Complex64, q: Complex64) -> Result<Self> {
        let chord = q - p;
        if chord.norm() < EPSILON || !is_finite(chord) {
            return Err(IndraError::InvalidGeometry(format!(
                "a line needs two distinct finite points, got {p} and {q}"
            )));
        }
        let mut normal = Complex64::i() * chord / chord.norm();
        let mut offset = normal.re * p.re + normal.im * p.im;
        if offset < 0.0 {
            normal = -normal;
            offset = -offset;
        }
        let mut direction = normal.arg().rem_euclid(TAU);
        if direction >= TAU {
            direction = 0.0;
        }
        Self::new(direction, offset)
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn inside(&self) -> Point {
        self.inside
    }

    /// Unit normal `e^{i·direction}`.
    pub fn normal(&self) -> Complex64 {
        Complex64::from_polar(1.0, self.direction)
    }

    /// `cos(direction)·x + sin(direction)·y - offset`.
    pub fn signed_distance(&self, z: Complex64) -> f64 {
        let n = self.normal();
        n.re * z.re + n.im * z.im - self.offset
    }

    /// Point at arc-length parameter `s` from the foot of the normal.
    pub fn point_at(&self, s: f64) -> Complex64 {
        let n = self.normal();
        n * self.offset + Complex64::i() * n * s
    }

    pub fn is_horizontal(&self) -> bool {
        self.direction.cos().abs() < EPSILON
    }

    pub fn is_vertical(&self) -> bool {
        self.direction.sin().abs() < EPSILON
    }

    // ∞ lies on every line.
    fn side(&self, p: Point) -> Option<bool> {
        let z = p.finite()?;
        let s = self.signed_distance(z);
        if s.abs() < EPSILON { None } else { Some(s < 0.0) }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self.side(p) {
            Some(side) => Some(side) == self.side(self.inside),
            None => false,
        }
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        let turn = (self.direction - other.direction).rem_euclid(TAU);
        let angle_diff = turn.min(TAU - turn);
        angle_diff < EPSILON
            && (self.offset - other.offset).abs() < EPSILON
            && self.side(self.inside) == other.side(other.inside)
    }
}

// ---------------------------------------------------------------------------
// Generalized circle
// ---------------------------------------------------------------------------

/// A circle on the Riemann sphere: either a Euclidean circle or a line
/// (a circle through ∞).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GeneralizedCircle {
    Circle(Circle),
    Line(Line),
}

impl GeneralizedCircle {
    /// The generalized circle through three distinct finite points; a line
    /// when the points are collinear.
    pub fn through(z1: Complex64, z2: Complex64, z3: Complex64) -> Result<Self> {
        if (z2 - z1).norm() < EPSILON || (z3 - z1).norm() < EPSILON || (z3 - z2).norm() < EPSILON
        {
            return Err(IndraError::InvalidGeometry(format!(
                "points {z1}, {z2}, {z3} are not distinct"
            )));
        }
        let w = (z3 - z1) / (z2 - z1);
        if w.im.abs() < EPSILON {
            return Ok(GeneralizedCircle::Line(Line::through(z1, z2)?));
        }
        let center = (z2 - z1) * (w - w.norm_sqr()) / (Complex64::i() * 2.0 * w.im) + z1;
        let radius = (z1 - center).norm();
        Ok(GeneralizedCircle::Circle(Circle::new(center, radius)?))
    }

    /// Same boundary, interior marked by `inside`.
    pub fn with_inside(self, inside: Point) -> Result<Self> {
        match self {
            GeneralizedCircle::Circle(c) => {
                Circle::with_inside(c.center, c.radius, inside).map(GeneralizedCircle::Circle)
            }
            GeneralizedCircle::Line(l) => {
                Line::with_inside(l.direction, l.offset, inside).map(GeneralizedCircle::Line)
            }
        }
    }

    /// Euclidean radius, infinite for lines.
    pub fn radius(&self) -> f64 {
        match self {
            GeneralizedCircle::Circle(c) => c.radius,
            GeneralizedCircle::Line(_) => f64::INFINITY,
        }
    }

    pub fn inside(&self) -> Point {
        match self {
            GeneralizedCircle::Circle(c) => c.inside,
            GeneralizedCircle::Line(l) => l.inside,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            GeneralizedCircle::Circle(c) => c.contains(p),
            GeneralizedCircle::Line(l) => l.contains(p),
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            GeneralizedCircle::Circle(c) => Some(c),
            GeneralizedCircle::Line(_) => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            GeneralizedCircle::Circle(_) => None,
            GeneralizedCircle::Line(l) => Some(l),
        }
    }
}

impl From<Circle> for GeneralizedCircle {
    fn from(c: Circle) -> Self {
        GeneralizedCircle::Circle(c)
    }
}

impl From<Line> for GeneralizedCircle {
    fn from(l: Line) -> Self {
        GeneralizedCircle::Line(l)
    }
}
