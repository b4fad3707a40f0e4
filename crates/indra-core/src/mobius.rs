use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::ops::Mul;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;
use crate::error::{IndraError, Result};
use crate::geometry::{Circle, GeneralizedCircle, Line, Point};

/// Element of PSL(2, ℂ) acting on the Riemann sphere by
/// `z ↦ (az + b) / (cz + d)`.
///
/// The matrix is kept as given; it is not rescaled to unit determinant, so
/// scalar multiples act identically but compare unequal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MobiusTransformation {
    m: [[Complex64; 2]; 2],
}

/// Anything a transformation can act on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Point(Point),
    Circle(Circle),
    Line(Line),
    Transformation(MobiusTransformation),
}

impl MobiusTransformation {
    /// Build from matrix entries. Fails when `|ad - bc|` is numerically zero.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Result<Self> {
        let det = a * d - b * c;
        if !(det.re.is_finite() && det.im.is_finite()) || det.norm() < EPSILON {
            return Err(IndraError::DegenerateTransformation {
                determinant: det.norm(),
            });
        }
        Ok(Self {
            m: [[a, b], [c, d]],
        })
    }

    pub fn from_matrix(m: [[Complex64; 2]; 2]) -> Result<Self> {
        Self::new(m[0][0], m[0][1], m[1][0], m[1][1])
    }

    pub fn identity() -> Self {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self {
            m: [[one, zero], [zero, one]],
        }
    }

    pub fn a(&self) -> Complex64 {
        self.m[0][0]
    }

    pub fn b(&self) -> Complex64 {
        self.m[0][1]
    }

    pub fn c(&self) -> Complex64 {
        self.m[1][0]
    }

    pub fn d(&self) -> Complex64 {
        self.m[1][1]
    }

    pub fn matrix(&self) -> [[Complex64; 2]; 2] {
        self.m
    }

    pub fn determinant(&self) -> Complex64 {
        self.a() * self.d() - self.b() * self.c()
    }

    pub fn trace(&self) -> Complex64 {
        self.a() + self.d()
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let [[a, b], [c, d]] = self.m;
        let [[e, f], [g, h]] = other.m;
        Self {
            m: [[a * e + b * g, a * f + b * h], [c * e + d * g, c * f + d * h]],
        }
    }

    /// Adjugate `(d, -b, -c, a)` divided by the determinant.
    pub fn inverse(&self) -> Self {
        let det = self.determinant();
        Self {
            m: [
                [self.d() / det, -self.b() / det],
                [-self.c() / det, self.a() / det],
            ],
        }
    }

    /// `by ∘ self ∘ by⁻¹`.
    pub fn conjugate(&self, by: &Self) -> Self {
        by.compose(self).compose(&by.inverse())
    }

    /// The point sent to ∞, `-d/c` (∞ itself when `c = 0`).
    pub fn pole(&self) -> Point {
        if self.c().norm() < EPSILON {
            Point::Infinity
        } else {
            Point::Finite(-self.d() / self.c())
        }
    }

    pub fn apply_point(&self, z: Point) -> Point {
        let [[a, b], [c, d]] = self.m;
        match z {
            Point::Infinity => {
                if c.norm() < EPSILON {
                    Point::Infinity
                } else {
                    Point::Finite(a / c)
                }
            }
            Point::Finite(z) => {
                let den = c * z + d;
                if den.norm() < EPSILON {
                    Point::Infinity
                } else {
                    Point::Finite((a * z + b) / den)
                }
            }
        }
    }

    pub fn apply_circle(&self, circle: &Circle) -> Result<GeneralizedCircle> {
        self.apply_circle_with_tolerance(circle, EPSILON)
    }

    /// Image of a circle. `tol` decides when the circle passes through the
    /// pole, in which case the image is a line.
    pub fn apply_circle_with_tolerance(
        &self,
        circle: &Circle,
        tol: f64,
    ) -> Result<GeneralizedCircle> {
        let center = circle.center();
        let r = circle.radius();
        let inside = self.apply_point(circle.inside());

        let reflected = match self.pole() {
            Point::Infinity => Point::Finite(center),
            Point::Finite(pole) => {
                if ((center - pole).norm() - r).abs() < tol {
                    return self.circle_through_pole(circle, pole, inside);
                }
                let den = (center - pole).conj();
                if den.norm() < tol {
                    // pole at the center: its mirror image is ∞
                    Point::Infinity
                } else {
                    Point::Finite(center - r * r / den)
                }
            }
        };

        let new_center = self.apply_point(reflected).finite().ok_or_else(|| {
            IndraError::InvalidGeometry(format!("image of circle {circle:?} has no finite center"))
        })?;
        let edge = self
            .apply_point(Point::Finite(center + r))
            .finite()
            .ok_or_else(|| {
                IndraError::InvalidGeometry(format!("image of circle {circle:?} is unbounded"))
            })?;
        let radius = (new_center - edge).norm();
        Circle::with_inside(new_center, radius, inside).map(GeneralizedCircle::Circle)
    }

    fn circle_through_pole(
        &self,
        circle: &Circle,
        pole: Complex64,
        inside: Point,
    ) -> Result<GeneralizedCircle> {
        let phi = (pole - circle.center()).arg();
        let images: Vec<Complex64> = [FRAC_PI_2, PI, 3.0 * FRAC_PI_2]
            .iter()
            .filter_map(|&t| {
                self.apply_point(Point::Finite(circle.point_at(phi + t)))
                    .finite()
            })
            .collect();
        let [p, _, q] = images[..] else {
            return Err(IndraError::InvalidGeometry(format!(
                "circle {circle:?} meets the pole more than once"
            )));
        };
        let line = Line::through(p, q)?;
        Line::with_inside(line.direction(), line.offset(), inside).map(GeneralizedCircle::Line)
    }

    /// Image of a line, which must be a circle.
    ///
    /// A line through the pole (every line, when `c = 0`) maps to another
    /// line; that case is not supported and yields `UnsupportedOperation`.
    pub fn apply_line(&self, line: &Line) -> Result<Circle> {
        let through_pole = match self.pole() {
            Point::Infinity => true,
            Point::Finite(pole) => line.signed_distance(pole).abs() < EPSILON,
        };
        if through_pole {
            return Err(IndraError::UnsupportedOperation(format!(
                "image of line {line:?} is a line"
            )));
        }

        let mut images = [Complex64::new(0.0, 0.0); 3];
        for (image, s) in images.iter_mut().zip([-1.0, 0.0, 1.0]) {
            *image = self
                .apply_point(Point::Finite(line.point_at(s)))
                .finite()
                .ok_or_else(|| {
                    IndraError::UnsupportedOperation(format!("image of line {line:?} is a line"))
                })?;
        }
        let inside = self.apply_point(line.inside());
        match GeneralizedCircle::through(images[0], images[1], images[2])?.with_inside(inside)? {
            GeneralizedCircle::Circle(c) => Ok(c),
            GeneralizedCircle::Line(_) => Err(IndraError::UnsupportedOperation(format!(
                "image of line {line:?} is a line"
            ))),
        }
    }

    pub fn apply_generalized(&self, g: &GeneralizedCircle) -> Result<GeneralizedCircle> {
        match g {
            GeneralizedCircle::Circle(c) => self.apply_circle(c),
            GeneralizedCircle::Line(l) => self.apply_line(l).map(GeneralizedCircle::Circle),
        }
    }

    /// Act on any operand: points, circles and lines are mapped,
    /// transformations are composed (`self ∘ other`).
    pub fn apply(&self, operand: Operand) -> Result<Operand> {
        match operand {
            Operand::Point(z) => Ok(Operand::Point(self.apply_point(z))),
            Operand::Circle(c) => Ok(match self.apply_circle(&c)? {
                GeneralizedCircle::Circle(c) => Operand::Circle(c),
                GeneralizedCircle::Line(l) => Operand::Line(l),
            }),
            Operand::Line(l) => self.apply_line(&l).map(Operand::Circle),
            Operand::Transformation(t) => Ok(Operand::Transformation(self.compose(&t))),
        }
    }

    /// `√(trace² - 4·det)`, the discriminant root shared by the fixed points
    /// and the multiplier.
    fn discriminant_root(&self) -> Complex64 {
        let tr = self.trace();
        (tr * tr - 4.0 * self.determinant()).sqrt()
    }

    /// Roots of `cz² + (d - a)z - b = 0`. The first root belongs to the
    /// eigenvalue `(trace + √(trace² - 4))/2`.
    ///
    /// When `c = 0` the map fixes ∞ and, unless `a = d`, the finite point
    /// `b / (d - a)`.
    pub fn fixed_points(&self) -> (Point, Point) {
        let [[a, b], [c, d]] = self.m;
        let root = self.discriminant_root();
        if c.norm() < EPSILON {
            let finite = if (d - a).norm() < EPSILON {
                Point::Infinity
            } else {
                Point::Finite(b / (d - a))
            };
            // eigenvalue a belongs to ∞, eigenvalue d to the finite point
            let plus = (self.trace() + root) / 2.0;
            return if (plus - a).norm() <= (plus - d).norm() {
                (Point::Infinity, finite)
            } else {
                (finite, Point::Infinity)
            };
        }
        let denom = 2.0 * c;
        (
            Point::Finite((a - d + root) / denom),
            Point::Finite((a - d - root) / denom),
        )
    }

    /// `k = ((trace + √(trace² - 4))/2)²`, normalized by the determinant.
    pub fn multiplier(&self) -> Complex64 {
        let plus = (self.trace() + self.discriminant_root()) / 2.0;
        plus * plus / self.determinant()
    }

    /// Attracting fixed point (the only one for parabolic maps).
    pub fn sink(&self) -> Point {
        let (plus, minus) = self.fixed_points();
        if plus == minus {
            return plus;
        }
        if self.multiplier().norm() > 1.0 { plus } else { minus }
    }

    /// Repelling fixed point (the only one for parabolic maps).
    pub fn source(&self) -> Point {
        let (plus, minus) = self.fixed_points();
        if plus == minus {
            return plus;
        }
        if self.multiplier().norm() > 1.0 { minus } else { plus }
    }

    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(x, y)| (x - y).norm() < tol)
    }
}

impl PartialEq for MobiusTransformation {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, EPSILON)
    }
}

/// Composition: `(s * t)(z) = s(t(z))`.
impl Mul for MobiusTransformation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl fmt::Display for MobiusTransformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[a, b], [c, d]] = self.m;
        write!(f, "[[{a}, {b}], [{c}, {d}]]")
    }
}
