//! Recipes producing generator pairs `a, b` for two-generator groups.
//!
//! Every recipe returns the generators in tag order `[a, b, A, B]`. Schottky
//! recipes also return the pairing circles `[C_a, C_b, C_A, C_B]`, where the
//! generator for tag `i` maps `C_(i+2)` onto `C_i`.

use num_complex::Complex64;

use crate::constants::EPSILON;
use crate::error::{IndraError, Result};
use crate::geometry::Circle;
use crate::mobius::MobiusTransformation;

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorSet {
    pub generators: Vec<MobiusTransformation>,
    pub circles: Option<Vec<Circle>>,
}

impl GeneratorSet {
    fn from_pair(a: MobiusTransformation, b: MobiusTransformation) -> Self {
        Self {
            generators: vec![a, b, a.inverse(), b.inverse()],
            circles: None,
        }
    }

    /// Trace of the commutator `a b A B`; `-2` for the groups whose limit set
    /// is a closed curve.
    pub fn commutator_trace(&self) -> Complex64 {
        self.generators
            .iter()
            .fold(MobiusTransformation::identity(), |acc, g| acc * *g)
            .trace()
    }
}

/// Möbius map sending the exterior of `from` onto the interior of `to`.
///
/// `u` and `v` pick one map from the family, subject to `|u|² - |v|² = 1`;
/// `u = 1, v = 0` gives the inversion-like map `z ↦ Q + r·s / (z - P)`.
pub fn transform_pairing_circles(
    from: &Circle,
    to: &Circle,
    u: Complex64,
    v: Complex64,
) -> Result<MobiusTransformation> {
    let norm = u.norm_sqr() - v.norm_sqr();
    if (norm - 1.0).abs() >= EPSILON {
        return Err(IndraError::InvalidGeometry(format!(
            "pairing parameters need |u|² - |v|² = 1, got {norm}"
        )));
    }
    let (p, r) = (from.center(), from.radius());
    let (q, s) = (to.center(), to.radius());
    let scale = MobiusTransformation::new(
        Complex64::from(s),
        q,
        Complex64::new(0.0, 0.0),
        Complex64::new(1.0, 0.0),
    )?;
    let unit = MobiusTransformation::new(
        v,
        u * r - v * p,
        u.conj(),
        v.conj() * r - u.conj() * p,
    )?;
    Ok(scale * unit)
}

/// Symmetric kissing Schottky group: four pairwise tangent circles, with
/// `y > 0` controlling the `b` circles and `v > 0` the `a` circles.
pub fn kissing_schottky(y: f64, v: f64) -> Result<GeneratorSet> {
    if !(y > 0.0 && v > 0.0) {
        return Err(IndraError::InvalidGeometry(format!(
            "kissing Schottky parameters must be positive, got y = {y}, v = {v}"
        )));
    }
    let x = (1.0 + y * y).sqrt();
    let u = (1.0 + v * v).sqrt();
    let inv_yv = Complex64::from(1.0 / (y * v));
    // complex for yv > 1, where the circles no longer fit on the axes
    let k = inv_yv - (inv_yv * inv_yv - 1.0).sqrt();
    let i = Complex64::i();

    let a = MobiusTransformation::new(u.into(), i * k * v, -i * v / k, u.into())?;
    let b = MobiusTransformation::new(x.into(), y.into(), y.into(), x.into())?;
    let mut set = GeneratorSet::from_pair(a, b);

    if k.im.abs() < EPSILON {
        let k = k.re;
        set.circles = Some(vec![
            Circle::new(Complex64::new(0.0, k * u / v), k / v)?,
            Circle::new(Complex64::new(x / y, 0.0), 1.0 / y)?,
            Circle::new(Complex64::new(0.0, -k * u / v), k / v)?,
            Circle::new(Complex64::new(-x / y, 0.0), 1.0 / y)?,
        ]);
    }
    tracing::debug!(y, v, %k, circles = set.circles.is_some(), "kissing Schottky group");
    Ok(set)
}

/// Trace of `ab` for a parabolic commutator, choosing the root Grandma picks.
fn parabolic_tab(ta: Complex64, tb: Complex64) -> Complex64 {
    let prod = ta * tb;
    (prod - (prod * prod - 4.0 * (ta * ta + tb * tb)).sqrt()) / 2.0
}

/// Grandma's two-generator recipe from the traces of `a` and `b`.
pub fn grandmas_recipe(ta: Complex64, tb: Complex64) -> Result<GeneratorSet> {
    let tab = parabolic_tab(ta, tb);
    let i = Complex64::i();
    let z0 = (tab - 2.0) * tb / (tb * tab - 2.0 * ta + 2.0 * i * tab);

    let a = MobiusTransformation::new(
        ta / 2.0,
        (ta * tab - 2.0 * tb + 4.0 * i) / ((2.0 * tab + 4.0) * z0),
        (ta * tab - 2.0 * tb - 4.0 * i) * z0 / (2.0 * tab - 4.0),
        ta / 2.0,
    )?;
    let b = MobiusTransformation::new((tb - 2.0 * i) / 2.0, tb / 2.0, tb / 2.0, (tb + 2.0 * i) / 2.0)?;
    tracing::debug!(%ta, %tb, %tab, "grandma's recipe");
    Ok(GeneratorSet::from_pair(a, b))
}

/// Jørgensen's normalisation for the same trace data.
pub fn jorgensen(ta: Complex64, tb: Complex64) -> Result<GeneratorSet> {
    let tab = parabolic_tab(ta, tb);
    let a = MobiusTransformation::new(ta - tb / tab, ta / (tab * tab), ta, tb / tab)?;
    let b = MobiusTransformation::new(tb - ta / tab, -tb / (tab * tab), -tb, ta / tab)?;
    tracing::debug!(%ta, %tb, %tab, "jorgensen's recipe");
    Ok(GeneratorSet::from_pair(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeneralizedCircle;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_close(z: Complex64, w: Complex64) {
        assert!((z - w).norm() < 1e-9, "{z} != {w}");
    }

    #[test]
    fn test_kissing_schottky_traces() {
        let set = kissing_schottky(2.0, 2.0).unwrap();
        let [a, b] = [set.generators[0], set.generators[1]];
        assert_close(b.trace(), c(2.0 * 5f64.sqrt(), 0.0));
        assert_close(a.trace(), c(2.0 * 5f64.sqrt(), 0.0));
        assert_close(a.determinant(), c(1.0, 0.0));
        assert_close(b.determinant(), c(1.0, 0.0));
        assert_close(set.commutator_trace(), c(-2.0, 0.0));
    }

    #[test]
    fn test_kissing_schottky_inverses() {
        let set = kissing_schottky(1.0, 0.5).unwrap();
        for i in 0..2 {
            let product = set.generators[i] * set.generators[i + 2];
            assert!(product.approx_eq(&MobiusTransformation::identity(), 1e-9));
        }
    }

    #[test]
    fn test_kissing_schottky_pairs_circles() {
        let set = kissing_schottky(1.0, 0.5).unwrap();
        let circles = set.circles.unwrap();
        for i in 0..4 {
            let image = set.generators[i].apply_circle(&circles[(i + 2) % 4]).unwrap();
            let GeneralizedCircle::Circle(image) = image else {
                panic!("pairing circle mapped to a line");
            };
            assert_relative_eq!(image.center().re, circles[i].center().re, epsilon = 1e-9);
            assert_relative_eq!(image.center().im, circles[i].center().im, epsilon = 1e-9);
            assert_relative_eq!(image.radius(), circles[i].radius(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_kissing_circles_are_tangent() {
        let set = kissing_schottky(1.0, 0.5).unwrap();
        let circles = set.circles.unwrap();
        for (i, j) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            let gap = (circles[i].center() - circles[j].center()).norm()
                - circles[i].radius()
                - circles[j].radius();
            assert!(gap.abs() < 1e-9, "circles {i} and {j} are {gap} apart");
        }
    }

    #[test]
    fn test_kissing_without_circles() {
        // yv > 1 gives complex k; the group is still generated
        let set = kissing_schottky(2.0, 2.0).unwrap();
        assert!(set.circles.is_none());
        assert_eq!(set.generators.len(), 4);
    }

    #[test]
    fn test_kissing_rejects_non_positive() {
        assert!(matches!(
            kissing_schottky(0.0, 1.0),
            Err(IndraError::InvalidGeometry(_))
        ));
        assert!(kissing_schottky(1.0, -1.0).is_err());
    }

    #[test]
    fn test_grandma_traces() {
        let set = grandmas_recipe(c(2.0, 0.0), c(2.0, 0.0)).unwrap();
        let [a, b] = [set.generators[0], set.generators[1]];
        assert_close(a.trace(), c(2.0, 0.0));
        assert_close(b.trace(), c(2.0, 0.0));
        assert_close((a * b).trace(), c(2.0, -2.0));
        assert_close(set.commutator_trace(), c(-2.0, 0.0));
    }

    #[test]
    fn test_grandma_complex_traces() {
        let (ta, tb) = (c(1.87, 0.1), c(1.87, -0.1));
        let set = grandmas_recipe(ta, tb).unwrap();
        assert_close(set.generators[0].trace(), ta);
        assert_close(set.generators[1].trace(), tb);
        assert_close(set.commutator_trace(), c(-2.0, 0.0));
    }

    #[test]
    fn test_jorgensen_traces() {
        let (ta, tb) = (c(2.0, 0.0), c(3.0, 0.0));
        let set = jorgensen(ta, tb).unwrap();
        let [a, b] = [set.generators[0], set.generators[1]];
        assert_close(a.trace(), ta);
        assert_close(b.trace(), tb);
        assert_close(a.determinant(), c(1.0, 0.0));
        assert_close((a * b).trace(), parabolic_tab(ta, tb));
        assert_close(set.commutator_trace(), c(-2.0, 0.0));
    }

    #[test]
    fn test_pairing_maps_exterior_to_interior() {
        let from = Circle::new(c(-2.0, 0.0), 1.0).unwrap();
        let to = Circle::new(c(3.0, 1.0), 0.5).unwrap();
        let pairing = transform_pairing_circles(&from, &to, c(1.0, 0.0), c(0.0, 0.0)).unwrap();
        let image = pairing.apply_circle(&from).unwrap();
        let image = image.as_circle().unwrap();
        assert_relative_eq!(image.radius(), 0.5, epsilon = 1e-9);
        assert!((image.center() - to.center()).norm() < 1e-9);
        // the pole sits at the centre of `from`, so outside maps inside
        let outside = pairing.apply_point(c(10.0, 0.0).into());
        assert!(to.contains(outside));
    }

    #[test]
    fn test_pairing_with_hyperbolic_parameters() {
        let from = Circle::new(c(0.0, 0.0), 2.0).unwrap();
        let to = Circle::new(c(5.0, 0.0), 1.0).unwrap();
        let (u, v) = (c(2f64.sqrt(), 0.0), c(0.0, 1.0));
        let pairing = transform_pairing_circles(&from, &to, u, v).unwrap();
        let image = pairing.apply_circle(&from).unwrap();
        let image = image.as_circle().unwrap();
        assert_relative_eq!(image.radius(), 1.0, epsilon = 1e-9);
        assert!((image.center() - to.center()).norm() < 1e-9);
        assert!(!image.is_disk());
    }

    #[test]
    fn test_pairing_rejects_bad_parameters() {
        let from = Circle::new(c(0.0, 0.0), 1.0).unwrap();
        let to = Circle::new(c(4.0, 0.0), 1.0).unwrap();
        assert!(matches!(
            transform_pairing_circles(&from, &to, c(1.0, 0.0), c(1.0, 0.0)),
            Err(IndraError::InvalidGeometry(_))
        ));
    }
}
