/// Absolute tolerance for algebraic checks: determinants, poles, denominators
/// and approximate equality of points, circles and matrices.
pub const EPSILON: f64 = 1e-12;

/// Default convergence tolerance for branch termination. Two accepted
/// boundary points closer than this are considered the same pixel.
pub const VISUAL_EPS: f64 = 1e-3;

/// Default maximum word length explored by the traversals.
pub const MAX_LEVEL: usize = 20;

/// Number of generators (a, b, A, B) the tree traversals support.
pub const RANK: usize = 4;
