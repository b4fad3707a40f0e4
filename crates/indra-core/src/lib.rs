//! Limit sets of two-generator Kleinian groups.
//!
//! Möbius transformations act on the extended complex plane; words in the
//! generators `a, b, A, B` index a Cayley tree whose depth-first walk
//! visits the limit set in order along the curve. Recipes build generator
//! pairs, tiles enumerate circle images, and traversal yields the points.
//!
//! Zero I/O: pure math engine with no opinions about plotting or storage.

pub mod constants;
pub mod error;
pub mod export;
pub mod geometry;
pub mod limit;
pub mod mobius;
pub mod recipes;
pub mod tiles;
pub mod word;

pub use constants::{EPSILON, MAX_LEVEL, RANK, VISUAL_EPS};
pub use error::{IndraError, Result};
pub use export::{FORMAT_VERSION, export_json, import_json};
pub use geometry::{Circle, GeneralizedCircle, Line, Point};
pub use limit::{
    Anchors, LimitCurve, LimitPoints, TraversalConfig, WordRange, commutator_fixed_points,
    trace_limit_set,
};
pub use mobius::{MobiusTransformation, Operand};
pub use recipes::{
    GeneratorSet, grandmas_recipe, jorgensen, kissing_schottky, transform_pairing_circles,
};
pub use tiles::{Tile, TileConfig, Tiles};
pub use word::{Tag, Word, is_reduced, precedes_or_equal};
