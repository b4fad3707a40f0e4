//! Tiles: images of the seed circles under reduced words.
//!
//! The tile of `t1 t2 … tk` is `(g[t1] ∘ … ∘ g[t(k-1)])(C[tk])`, nested inside
//! the tile of `t1 … t(k-1)`. Tiles shrink towards the limit set, so pruning
//! by radius gives a picture of the ordinary set at a chosen resolution.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LEVEL, RANK, VISUAL_EPS};
use crate::error::{IndraError, Result};
use crate::geometry::{Circle, GeneralizedCircle};
use crate::mobius::MobiusTransformation;
use crate::word::{Tag, Word};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Tiles at this level are reported but not subdivided.
    pub max_level: usize,
    /// Tiles with a radius at or below this are not subdivided.
    pub min_radius: f64,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            min_radius: VISUAL_EPS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub word: Word,
    /// Word length minus one; the seed circles are level 0.
    pub level: usize,
    pub disk: GeneralizedCircle,
}

#[derive(Clone, Debug)]
struct Pending {
    tags: Vec<Tag>,
    /// Composition of every generator in `tags` but the last.
    prefix: MobiusTransformation,
}

/// Depth-first enumeration of tiles, children in traversal order.
#[derive(Clone, Debug)]
pub struct Tiles {
    gens: [MobiusTransformation; RANK],
    circles: [Circle; RANK],
    config: TileConfig,
    pending: Vec<Pending>,
}

impl Tiles {
    pub fn new(
        gens: &[MobiusTransformation],
        circles: &[Circle],
        config: TileConfig,
    ) -> Result<Self> {
        let gens: [MobiusTransformation; RANK] =
            gens.try_into().map_err(|_| IndraError::UnsupportedRank {
                expected: RANK,
                found: gens.len(),
            })?;
        let circles: [Circle; RANK] =
            circles
                .try_into()
                .map_err(|_| IndraError::UnsupportedRank {
                    expected: RANK,
                    found: circles.len(),
                })?;
        let pending = Tag::ROOTS
            .iter()
            .rev()
            .map(|&t| Pending {
                tags: vec![t],
                prefix: MobiusTransformation::identity(),
            })
            .collect();
        Ok(Self {
            gens,
            circles,
            config,
            pending,
        })
    }
}

impl Iterator for Tiles {
    type Item = Result<Tile>;

    fn next(&mut self) -> Option<Result<Tile>> {
        let Pending { tags, prefix } = self.pending.pop()?;
        let last = *tags.last()?;
        let disk = match prefix.apply_circle(&self.circles[last.index()]) {
            Ok(disk) => disk,
            Err(e) => {
                tracing::warn!(word = %Word::from_reduced(tags), "tile image failed: {e}");
                return Some(Err(e));
            }
        };
        let level = tags.len() - 1;

        if level < self.config.max_level && disk.radius() > self.config.min_radius {
            let parent = prefix * self.gens[last.index()];
            // pushed in reverse so right(last) is visited first
            for child in [last.left(), last, last.right()] {
                let mut child_tags = tags.clone();
                child_tags.push(child);
                self.pending.push(Pending {
                    tags: child_tags,
                    prefix: parent,
                });
            }
        }

        Some(Ok(Tile {
            word: Word::from_reduced(tags),
            level,
            disk,
        }))
    }
}
