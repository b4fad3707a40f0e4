//! Depth-first tracing of the limit set.
//!
//! The walk runs over the Cayley tree of reduced words with an explicit
//! stack, always descending into the rightmost child and backing up to the
//! next left turn. Consecutive accepted points are neighbours on the limit
//! curve, so a full walk can be drawn as a closed polyline.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LEVEL, RANK, VISUAL_EPS};
use crate::error::{IndraError, Result};
use crate::geometry::Point;
use crate::mobius::MobiusTransformation;
use crate::word::{Tag, Word, precedes_or_equal};

/// Termination parameters for the limit-set walk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Maximum word length before a branch is cut.
    pub max_level: usize,
    /// A branch ends once its candidate point is this close to the last
    /// accepted point.
    pub eps: f64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            eps: VISUAL_EPS,
        }
    }
}

/// Inclusive range of subtrees `[start, end]` in traversal order.
#[derive(Clone, Debug, PartialEq)]
pub struct WordRange {
    start: Word,
    end: Word,
}

impl WordRange {
    pub fn new(start: Word, end: Word) -> Result<Self> {
        if !start.precedes_or_equal(&end) {
            return Err(IndraError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &Word {
        &self.start
    }

    pub fn end(&self) -> &Word {
        &self.end
    }

    /// Leaf lies in or after the start subtree, or is an ancestor of it.
    fn admits(&self, leaf: &[Tag]) -> bool {
        let start = self.start.tags();
        precedes_or_equal(start, leaf) || start.starts_with(leaf)
    }

    /// Leaf is the last one of the end subtree: the end word followed only by
    /// left turns, or an ancestor of the end word.
    fn is_final(&self, leaf: &[Tag]) -> bool {
        let end = self.end.tags();
        if end.starts_with(leaf) {
            return true;
        }
        if !leaf.starts_with(end) {
            return false;
        }
        // after the root, the last subtree is b = left(A)
        let mut prev = end.last().copied().unwrap_or(Tag::A_INV);
        for &t in &leaf[end.len()..] {
            if t != prev.left() {
                return false;
            }
            prev = t;
        }
        true
    }

    fn is_past(&self, leaf: &[Tag]) -> bool {
        let end = self.end.tags();
        !precedes_or_equal(leaf, end) && !leaf.starts_with(end)
    }
}

/// Reference points for branch termination, one per tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchors {
    /// `begin[i]`: attracting fixed point of `g[i+1] g[i+2] … g[i+n]`, where the
    /// first branch below a word ending in `i` converges.
    pub begin: Vec<Point>,
    /// `end[i]`: attracting fixed point of `g[i-1] g[i-2] … g[i-n]`, where the
    /// last branch below a word ending in `i` converges.
    pub end: Vec<Point>,
}

impl Anchors {
    /// First point of the whole curve: the start of the `a` subtree.
    pub fn seed(&self) -> Point {
        self.begin.last().copied().unwrap_or(Point::Infinity)
    }
}

/// Attracting fixed points of the cyclic products of the generators.
pub fn commutator_fixed_points(gens: &[MobiusTransformation]) -> Anchors {
    let n = gens.len();
    let cyclic = |i: usize, forward: bool| {
        (1..=n)
            .map(|j| if forward { (i + j) % n } else { (i + 2 * n - j) % n })
            .fold(MobiusTransformation::identity(), |acc, k| acc * gens[k])
            .sink()
    };
    Anchors {
        begin: (0..n).map(|i| cyclic(i, true)).collect(),
        end: (0..n).map(|i| cyclic(i, false)).collect(),
    }
}

fn generator_array(gens: &[MobiusTransformation]) -> Result<[MobiusTransformation; RANK]> {
    gens.try_into().map_err(|_| IndraError::UnsupportedRank {
        expected: RANK,
        found: gens.len(),
    })
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    tag: Tag,
    word: MobiusTransformation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Nothing emitted yet; the first root branch is already on the stack.
    Fresh,
    Walking,
    Done,
}

/// Lazy sequence of limit-set points in boundary order.
///
/// Dropping the iterator early simply abandons the walk.
#[derive(Clone, Debug)]
pub struct LimitPoints {
    gens: [MobiusTransformation; RANK],
    anchors: [Point; RANK],
    config: TraversalConfig,
    range: Option<WordRange>,
    path: Vec<Frame>,
    last_point: Point,
    phase: Phase,
    emitted: usize,
}

impl LimitPoints {
    /// Walk the whole tree.
    pub fn new(gens: &[MobiusTransformation], config: TraversalConfig) -> Result<Self> {
        let gens = generator_array(gens)?;
        let anchors = commutator_fixed_points(&gens);
        tracing::debug!(
            max_level = config.max_level,
            eps = config.eps,
            seed = %anchors.seed(),
            "starting limit set traversal"
        );
        let end: [Point; RANK] = [anchors.end[0], anchors.end[1], anchors.end[2], anchors.end[3]];
        Ok(Self {
            gens,
            anchors: end,
            config,
            range: None,
            path: vec![Frame {
                tag: Tag::A,
                word: gens[Tag::A.index()],
            }],
            last_point: anchors.seed(),
            phase: Phase::Fresh,
            emitted: 0,
        })
    }

    /// Walk the whole tree but only yield the leaves from the start subtree
    /// through the end subtree, stopping after the last leaf of `end`.
    ///
    /// The yielded points are exactly the corresponding stretch of a full
    /// walk with the same configuration.
    pub fn with_range(
        gens: &[MobiusTransformation],
        config: TraversalConfig,
        range: WordRange,
    ) -> Result<Self> {
        let mut walk = Self::new(gens, config)?;
        tracing::debug!(start = %range.start, end = %range.end, "restricting traversal");
        walk.range = Some(range);
        Ok(walk)
    }

    /// The word of the current branch.
    pub fn current_word(&self) -> Word {
        Word::from_reduced(self.path.iter().map(|f| f.tag).collect())
    }

    /// Number of points yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Extend with rightmost children until the branch terminates, then
    /// accept the branch's candidate point.
    fn descend(&mut self) -> Point {
        while let Some(&Frame { tag, word }) = self.path.last() {
            let candidate = word.apply_point(self.anchors[tag.index()]);
            if self.path.len() > self.config.max_level
                || candidate.distance(self.last_point) < self.config.eps
            {
                self.last_point = candidate;
                break;
            }
            let next = tag.right();
            self.path.push(Frame {
                tag: next,
                word: word * self.gens[next.index()],
            });
        }
        self.last_point
    }

    /// Back up to the nearest node with an unexplored left turn and take it.
    /// Returns `false` once the whole tree has been walked.
    fn advance(&mut self) -> bool {
        let mut popped = None;
        while let Some(frame) = self.path.pop() {
            popped = Some(frame.tag);
            match self.path.last() {
                None => break,
                // left(u) == inverse(parent) would backtrack: parent exhausted
                Some(parent) if frame.tag.left() != parent.tag.inverse() => break,
                Some(_) => {}
            }
        }
        let Some(last) = popped else {
            return false;
        };

        let next = last.left();
        let word = match self.path.last() {
            Some(parent) => parent.word * self.gens[next.index()],
            None if next == Tag::A => return false,
            None => self.gens[next.index()],
        };
        self.path.push(Frame { tag: next, word });
        true
    }

    fn finish(&mut self) {
        self.phase = Phase::Done;
        tracing::debug!(points = self.emitted, "limit set traversal complete");
    }
}

impl Iterator for LimitPoints {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::Fresh => self.phase = Phase::Walking,
                Phase::Walking => {
                    if !self.advance() {
                        self.finish();
                        return None;
                    }
                }
            }

            let point = self.descend();
            tracing::trace!(
                word = %self.current_word(),
                depth = self.path.len(),
                "accepted boundary point"
            );

            let Some(range) = &self.range else {
                self.emitted += 1;
                return Some(point);
            };
            let leaf: Vec<Tag> = self.path.iter().map(|f| f.tag).collect();
            if range.is_past(&leaf) {
                self.finish();
                return None;
            }
            let admitted = range.admits(&leaf);
            if range.is_final(&leaf) {
                if admitted {
                    self.emitted += 1;
                }
                self.finish();
                return admitted.then_some(point);
            }
            if admitted {
                self.emitted += 1;
                return Some(point);
            }
        }
    }
}

/// An ordered approximation of the limit set.
///
/// `closed` is set for full traversals, where the last point connects back
/// to the first; partial traversals are a scatter of points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LimitCurve {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl LimitCurve {
    pub fn trace(gens: &[MobiusTransformation], config: TraversalConfig) -> Result<Self> {
        Ok(Self {
            points: LimitPoints::new(gens, config)?.collect(),
            closed: true,
        })
    }

    pub fn trace_range(
        gens: &[MobiusTransformation],
        config: TraversalConfig,
        range: WordRange,
    ) -> Result<Self> {
        Ok(Self {
            points: LimitPoints::with_range(gens, config, range)?.collect(),
            closed: false,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Full traversal collected into a vector.
pub fn trace_limit_set(
    gens: &[MobiusTransformation],
    config: TraversalConfig,
) -> Result<Vec<Point>> {
    Ok(LimitPoints::new(gens, config)?.collect())
}
