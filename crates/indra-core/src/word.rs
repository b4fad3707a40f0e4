//! Tags and reduced words of the rank-2 free group `<a, b>`.
//!
//! Tags `0, 1, 2, 3` stand for `a, b, A, B` with `A = a⁻¹` and `B = b⁻¹`.
//! In this cyclic order the two neighbours of a tag are the non-backtracking
//! turns in the Cayley tree, and the inverse sits opposite.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IndraError, Result};

const LETTERS: [char; 4] = ['a', 'b', 'A', 'B'];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(u8);

impl Tag {
    pub const A: Tag = Tag(0);
    pub const B: Tag = Tag(1);
    pub const A_INV: Tag = Tag(2);
    pub const B_INV: Tag = Tag(3);

    /// Root-level visit order of the tree traversals.
    pub const ROOTS: [Tag; 4] = [Tag::A, Tag::B_INV, Tag::A_INV, Tag::B];

    pub fn new(index: usize) -> Option<Tag> {
        (index < 4).then_some(Tag(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Formal group inverse: `a ↔ A`, `b ↔ B`.
    pub fn inverse(self) -> Tag {
        Tag((self.0 + 2) % 4)
    }

    /// The neighbour visited last among a node's children.
    pub fn left(self) -> Tag {
        Tag((self.0 + 3) % 4)
    }

    /// The neighbour visited first among a node's children.
    pub fn right(self) -> Tag {
        Tag((self.0 + 1) % 4)
    }

    pub fn letter(self) -> char {
        LETTERS[self.index()]
    }

    pub fn from_letter(c: char) -> Option<Tag> {
        LETTERS.iter().position(|&l| l == c).map(|i| Tag(i as u8))
    }

    /// Position of `self` among the children of a node whose last tag is
    /// `parent` (`None` for the root): 0 for `right(parent)`, 1 for
    /// `parent`, 2 for `left(parent)` and 3 for the backtracking move.
    fn rank_after(self, parent: Option<Tag>) -> u8 {
        // the root behaves like a node below B: its first child is a
        let parent = parent.unwrap_or(Tag::B_INV);
        (parent.0 + 5 - self.0) % 4
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Whether no tag is immediately followed by its inverse.
pub fn is_reduced(tags: &[Tag]) -> bool {
    tags.windows(2).all(|w| w[1] != w[0].inverse())
}

/// Rank of each tag in the visit order of its parent, root first.
fn tree_key(tags: &[Tag]) -> impl Iterator<Item = u8> + '_ {
    tags.iter()
        .enumerate()
        .map(|(i, t)| t.rank_after(i.checked_sub(1).map(|p| tags[p])))
}

/// Whether the subtree of `first` starts at or before the subtree of
/// `second` when the tree is walked in traversal order.
///
/// Words are compared by the visit rank of each tag; a word precedes all of
/// its extensions.
pub fn precedes_or_equal(first: &[Tag], second: &[Tag]) -> bool {
    tree_key(first).cmp(tree_key(second)) != Ordering::Greater
}

/// A reduced word over `{a, b, A, B}`, e.g. `"abAB"`. The empty word is the
/// root of the Cayley tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(Vec<Tag>);

impl Word {
    pub fn new(tags: Vec<Tag>) -> Result<Self> {
        if !is_reduced(&tags) {
            let spelled: String = tags.iter().map(|t| t.letter()).collect();
            return Err(IndraError::InvalidWord(format!(
                "'{spelled}' is not reduced"
            )));
        }
        Ok(Self(tags))
    }

    /// Callers guarantee `tags` is reduced.
    pub(crate) fn from_reduced(tags: Vec<Tag>) -> Self {
        debug_assert!(is_reduced(&tags));
        Self(tags)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn tags(&self) -> &[Tag] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<Tag> {
        self.0.last().copied()
    }

    pub fn starts_with(&self, prefix: &Word) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn precedes_or_equal(&self, other: &Word) -> bool {
        precedes_or_equal(&self.0, &other.0)
    }
}

/// Traversal order: pre-order in the canonical walk of the tree.
impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering {
        tree_key(&self.0).cmp(tree_key(&other.0))
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Word {
    type Err = IndraError;

    fn from_str(s: &str) -> Result<Self> {
        let tags = s
            .chars()
            .map(|c| {
                Tag::from_letter(c).ok_or_else(|| {
                    IndraError::InvalidWord(format!("unknown letter '{c}' in '{s}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(tags)
    }
}

impl TryFrom<String> for Word {
    type Error = IndraError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Word> for String {
    fn from(w: Word) -> Self {
        w.to_string()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.0 {
            write!(f, "{}", t.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn w(s: &str) -> Word {
        s.parse().unwrap()
    }

    #[test]
    fn test_tag_identities() {
        for t in (0..4).filter_map(Tag::new) {
            assert_eq!(t.inverse().inverse(), t);
            assert_eq!(t.left().right(), t);
            assert_eq!(t.right().left(), t);
            assert_ne!(t.left(), t.inverse());
            assert_ne!(t.right(), t.inverse());
        }
        assert!(Tag::new(4).is_none());
    }

    #[test]
    fn test_tag_letters() {
        assert_eq!(Tag::A.inverse(), Tag::A_INV);
        assert_eq!(Tag::B.inverse(), Tag::B_INV);
        assert_eq!(Tag::A.right(), Tag::B);
        assert_eq!(Tag::A.left(), Tag::B_INV);
        let spelled: String = [Tag::A, Tag::B, Tag::A_INV, Tag::B_INV]
            .iter()
            .map(|t| t.letter())
            .collect();
        assert_eq!(spelled, "abAB");
        assert_eq!(Tag::from_letter('B'), Some(Tag::B_INV));
        assert_eq!(Tag::from_letter('c'), None);
    }

    #[test]
    fn test_word_roundtrip_string() {
        for s in ["", "a", "abAB", "BAbaBA", "aaab"] {
            assert_eq!(w(s).to_string(), s);
        }
    }

    #[test]
    fn test_word_rejects_bad_input() {
        assert!(matches!(
            "abx".parse::<Word>(),
            Err(IndraError::InvalidWord(_))
        ));
        assert!(matches!(
            "abBa".parse::<Word>(),
            Err(IndraError::InvalidWord(_))
        ));
    }

    #[test]
    fn test_root_order() {
        let order: Vec<Word> = Tag::ROOTS
            .iter()
            .map(|&t| Word::new(vec![t]).unwrap())
            .collect();
        assert_eq!(
            order.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            ["a", "B", "A", "b"]
        );
        for pair in order.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_children_order() {
        // children of "a" are visited b, a, B
        assert!(w("ab") < w("aa"));
        assert!(w("aa") < w("aB"));
        // children of "b" are visited A, b, a
        assert!(w("bA") < w("bb"));
        assert!(w("bb") < w("ba"));
        // a whole subtree sits between its neighbours
        assert!(w("aBBBBB") < w("B"));
        assert!(w("a") < w("abAB"));
    }

    #[test]
    fn test_precedes_or_equal_prefix() {
        assert!(precedes_or_equal(w("a").tags(), w("ab").tags()));
        assert!(!precedes_or_equal(w("ab").tags(), w("a").tags()));
        assert!(w("b").precedes_or_equal(&w("b")));
        assert!(w("").precedes_or_equal(&w("b")));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&w("aBA")).unwrap();
        assert_eq!(json, "\"aBA\"");
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w("aBA"));
        assert!(serde_json::from_str::<Word>("\"aA\"").is_err());
    }

    fn reduced_word() -> impl Strategy<Value = Word> {
        prop::collection::vec(0usize..4, 0..8).prop_map(|raw| {
            let mut tags: Vec<Tag> = Vec::new();
            for t in raw.into_iter().filter_map(Tag::new) {
                if tags.last().is_some_and(|&last| last.inverse() == t) {
                    continue;
                }
                tags.push(t);
            }
            Word::new(tags).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_precedes_reflexive(a in reduced_word()) {
            prop_assert!(a.precedes_or_equal(&a));
        }

        #[test]
        fn prop_precedes_antisymmetric(a in reduced_word(), b in reduced_word()) {
            if a.precedes_or_equal(&b) && b.precedes_or_equal(&a) {
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn prop_precedes_transitive(
            a in reduced_word(),
            b in reduced_word(),
            c in reduced_word(),
        ) {
            if a.precedes_or_equal(&b) && b.precedes_or_equal(&c) {
                prop_assert!(a.precedes_or_equal(&c));
            }
        }

        #[test]
        fn prop_precedes_total(a in reduced_word(), b in reduced_word()) {
            prop_assert!(a.precedes_or_equal(&b) || b.precedes_or_equal(&a));
        }
    }
}
