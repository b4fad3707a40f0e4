use std::fmt;

use crate::word::Word;

#[derive(Debug, Clone, PartialEq)]
pub enum IndraError {
    InvalidGeometry(String),
    DegenerateTransformation { determinant: f64 },
    UnsupportedRank { expected: usize, found: usize },
    InvalidRange { start: Word, end: Word },
    UnsupportedOperation(String),
    InvalidWord(String),
}

impl fmt::Display for IndraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndraError::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
            IndraError::DegenerateTransformation { determinant } => {
                write!(f, "degenerate transformation: |ad - bc| = {determinant:e}")
            }
            IndraError::UnsupportedRank { expected, found } => {
                write!(f, "unsupported rank: expected {expected} generators, got {found}")
            }
            IndraError::InvalidRange { start, end } => {
                write!(f, "invalid range: '{start}' comes after '{end}' in tree order")
            }
            IndraError::UnsupportedOperation(msg) => write!(f, "unsupported operation: {msg}"),
            IndraError::InvalidWord(msg) => write!(f, "invalid word: {msg}"),
        }
    }
}

impl std::error::Error for IndraError {}

pub type Result<T> = std::result::Result<T, IndraError>;
