//! Store errors.

use crate::term::Position;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The wildcard `"*"` was given as a term of a quad to insert.
    Wildcard(Position),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Wildcard(Position::Graph) => {
                write!(f, "the wildcard graph \"*\" cannot be written to")
            }
            StoreError::Wildcard(pos) => {
                write!(f, "the wildcard \"*\" cannot be stored as a {}", pos)
            }
        }
    }
}

impl std::error::Error for StoreError {}

pub type Result<T> = std::result::Result<T, StoreError>;
