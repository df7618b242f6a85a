//! Square identifiers and piece keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Any way of naming a square: a label such as `"e4"`, a flat row major index,
/// or a `[col, row]` pair counted from the top left.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SquareId {
    Label(String),
    Index(usize),
    Coords(usize, usize),
}

impl fmt::Display for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareId::Label(label) => write!(f, "'{label}'"),
            SquareId::Index(index) => write!(f, "#{index}"),
            SquareId::Coords(col, row) => write!(f, "[{col}, {row}]"),
        }
    }
}

impl From<&str> for SquareId {
    fn from(label: &str) -> Self {
        SquareId::Label(label.to_string())
    }
}

impl From<String> for SquareId {
    fn from(label: String) -> Self {
        SquareId::Label(label)
    }
}

impl From<&String> for SquareId {
    fn from(label: &String) -> Self {
        SquareId::Label(label.clone())
    }
}

impl From<usize> for SquareId {
    fn from(index: usize) -> Self {
        SquareId::Index(index)
    }
}

impl From<(usize, usize)> for SquareId {
    fn from((col, row): (usize, usize)) -> Self {
        SquareId::Coords(col, row)
    }
}

impl From<[usize; 2]> for SquareId {
    fn from([col, row]: [usize; 2]) -> Self {
        SquareId::Coords(col, row)
    }
}

/// A piece on a square: `{color}{type}` such as `"wn"`, or a single opaque key
/// for piece sets whose artwork is already coloured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceKey(String);

impl PieceKey {
    pub fn new(key: impl Into<String>) -> Self {
        PieceKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a two character key into its color and type characters.
    pub fn split(&self) -> Option<(char, char)> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(color), Some(kind), None) => Some((color, kind)),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceKey {
    fn from(key: &str) -> Self {
        PieceKey(key.to_string())
    }
}

impl From<String> for PieceKey {
    fn from(key: String) -> Self {
        PieceKey(key)
    }
}

impl PartialEq<&str> for PieceKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One cell of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square {
    label: String,
    pub piece: Option<PieceKey>,
}

impl Square {
    pub(crate) fn new(label: String) -> Self {
        Self { label, piece: None }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
