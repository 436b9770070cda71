//! Move representation: where tiles come from and where they go

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tile::Color;

/// Source of tiles for drafting
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// Factory index 0..factory_count-1
    Factory { index: u8 },
    /// The table's center pile
    Table,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Factory { index } => write!(f, "factory {index}"),
            Source::Table => f.write_str("table"),
        }
    }
}

/// Destination for drafted tiles
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    /// Staging row 1..=5 (row n has capacity n)
    Row { number: u8 },
    Floor,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Row { number } => write!(f, "row {number}"),
            Destination::Floor => f.write_str("floor"),
        }
    }
}

/// A full turn: take every tile of `color` from `source`, stage it at `dest`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub source: Source,
    pub color: Color,
    pub dest: Destination,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.source, self.color, self.dest)
    }
}
