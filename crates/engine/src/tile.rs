//! Tiles, colors and the first-player marker

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TILE_COLORS;

/// Tile colors (order fixed: indexes into per-color count tables)
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black = 0,
    Blue = 1,
    Cyan = 2,
    Red = 3,
    Yellow = 4,
}

impl Color {
    /// Convert from u8 index to Color
    pub fn from_index(idx: u8) -> Option<Color> {
        match idx {
            0 => Some(Color::Black),
            1 => Some(Color::Blue),
            2 => Some(Color::Cyan),
            3 => Some(Color::Red),
            4 => Some(Color::Yellow),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Cyan => "cyan",
            Color::Red => "red",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const ALL_COLORS: [Color; TILE_COLORS] = [
    Color::Black,
    Color::Blue,
    Color::Cyan,
    Color::Red,
    Color::Yellow,
];

/// A colored tile. Two tiles of the same color are interchangeable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Tile {
    color: Color,
}

impl Tile {
    pub const fn new(color: Color) -> Self {
        Tile { color }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_same_color(&self, color: Color) -> bool {
        self.color == color
    }
}

impl From<Color> for Tile {
    fn from(color: Color) -> Self {
        Tile::new(color)
    }
}

/// The first-player marker.
///
/// Only the engine can mint one, and it is neither `Clone` nor `Copy`: a
/// round's marker can be moved between the table and a floor line but never
/// duplicated.
#[derive(Debug, Eq, PartialEq)]
pub struct Marker {
    _private: (),
}

impl Marker {
    pub(crate) fn new() -> Self {
        Marker { _private: () }
    }
}

/// Read-only view of anything that can sit in a container
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Token {
    Tile(Tile),
    Marker,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_same_color_every_color() {
        for tile_color in ALL_COLORS {
            let tile = Tile::new(tile_color);
            for color in ALL_COLORS {
                assert_eq!(tile.is_same_color(color), color == tile_color);
            }
        }
    }

    #[test]
    fn test_color_index_roundtrip() {
        for (i, color) in ALL_COLORS.iter().enumerate() {
            assert_eq!(color.index(), i);
            assert_eq!(Color::from_index(i as u8), Some(*color));
        }
        assert_eq!(Color::from_index(TILE_COLORS as u8), None);
    }

    #[test]
    fn test_tiles_compare_by_value() {
        assert_eq!(Tile::new(Color::Red), Tile::from(Color::Red));
        assert_ne!(Tile::new(Color::Red), Tile::new(Color::Cyan));
    }
}
