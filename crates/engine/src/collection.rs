//! TileCollection: the payload handed between containers during a turn

use crate::tile::{Color, Marker, Tile, Token};

/// Ordered tiles plus, at most, the round's marker.
///
/// Not `Clone`: every hand-off moves the collection.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct TileCollection {
    tiles: Vec<Tile>,
    marker: Option<Marker>,
}

impl TileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        TileCollection {
            tiles: tiles.into_iter().collect(),
            marker: None,
        }
    }

    pub fn add_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn add_marker(&mut self, marker: Marker) {
        debug_assert!(self.marker.is_none(), "collection already holds a marker");
        self.marker = Some(marker);
    }

    /// Remove the most recently added tile
    pub fn pop(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    pub fn take_marker(&mut self) -> Option<Marker> {
        self.marker.take()
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    /// Number of colored tiles, optionally only those of `color`.
    /// The marker is never counted.
    pub fn count(&self, color: Option<Color>) -> usize {
        match color {
            None => self.tiles.len(),
            Some(c) => self.tiles.iter().filter(|t| t.is_same_color(c)).count(),
        }
    }

    /// Tiles plus the marker, if held
    pub fn len(&self) -> usize {
        self.tiles.len() + usize::from(self.marker.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tiles in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles in insertion order, followed by the marker if held
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.tiles
            .iter()
            .map(|&t| Token::Tile(t))
            .chain(self.marker.as_ref().map(|_| Token::Marker))
    }

    /// The single color shared by every tile, or None if empty or mixed
    pub fn color(&self) -> Option<Color> {
        let first = self.tiles.first()?.color();
        self.tiles
            .iter()
            .all(|t| t.is_same_color(first))
            .then_some(first)
    }

    /// Split off every tile of `color`, preserving the order of both halves
    pub(crate) fn drain_color(&mut self, color: Color) -> Vec<Tile> {
        let (taken, kept): (Vec<Tile>, Vec<Tile>) =
            self.tiles.drain(..).partition(|t| t.is_same_color(color));
        self.tiles = kept;
        taken
    }

    pub fn into_parts(self) -> (Vec<Tile>, Option<Marker>) {
        (self.tiles, self.marker)
    }
}

impl FromIterator<Tile> for TileCollection {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        Self::from_tiles(iter)
    }
}

impl Extend<Tile> for TileCollection {
    fn extend<I: IntoIterator<Item = Tile>>(&mut self, iter: I) {
        self.tiles.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TileCollection {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
