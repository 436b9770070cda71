//! The table: shared center pile and the round's first-player marker

use std::collections::BTreeMap;

use tracing::debug;

use crate::action::Source;
use crate::collection::TileCollection;
use crate::error::RulesError;
use crate::tile::{Color, Marker, Tile, Token};

/// Center pile, bucketed by color. A color with no tiles has no bucket.
#[derive(Debug)]
pub struct Table {
    center_pile: BTreeMap<Color, Vec<Tile>>,
    marker: Option<Marker>,
}

impl Table {
    pub fn new(marker: Marker) -> Self {
        Table {
            center_pile: BTreeMap::new(),
            marker: Some(marker),
        }
    }

    /// Append incoming tiles to their color buckets. Only colored tiles
    /// can arrive here; the marker never returns to the table.
    pub fn add_to_center_pile(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        for tile in tiles {
            self.center_pile.entry(tile.color()).or_default().push(tile);
        }
    }

    /// Total tiles in the center pile, or tiles of one color (0 if absent)
    pub fn center_pile_count(&self, color: Option<Color>) -> usize {
        match color {
            None => self.center_pile.values().map(Vec::len).sum(),
            Some(c) => self.center_pile.get(&c).map_or(0, Vec::len),
        }
    }

    /// Take every tile of `color`, plus the marker if nobody has claimed it yet.
    pub fn take(&mut self, color: Color) -> Result<TileCollection, RulesError> {
        let tiles = self
            .center_pile
            .remove(&color)
            .filter(|bucket| !bucket.is_empty())
            .ok_or(RulesError::EmptyTake {
                origin: Source::Table,
                color,
            })?;

        let mut taken = TileCollection::from_tiles(tiles);
        if let Some(marker) = self.marker.take() {
            debug!(%color, "first take from the table claims the marker");
            taken.add_marker(marker);
        }
        Ok(taken)
    }

    /// Per-color buckets in color order
    pub fn center_pile(&self) -> impl Iterator<Item = (Color, &[Tile])> + '_ {
        self.center_pile.iter().map(|(&c, tiles)| (c, tiles.as_slice()))
    }

    /// Marker (if present) followed by the center pile, for rendering
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.marker
            .as_ref()
            .map(|_| Token::Marker)
            .into_iter()
            .chain(self.center_pile.values().flatten().map(|&t| Token::Tile(t)))
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    /// No colored tiles left. The marker alone does not count.
    pub fn is_empty(&self) -> bool {
        self.center_pile.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(colors: &[Color]) -> Table {
        let mut table = Table::new(Marker::new());
        table.add_to_center_pile(colors.iter().copied().map(Tile::new));
        table
    }

    #[test]
    fn test_add_partitions_by_color() {
        let table = table_with(&[Color::Red, Color::Black, Color::Red]);

        assert_eq!(table.center_pile_count(None), 3);
        assert_eq!(table.center_pile_count(Some(Color::Red)), 2);
        assert_eq!(table.center_pile_count(Some(Color::Black)), 1);
        assert_eq!(table.center_pile_count(Some(Color::Yellow)), 0);
    }

    #[test]
    fn test_first_take_claims_marker() {
        let mut table = table_with(&[Color::Red, Color::Red, Color::Blue]);

        let taken = table.take(Color::Red).unwrap();
        assert_eq!(taken.count(Some(Color::Red)), 2);
        assert_eq!(taken.count(None), 2);
        assert!(taken.has_marker());
        assert!(!table.has_marker());

        let taken = table.take(Color::Blue).unwrap();
        assert_eq!(taken.count(None), 1);
        assert!(!taken.has_marker(), "marker is claimed at most once");
    }

    #[test]
    fn test_take_removes_bucket() {
        let mut table = table_with(&[Color::Cyan, Color::Cyan, Color::Yellow]);
        table.take(Color::Cyan).unwrap();

        assert_eq!(table.center_pile_count(Some(Color::Cyan)), 0);
        assert!(table.center_pile().all(|(c, _)| c != Color::Cyan));
        assert_eq!(table.center_pile_count(None), 1);
    }

    #[test]
    fn test_take_absent_color_is_empty_take() {
        let mut table = table_with(&[Color::Red]);

        let err = table.take(Color::Black).unwrap_err();
        assert_eq!(
            err,
            RulesError::EmptyTake {
                origin: Source::Table,
                color: Color::Black
            }
        );
        // Nothing moved
        assert_eq!(table.center_pile_count(None), 1);
        assert!(table.has_marker());
    }

    #[test]
    fn test_refilling_keeps_the_single_marker() {
        let mut table = table_with(&[Color::Red]);
        table.add_to_center_pile([Tile::new(Color::Red), Tile::new(Color::Blue)]);
        assert!(table.has_marker());
        assert_eq!(table.center_pile_count(Some(Color::Red)), 2);

        let taken = table.take(Color::Red).unwrap();
        assert!(taken.has_marker());
        assert_eq!(taken.len(), 3);

        // Tiles arriving after the claim do not bring a marker back
        table.add_to_center_pile([Tile::new(Color::Red)]);
        assert!(!table.has_marker());
        let taken = table.take(Color::Red).unwrap();
        assert!(!taken.has_marker());
        assert_eq!(
            table.tokens().collect::<Vec<_>>(),
            vec![Token::Tile(Tile::new(Color::Blue))]
        );
    }

    #[test]
    fn test_marker_alone_is_empty() {
        let table = Table::new(Marker::new());
        assert!(table.is_empty());
        assert!(table.has_marker());
        assert_eq!(table.tokens().collect::<Vec<_>>(), vec![Token::Marker]);
    }
}
