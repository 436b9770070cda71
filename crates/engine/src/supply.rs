//! Tile supply: the bag and the discard pile ("box lid")

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::tile::{Color, Tile};
use crate::TILE_COLORS;

/// Counts of tiles of each color in the bag and in the discard pile.
/// Tiles are values, so counts are all the bag needs to remember.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Supply {
    bag: [u8; TILE_COLORS],
    discard: [u8; TILE_COLORS],
    /// Pour the discard pile back into an empty bag before giving up on a draw
    refill_from_discard: bool,
}

impl Supply {
    /// A fresh bag holding `tiles_per_color` of every color
    pub fn full(tiles_per_color: u8, refill_from_discard: bool) -> Self {
        Self::from_counts([tiles_per_color; TILE_COLORS], [0; TILE_COLORS], refill_from_discard)
    }

    pub fn from_counts(
        bag: [u8; TILE_COLORS],
        discard: [u8; TILE_COLORS],
        refill_from_discard: bool,
    ) -> Self {
        Supply {
            bag,
            discard,
            refill_from_discard,
        }
    }

    /// Draw a single random tile from the bag.
    /// Returns None if nothing can be drawn.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<Tile> {
        if self.bag_count() == 0 {
            if !self.refill_from_discard || self.discard_count() == 0 {
                return None;
            }
            debug!(tiles = self.discard_count(), "refilling bag from discard");
            self.bag = self.discard;
            self.discard = [0; TILE_COLORS];
        }

        let total = self.bag_count() as u32;
        let mut pick = rng.random_range(0..total);
        for (i, count) in self.bag.iter_mut().enumerate() {
            let c = u32::from(*count);
            if pick < c {
                *count -= 1;
                return Color::from_index(i as u8).map(Tile::new);
            }
            pick -= c;
        }

        unreachable!("pick is below the bag total")
    }

    /// Tiles leaving play this round go to the discard pile
    pub fn discard(&mut self, tile: Tile) {
        self.discard[tile.color().index()] += 1;
    }

    pub fn discard_all(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        for tile in tiles {
            self.discard(tile);
        }
    }

    pub fn bag_count(&self) -> usize {
        self.bag.iter().map(|&c| usize::from(c)).sum()
    }

    pub fn discard_count(&self) -> usize {
        self.discard.iter().map(|&c| usize::from(c)).sum()
    }

    /// Tiles of `color` in bag and discard together
    pub fn count(&self, color: Color) -> usize {
        usize::from(self.bag[color.index()]) + usize::from(self.discard[color.index()])
    }

    pub fn bag(&self) -> &[u8; TILE_COLORS] {
        &self.bag
    }

    pub fn discarded(&self) -> &[u8; TILE_COLORS] {
        &self.discard
    }

    #[cfg(test)]
    pub(crate) fn take_from_bag(&mut self, color: Color) -> Option<Tile> {
        let count = &mut self.bag[color.index()];
        *count = count.checked_sub(1)?;
        Some(Tile::new(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::ALL_COLORS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_draw_empties_bag_exactly() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut supply = Supply::full(2, false);

        let mut drawn = [0u8; TILE_COLORS];
        while let Some(tile) = supply.draw(&mut rng) {
            drawn[tile.color().index()] += 1;
        }
        assert_eq!(drawn, [2; TILE_COLORS]);
        assert_eq!(supply.bag_count(), 0);
    }

    #[test]
    fn test_refill_from_discard() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut supply = Supply::from_counts([0; TILE_COLORS], [0, 3, 0, 0, 0], true);

        let tile = supply.draw(&mut rng).unwrap();
        assert_eq!(tile.color(), Color::Blue);
        assert_eq!(supply.bag_count(), 2);
        assert_eq!(supply.discard_count(), 0);
    }

    #[test]
    fn test_no_refill_when_disabled() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut supply = Supply::from_counts([0; TILE_COLORS], [4; TILE_COLORS], false);

        assert_eq!(supply.draw(&mut rng), None);
        assert_eq!(supply.discard_count(), 20);
    }

    #[test]
    fn test_discard_counts_per_color() {
        let mut supply = Supply::from_counts([0; TILE_COLORS], [0; TILE_COLORS], true);
        supply.discard_all([Tile::new(Color::Red), Tile::new(Color::Red)]);

        for color in ALL_COLORS {
            let expected = if color == Color::Red { 2 } else { 0 };
            assert_eq!(supply.count(color), expected);
        }
    }
}
