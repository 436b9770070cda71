//! Factory displays

use rand::Rng;
use tracing::debug;

use crate::action::Source;
use crate::collection::TileCollection;
use crate::error::RulesError;
use crate::supply::Supply;
use crate::table::Table;
use crate::tile::{Color, Tile};
use crate::FACTORY_CAPACITY;

/// A single factory display (holds up to 4 tiles)
#[derive(Debug, Default)]
pub struct Factory {
    index: u8,
    tiles: TileCollection,
}

impl Factory {
    pub fn new(index: u8, tiles: TileCollection) -> Self {
        debug_assert!(tiles.count(None) <= FACTORY_CAPACITY);
        debug_assert!(!tiles.has_marker());
        Factory { index, tiles }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn tiles(&self) -> &[Tile] {
        self.tiles.as_slice()
    }

    pub fn tiles_count(&self) -> usize {
        self.tiles.count(None)
    }

    pub fn count(&self, color: Color) -> usize {
        self.tiles.count(Some(color))
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Take every tile of `color`; whatever remains slides to the table.
    pub fn take(&mut self, color: Color, table: &mut Table) -> Result<TileCollection, RulesError> {
        if self.count(color) == 0 {
            return Err(RulesError::EmptyTake {
                origin: Source::Factory { index: self.index },
                color,
            });
        }

        let taken = TileCollection::from_tiles(self.tiles.drain_color(color));
        // Factories are dealt from the bag and never hold the marker
        let (rest, _) = std::mem::take(&mut self.tiles).into_parts();
        debug!(
            factory = self.index,
            %color,
            taken = taken.count(None),
            to_table = rest.len(),
            "factory emptied"
        );
        table.add_to_center_pile(rest);
        Ok(taken)
    }
}

/// All factories of one round, in display order
#[derive(Debug, Default)]
pub struct FactoryCollection {
    factories: Vec<Factory>,
}

impl FactoryCollection {
    /// Deal up to 4 tiles from the supply into each of `count` factories.
    /// Factories dealt after the supply runs dry stay short or empty.
    pub fn deal(count: u8, supply: &mut Supply, rng: &mut impl Rng) -> Self {
        let factories = (0..count)
            .map(|index| {
                let tiles = (0..FACTORY_CAPACITY)
                    .map_while(|_| supply.draw(rng))
                    .collect();
                Factory::new(index, tiles)
            })
            .collect();
        FactoryCollection { factories }
    }

    pub fn from_factories(factories: Vec<Factory>) -> Self {
        FactoryCollection { factories }
    }

    pub fn get(&self, index: u8) -> Option<&Factory> {
        self.factories.get(index as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Factory> {
        self.factories.iter()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn all_empty(&self) -> bool {
        self.factories.iter().all(Factory::is_empty)
    }

    pub fn total_tiles(&self) -> usize {
        self.factories.iter().map(Factory::tiles_count).sum()
    }

    pub fn count(&self, color: Color) -> usize {
        self.factories.iter().map(|f| f.count(color)).sum()
    }

    pub fn take(
        &mut self,
        index: u8,
        color: Color,
        table: &mut Table,
    ) -> Result<TileCollection, RulesError> {
        self.factories
            .get_mut(index as usize)
            .ok_or(RulesError::NoSuchFactory { index })?
            .take(color, table)
    }
}

impl<'a> IntoIterator for &'a FactoryCollection {
    type Item = &'a Factory;
    type IntoIter = std::slice::Iter<'a, Factory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
