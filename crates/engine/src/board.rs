//! Player board: staging rows, the 5x5 wall, the floor line and the score

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::Destination;
use crate::collection::TileCollection;
use crate::config::BonusTable;
use crate::error::{PlacementConflict, RulesError};
use crate::supply::Supply;
use crate::tile::{Color, Marker, Tile, Token, ALL_COLORS};
use crate::{Score, BOARD_SIZE, FLOOR_CAPACITY, TILE_COLORS};

// =============================================================================
// Wall layout
// =============================================================================

/// Wall pattern: WALL_PATTERN[row][col] = Color permitted at that cell.
/// Each row is the previous one rotated right by one cell.
pub const WALL_PATTERN: [[Color; BOARD_SIZE]; BOARD_SIZE] = [
    [Color::Blue, Color::Yellow, Color::Red, Color::Black, Color::Cyan],
    [Color::Cyan, Color::Blue, Color::Yellow, Color::Red, Color::Black],
    [Color::Black, Color::Cyan, Color::Blue, Color::Yellow, Color::Red],
    [Color::Red, Color::Black, Color::Cyan, Color::Blue, Color::Yellow],
    [Color::Yellow, Color::Red, Color::Black, Color::Cyan, Color::Blue],
];

/// Destination column lookup: WALL_COLUMN[row][color.index()] => col.
/// Built from WALL_PATTERN at compile time.
pub const WALL_COLUMN: [[u8; TILE_COLORS]; BOARD_SIZE] = wall_columns();

const fn wall_columns() -> [[u8; TILE_COLORS]; BOARD_SIZE] {
    let mut table = [[u8::MAX; TILE_COLORS]; BOARD_SIZE];
    let mut row = 0;
    while row < BOARD_SIZE {
        let mut col = 0;
        while col < BOARD_SIZE {
            let color = WALL_PATTERN[row][col] as usize;
            assert!(table[row][color] == u8::MAX, "wall row repeats a color");
            table[row][color] = col as u8;
            col += 1;
        }
        row += 1;
    }

    // Columns must be permutations too
    let mut col = 0;
    while col < BOARD_SIZE {
        let mut seen = [false; TILE_COLORS];
        let mut row = 0;
        while row < BOARD_SIZE {
            let color = WALL_PATTERN[row][col] as usize;
            assert!(!seen[color], "wall column repeats a color");
            seen[color] = true;
            row += 1;
        }
        col += 1;
    }
    table
}

/// Points lost for each floor slot, first to seventh. Later slots cost nothing.
pub const FLOOR_PENALTY: [Score; FLOOR_CAPACITY] = [1, 1, 2, 2, 2, 3, 3];

// =============================================================================
// Staging rows
// =============================================================================

/// A single staging row ("pattern line"); row n holds up to n tiles of one color
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatternLine {
    capacity: u8,
    tiles: Vec<Tile>,
}

impl PatternLine {
    fn new(capacity: u8) -> Self {
        PatternLine {
            capacity,
            tiles: Vec::with_capacity(capacity as usize),
        }
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// None => empty; Some(c) => all tiles are c
    pub fn color(&self) -> Option<Color> {
        self.tiles.first().map(Tile::color)
    }

    pub fn empty_slots_count(&self) -> usize {
        self.capacity as usize - self.tiles.len()
    }

    pub fn is_full(&self) -> bool {
        self.empty_slots_count() == 0
    }
}

// =============================================================================
// Wall
// =============================================================================

/// 5x5 wall. Rows and columns here are 0-based; a filled cell is never cleared.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Wall {
    cells: [[Option<Tile>; BOARD_SIZE]; BOARD_SIZE],
}

impl Wall {
    #[inline]
    pub fn column_for(row: usize, color: Color) -> usize {
        WALL_COLUMN[row][color.index()] as usize
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells[row][col]
    }

    pub fn is_filled(&self, row: usize, color: Color) -> bool {
        self.cells[row][Self::column_for(row, color)].is_some()
    }

    /// Fill the cell for `tile` in `row`, returning its column
    fn fill(&mut self, row: usize, tile: Tile) -> usize {
        let col = Self::column_for(row, tile.color());
        debug_assert!(self.cells[row][col].is_none(), "wall cell filled twice");
        self.cells[row][col] = Some(tile);
        col
    }

    /// Points for the tile just placed at (row, col): the horizontal run and
    /// the vertical run through it each count when longer than one; an
    /// isolated tile scores 1.
    pub fn score_placement(&self, row: usize, col: usize) -> Score {
        let filled = |r: usize, c: usize| self.cells[r][c].is_some();

        let horiz = 1
            + (0..col).rev().take_while(|&c| filled(row, c)).count()
            + (col + 1..BOARD_SIZE).take_while(|&c| filled(row, c)).count();
        let vert = 1
            + (0..row).rev().take_while(|&r| filled(r, col)).count()
            + (row + 1..BOARD_SIZE).take_while(|&r| filled(r, col)).count();

        if horiz == 1 && vert == 1 {
            return 1;
        }
        let h_score = if horiz > 1 { horiz } else { 0 };
        let v_score = if vert > 1 { vert } else { 0 };
        (h_score + v_score) as Score
    }

    pub fn is_row_complete(&self, row: usize) -> bool {
        self.cells[row].iter().all(Option::is_some)
    }

    pub fn is_column_complete(&self, col: usize) -> bool {
        self.cells.iter().all(|row| row[col].is_some())
    }

    pub fn is_color_complete(&self, color: Color) -> bool {
        (0..BOARD_SIZE).all(|row| self.is_filled(row, color))
    }

    pub fn completed_rows(&self) -> usize {
        (0..BOARD_SIZE).filter(|&r| self.is_row_complete(r)).count()
    }

    pub fn completed_columns(&self) -> usize {
        (0..BOARD_SIZE).filter(|&c| self.is_column_complete(c)).count()
    }

    pub fn completed_colors(&self) -> usize {
        ALL_COLORS.iter().filter(|&&c| self.is_color_complete(c)).count()
    }

    pub fn has_complete_row(&self) -> bool {
        self.completed_rows() > 0
    }

    pub fn count(&self, color: Color) -> usize {
        (0..BOARD_SIZE).filter(|&r| self.is_filled(r, color)).count()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }
}

// =============================================================================
// Floor line
// =============================================================================

/// Penalty area. Holds any number of tiles plus possibly the marker.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct Floor {
    tiles: Vec<Tile>,
    marker: Option<Marker>,
}

impl Floor {
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    /// Tiles plus the marker
    pub fn len(&self) -> usize {
        self.tiles.len() + usize::from(self.marker.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marker first (it is placed with the take that claimed it), then tiles
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.marker
            .as_ref()
            .map(|_| Token::Marker)
            .into_iter()
            .chain(self.tiles.iter().map(|&t| Token::Tile(t)))
    }

    /// Points the current floor would cost; the marker occupies a slot
    pub fn penalty(&self) -> Score {
        FLOOR_PENALTY.iter().take(self.len()).sum()
    }

    pub fn count(&self, color: Color) -> usize {
        self.tiles.iter().filter(|t| t.is_same_color(color)).count()
    }

    fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    fn put_marker(&mut self, marker: Marker) {
        debug_assert!(self.marker.is_none());
        self.marker = Some(marker);
    }

    fn clear(&mut self) -> (Vec<Tile>, Option<Marker>) {
        (std::mem::take(&mut self.tiles), self.marker.take())
    }
}

// =============================================================================
// Results
// =============================================================================

/// Where a placement's tiles ended up
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Placement {
    pub staged: usize,
    pub to_floor: usize,
    pub marker: bool,
}

/// One tile moved from a full staging row to the wall
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    /// Staging row number, 1..=5
    pub row: u8,
    /// Wall column, 0-based
    pub column: u8,
    pub color: Color,
    pub points: Score,
}

/// Outcome of one board's wall-tiling pass
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct WallTilingReport {
    pub placements: Vec<WallPlacement>,
    /// Nominal floor penalty before clamping
    pub floor_penalty: Score,
    pub floor_tiles: usize,
    pub score_before: Score,
    pub score_after: Score,
}

/// Bonus breakdown applied at game end
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EndGameBonus {
    pub rows: usize,
    pub columns: usize,
    pub colors: usize,
    pub points: Score,
}

// =============================================================================
// Board
// =============================================================================

/// Complete state for one player
#[derive(Debug, Eq, PartialEq)]
pub struct Board {
    rows: [PatternLine; BOARD_SIZE],
    wall: Wall,
    floor: Floor,
    score: Score,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            rows: std::array::from_fn(|i| PatternLine::new(i as u8 + 1)),
            wall: Wall::default(),
            floor: Floor::default(),
            score: 0,
        }
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn row_numbers() -> std::ops::RangeInclusive<u8> {
        1..=BOARD_SIZE as u8
    }

    /// Staging row by number, 1..=5
    pub fn row(&self, number: u8) -> Option<&PatternLine> {
        (number as usize).checked_sub(1).and_then(|i| self.rows.get(i))
    }

    pub fn rows(&self) -> &[PatternLine; BOARD_SIZE] {
        &self.rows
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Validate a destination for tiles of `color` without touching anything
    pub fn check_placement(&self, dest: Destination, color: Color) -> Result<(), RulesError> {
        let Destination::Row { number } = dest else {
            return Ok(());
        };
        let illegal = |conflict| RulesError::IllegalPlacement {
            destination: dest,
            color,
            conflict,
        };

        let line = self
            .row(number)
            .ok_or(illegal(PlacementConflict::NoSuchRow))?;
        if let Some(existing) = line.color().filter(|&c| c != color) {
            return Err(illegal(PlacementConflict::RowHoldsOtherColor(existing)));
        }
        if self.wall.is_filled(number as usize - 1, color) {
            return Err(illegal(PlacementConflict::WallCellFilled));
        }
        Ok(())
    }

    /// Destinations that accept tiles of `color`; the floor is always one
    pub fn legal_destinations(&self, color: Color) -> impl Iterator<Item = Destination> + '_ {
        Self::row_numbers()
            .map(|number| Destination::Row { number })
            .chain(std::iter::once(Destination::Floor))
            .filter(move |&dest| self.check_placement(dest, color).is_ok())
    }

    /// Stage a freshly taken, single-color collection.
    ///
    /// On success `tiles` is drained: what fits goes to the row, the surplus
    /// and the marker go to the floor. On failure nothing moves.
    pub fn place(
        &mut self,
        dest: Destination,
        tiles: &mut TileCollection,
    ) -> Result<Placement, RulesError> {
        if let Some(first) = tiles.iter().next().map(Tile::color) {
            if tiles.color().is_none() {
                return Err(RulesError::IllegalPlacement {
                    destination: dest,
                    color: first,
                    conflict: PlacementConflict::MixedColors,
                });
            }
            self.check_placement(dest, first)?;
        }

        let (taken, marker) = std::mem::take(tiles).into_parts();
        let mut placement = Placement {
            staged: 0,
            to_floor: 0,
            marker: marker.is_some(),
        };

        let mut overflow = taken.into_iter();
        let line = match dest {
            Destination::Row { number } => (number as usize)
                .checked_sub(1)
                .and_then(|i| self.rows.get_mut(i)),
            Destination::Floor => None,
        };
        if let Some(line) = line {
            let before = line.len();
            let room = line.empty_slots_count();
            line.tiles.extend(overflow.by_ref().take(room));
            placement.staged = line.len() - before;
        }
        let before = self.floor.tiles.len();
        overflow.for_each(|tile| self.floor.push(tile));
        placement.to_floor = self.floor.tiles.len() - before;

        if let Some(marker) = marker {
            self.floor.put_marker(marker);
        }
        Ok(placement)
    }

    /// End-of-round pass: move one tile of every full row to the wall and
    /// score it, discard the rest of the row, then charge the floor.
    pub fn tile_wall(&mut self, supply: &mut Supply) -> WallTilingReport {
        let score_before = self.score;
        let mut placements = Vec::new();

        for (r, line) in self.rows.iter_mut().enumerate() {
            if !line.is_full() {
                continue;
            }
            let mut tiles = std::mem::take(&mut line.tiles).into_iter();
            let Some(tile) = tiles.next() else {
                continue;
            };
            supply.discard_all(tiles);

            let col = self.wall.fill(r, tile);
            let points = self.wall.score_placement(r, col);
            self.score = self.score.saturating_add(points);
            debug!(row = r + 1, col, color = %tile.color(), points, "wall placement");

            placements.push(WallPlacement {
                row: r as u8 + 1,
                column: col as u8,
                color: tile.color(),
                points,
            });
        }

        let floor_penalty = self.floor.penalty();
        let floor_tiles = self.floor.len();
        self.score = self.score.saturating_sub(floor_penalty);

        // The marker leaves play here; tiles go to the lid
        let (tiles, _marker) = self.floor.clear();
        supply.discard_all(tiles);

        WallTilingReport {
            placements,
            floor_penalty,
            floor_tiles,
            score_before,
            score_after: self.score,
        }
    }

    /// Add end-game bonuses for completed rows, columns and colors
    pub fn apply_end_game_bonus(&mut self, bonus: &BonusTable) -> EndGameBonus {
        let rows = self.wall.completed_rows();
        let columns = self.wall.completed_columns();
        let colors = self.wall.completed_colors();
        let points = (rows as Score)
            .saturating_mul(bonus.row)
            .saturating_add((columns as Score).saturating_mul(bonus.column))
            .saturating_add((colors as Score).saturating_mul(bonus.color));
        self.score = self.score.saturating_add(points);

        EndGameBonus {
            rows,
            columns,
            colors,
            points,
        }
    }

    /// Tiles of `color` anywhere on this board
    pub fn count(&self, color: Color) -> usize {
        let staged: usize = self
            .rows
            .iter()
            .filter(|l| l.color() == Some(color))
            .map(PatternLine::len)
            .sum();
        staged + self.wall.count(color) + self.floor.count(color)
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    #[cfg(test)]
    pub(crate) fn fill_wall(&mut self, row: usize, color: Color) {
        self.wall.fill(row, Tile::new(color));
    }
}
