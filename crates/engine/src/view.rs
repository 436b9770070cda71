//! Serializable read-only snapshots for renderers and logs

use serde::Serialize;

use crate::action::Source;
use crate::board::{Board, WALL_PATTERN};
use crate::game::{Game, GamePhase};
use crate::round::RoundPhase;
use crate::tile::{Color, Token};
use crate::{PlayerIdx, Score, BOARD_SIZE};

#[derive(Clone, Debug, Serialize)]
pub struct FactoryView {
    pub index: u8,
    pub tiles: Vec<Color>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TableView {
    pub marker: bool,
    pub tiles: Vec<Color>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RowView {
    pub capacity: u8,
    pub color: Option<Color>,
    pub count: usize,
    pub empty_slots: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct BoardView {
    pub rows: Vec<RowView>,
    /// wall[row][col]: Some(color) once filled
    pub wall: Vec<Vec<Option<Color>>>,
    pub floor: Vec<Option<Color>>,
    pub floor_penalty: Score,
    pub score: Score,
}

#[derive(Clone, Debug, Serialize)]
pub struct PendingView {
    pub player: PlayerIdx,
    pub source: Source,
    pub color: Color,
    pub count: usize,
    pub marker: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameView {
    pub phase: GamePhase,
    pub round_phase: RoundPhase,
    pub current_player: PlayerIdx,
    pub factories: Vec<FactoryView>,
    pub table: TableView,
    pub pending: Option<PendingView>,
    pub boards: Vec<BoardView>,
    pub bag: usize,
    pub discard: usize,
}

impl From<&Board> for BoardView {
    fn from(board: &Board) -> Self {
        let rows = board
            .rows()
            .iter()
            .map(|line| RowView {
                capacity: line.capacity(),
                color: line.color(),
                count: line.len(),
                empty_slots: line.empty_slots_count(),
            })
            .collect();

        let wall = (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| board.wall().cell(row, col).map(|t| t.color()))
                    .collect()
            })
            .collect();

        // None stands for the marker
        let floor = board
            .floor()
            .tokens()
            .map(|token| match token {
                Token::Tile(t) => Some(t.color()),
                Token::Marker => None,
            })
            .collect();

        BoardView {
            rows,
            wall,
            floor,
            floor_penalty: board.floor().penalty(),
            score: board.score(),
        }
    }
}

impl Game {
    /// Snapshot of everything a renderer needs
    pub fn view(&self) -> GameView {
        let round = self.round();

        let factories = round
            .factories()
            .iter()
            .map(|f| FactoryView {
                index: f.index(),
                tiles: f.tiles().iter().map(|t| t.color()).collect(),
            })
            .collect();

        let table = TableView {
            marker: round.table().has_marker(),
            tiles: round
                .table()
                .center_pile()
                .flat_map(|(_, tiles)| tiles.iter().map(|t| t.color()))
                .collect(),
        };

        let pending = round.pending_take().map(|p| PendingView {
            player: p.player,
            source: p.source,
            color: p.color,
            count: p.tiles.count(None),
            marker: p.tiles.has_marker(),
        });

        GameView {
            phase: self.phase(),
            round_phase: round.phase(),
            current_player: round.current_player(),
            factories,
            table,
            pending,
            boards: self.boards().iter().map(BoardView::from).collect(),
            bag: self.supply().bag_count(),
            discard: self.supply().discard_count(),
        }
    }
}

/// Expected color of an empty wall cell
pub fn wall_color(row: usize, col: usize) -> Color {
    WALL_PATTERN[row][col]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_view_reflects_fresh_game() {
        let mut rng = StdRng::seed_from_u64(42);
        let (game, _) = Game::start(GameConfig::for_players(3), &mut rng).unwrap();

        let view = game.view();
        assert_eq!(view.factories.len(), 7);
        assert!(view.factories.iter().all(|f| f.tiles.len() == 4));
        assert!(view.table.marker);
        assert!(view.table.tiles.is_empty());
        assert_eq!(view.boards.len(), 3);
        assert_eq!(view.boards[0].rows[4].empty_slots, 5);
        assert_eq!(view.bag, 100 - 28);
        assert!(view.pending.is_none());
    }
}
