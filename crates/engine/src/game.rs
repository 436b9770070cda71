//! Game: the sequence of rounds, the tile supply and end-of-game scoring

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, instrument};

use crate::action::{Destination, Move, Source};
use crate::board::{Board, EndGameBonus};
use crate::collection::TileCollection;
use crate::config::GameConfig;
use crate::error::{ConfigError, OutOfOrder, RulesError};
use crate::event::GameEvent;
use crate::round::{GameRound, RoundPhase};
use crate::supply::Supply;
use crate::tile::{Color, ALL_COLORS};
use crate::{PlayerIdx, Score, TILE_COLORS};

/// Game status
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// A round is being drafted
    InRound,
    /// Terminal; no more actions
    Finished,
}

/// Complete game state: boards persist across rounds, the round is replaced
/// at each boundary.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    boards: Vec<Board>,
    supply: Supply,
    round: GameRound,
    phase: GamePhase,
    bonuses: Option<Vec<EndGameBonus>>,
}

impl Game {
    /// Fill the bag, set out the boards and deal the first round.
    #[instrument(skip(rng))]
    pub fn start(
        config: GameConfig,
        rng: &mut impl Rng,
    ) -> Result<(Self, Vec<GameEvent>), ConfigError> {
        config.validate()?;

        let mut supply = Supply::full(config.tiles_per_color, config.refill_bag_from_discard);
        let boards = (0..config.players).map(|_| Board::new()).collect();
        let (round, created) = GameRound::deal(&config, config.first_player, &mut supply, rng);

        let mut game = Game {
            config,
            boards,
            supply,
            round,
            phase: GamePhase::InRound,
            bonuses: None,
        };
        let mut events = vec![created];
        if game.round.is_exhausted() {
            game.close_empty_round(&mut events);
        }
        debug_assert!(game.is_conserved());
        Ok((game, events))
    }

    /// An RNG seeded from the config, or from the OS if no seed is set
    pub fn rng(config: &GameConfig) -> StdRng {
        config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    pub fn num_players(&self) -> u8 {
        self.config.players
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, player: PlayerIdx) -> Option<&Board> {
        self.boards.get(player as usize)
    }

    pub fn scores(&self) -> Vec<Score> {
        self.boards.iter().map(Board::score).collect()
    }

    /// The live round (or the last one, once the game is finished)
    pub fn round(&self) -> &GameRound {
        &self.round
    }

    pub fn current_player(&self) -> PlayerIdx {
        self.round.current_player()
    }

    pub fn supply(&self) -> &Supply {
        &self.supply
    }

    /// End-game bonuses, once applied
    pub fn bonuses(&self) -> Option<&[EndGameBonus]> {
        self.bonuses.as_deref()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_finished() {
            return Vec::new();
        }
        self.round
            .legal_moves(&self.boards[self.round.current_player() as usize])
    }

    /// Highest score wins; ties go to the most completed wall rows, and any
    /// tie left after that is shared.
    pub fn winners(&self) -> Vec<PlayerIdx> {
        let key = |b: &Board| (b.score(), b.wall().completed_rows());
        let Some(best) = self.boards.iter().map(key).max() else {
            return Vec::new();
        };
        self.boards
            .iter()
            .enumerate()
            .filter(|(_, b)| key(b) == best)
            .map(|(p, _)| p as PlayerIdx)
            .collect()
    }

    /// Tiles of each color across bag, discard, factories, table, a pending
    /// take and every board
    pub fn tile_census(&self) -> [usize; TILE_COLORS] {
        let in_round = self.round.tile_counts();
        ALL_COLORS.map(|color| {
            self.supply.count(color)
                + in_round[color.index()]
                + self.boards.iter().map(|b| b.count(color)).sum::<usize>()
        })
    }

    /// Every color still has exactly its starting number of tiles
    pub fn is_conserved(&self) -> bool {
        self.tile_census()
            .iter()
            .all(|&n| n == usize::from(self.config.tiles_per_color))
    }

    // =========================================================================
    // Turns
    // =========================================================================

    fn check_running(&self) -> Result<(), RulesError> {
        if self.is_finished() {
            return Err(OutOfOrder::GameFinished.into());
        }
        Ok(())
    }

    pub fn take(
        &mut self,
        player: PlayerIdx,
        source: Source,
        color: Color,
    ) -> Result<&TileCollection, RulesError> {
        self.check_running()?;
        self.round.take(player, source, color)
    }

    /// Place the pending take. When this empties the last container the
    /// round is tiled and either the next round is dealt or the game ends.
    pub fn place(
        &mut self,
        player: PlayerIdx,
        dest: Destination,
        rng: &mut impl Rng,
    ) -> Result<Vec<GameEvent>, RulesError> {
        self.check_running()?;
        let mut events = self
            .round
            .place(player, dest, &mut self.boards, &mut self.supply)?;
        self.after_turn(&mut events, rng);
        Ok(events)
    }

    /// A whole turn at once; nothing changes if any part is illegal
    pub fn apply(
        &mut self,
        player: PlayerIdx,
        mv: Move,
        rng: &mut impl Rng,
    ) -> Result<Vec<GameEvent>, RulesError> {
        self.check_running()?;
        let mut events = self
            .round
            .apply(player, mv, &mut self.boards, &mut self.supply)?;
        self.after_turn(&mut events, rng);
        Ok(events)
    }

    pub fn check_move(&self, player: PlayerIdx, mv: &Move) -> Result<(), RulesError> {
        self.check_running()?;
        let board = self.boards.get(player as usize).ok_or(OutOfOrder::NotPlayersTurn {
            expected: self.round.current_player(),
            actual: player,
        })?;
        self.round.check_move(player, mv, board)
    }

    // =========================================================================
    // Round boundaries
    // =========================================================================

    fn after_turn(&mut self, events: &mut Vec<GameEvent>, rng: &mut impl Rng) {
        if self.round.phase() == RoundPhase::RoundEnd {
            self.end_round(events, rng);
        }
        debug_assert!(self.is_conserved(), "tile census: {:?}", self.tile_census());
    }

    #[instrument(skip_all)]
    fn end_round(&mut self, events: &mut Vec<GameEvent>, rng: &mut impl Rng) {
        if self.boards.iter().any(|b| b.wall().has_complete_row()) {
            info!("a wall row is complete");
            self.finish(events);
            return;
        }

        let first = self.round.next_first_player();
        let (round, created) = GameRound::deal(&self.config, first, &mut self.supply, rng);
        self.round = round;
        events.push(created);

        if self.round.is_exhausted() {
            self.close_empty_round(events);
        }
    }

    /// Nothing could be dealt: tile the walls once more and stop, since no
    /// later round could deal anything either.
    fn close_empty_round(&mut self, events: &mut Vec<GameEvent>) {
        info!("no tiles left to deal");
        events.extend(self.round.tile_walls(&mut self.boards, &mut self.supply));
        self.finish(events);
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        let bonus_table = self.config.bonus;
        let bonuses: Vec<EndGameBonus> = self
            .boards
            .iter_mut()
            .map(|b| b.apply_end_game_bonus(&bonus_table))
            .collect();

        self.phase = GamePhase::Finished;
        self.bonuses = Some(bonuses.clone());

        let scores = self.scores();
        let winners = self.winners();
        info!(?scores, ?winners, "game finished");
        events.push(GameEvent::GameFinished {
            scores,
            bonuses,
            winners,
        });
    }

    #[cfg(test)]
    fn boards_mut(&mut self) -> &mut [Board] {
        &mut self.boards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;

    fn random_game(config: GameConfig, seed: u64, max_moves: usize) -> (Game, Vec<GameEvent>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (mut game, mut all_events) = Game::start(config, &mut rng).unwrap();

        for _ in 0..max_moves {
            if game.is_finished() {
                break;
            }
            assert!(game.is_conserved());
            let moves = game.legal_moves();
            assert!(!moves.is_empty(), "No legal moves but game not over");

            let mv = moves[rng.random_range(0..moves.len())];
            let player = game.current_player();
            all_events.extend(game.apply(player, mv, &mut rng).unwrap());
        }
        (game, all_events)
    }

    // =========================================================================
    // Setup
    // =========================================================================

    #[test]
    fn test_start_creates_valid_state() {
        let mut rng = StdRng::seed_from_u64(42);
        let (game, events) = Game::start(GameConfig::default(), &mut rng).unwrap();

        assert_eq!(events, vec![GameEvent::RoundCreated { first_player: 0 }]);
        assert_eq!(game.phase(), GamePhase::InRound);
        assert_eq!(game.round().factories().len(), 5);
        assert_eq!(game.round().factories().total_tiles(), 20);
        assert_eq!(game.supply().bag_count(), 80);
        assert!(game.round().table().has_marker());
        assert!(game.is_conserved());
    }

    #[test]
    fn test_start_rejects_bad_config() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = Game::start(GameConfig::for_players(7), &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::PlayerCount(7)));
    }

    #[test]
    fn test_deterministic_start() {
        let config = GameConfig {
            seed: Some(12345),
            ..GameConfig::default()
        };
        let (g1, _) = Game::start(config.clone(), &mut Game::rng(&config)).unwrap();
        let (g2, _) = Game::start(config.clone(), &mut Game::rng(&config)).unwrap();

        for (f1, f2) in g1.round().factories().iter().zip(g2.round().factories()) {
            assert_eq!(f1.tiles(), f2.tiles());
        }
    }

    // =========================================================================
    // Full games
    // =========================================================================

    #[test]
    fn test_full_game_2_players() {
        let (game, events) = random_game(GameConfig::default(), 12345, 1000);

        assert!(game.is_finished(), "Game should end");
        assert!(game.is_conserved());
        assert!(game.boards().iter().any(|b| b.wall().has_complete_row()));
        assert!(matches!(events.last(), Some(GameEvent::GameFinished { .. })));
    }

    #[test]
    fn test_full_game_3_and_4_players() {
        for (players, seed) in [(3, 54321), (4, 11111)] {
            let (game, _) = random_game(GameConfig::for_players(players), seed, 2000);
            assert!(game.is_finished());
            assert!(game.is_conserved());
        }
    }

    #[test]
    fn test_events_follow_round_structure() {
        let (game, events) = random_game(GameConfig::default(), 7, 1000);
        assert!(game.is_finished());

        let created = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundCreated { .. }))
            .count();
        let tiled = events
            .iter()
            .filter(|e| matches!(e, GameEvent::WallTiled { .. }))
            .count();
        assert_eq!(tiled, created * 2, "one WallTiled per player per round");
    }

    #[test]
    fn test_marker_holder_opens_next_round() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut game, _) = Game::start(GameConfig::default(), &mut rng).unwrap();

        let mut holder = None;
        loop {
            let player = game.current_player();
            let mv = game.legal_moves()[0];
            if mv.source == Source::Table && game.round().table().has_marker() {
                holder = Some(player);
            }
            let events = game.apply(player, mv, &mut rng).unwrap();
            if let Some(GameEvent::RoundCreated { first_player }) = events.last() {
                assert_eq!(Some(*first_player), holder);
                assert_eq!(game.current_player(), *first_player);
                break;
            }
            assert!(!game.is_finished());
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_failed_calls_leave_game_unchanged() {
        let mut rng = StdRng::seed_from_u64(42);
        let (mut game, _) = Game::start(GameConfig::default(), &mut rng).unwrap();
        let census = game.tile_census();
        let factory_tiles = game.round().factories().total_tiles();

        let err = game.take(1, Source::Factory { index: 0 }, Color::Red).unwrap_err();
        assert!(matches!(err, RulesError::OutOfOrder(OutOfOrder::NotPlayersTurn { .. })));

        let err = game.take(0, Source::Table, Color::Red).unwrap_err();
        assert!(matches!(err, RulesError::EmptyTake { .. }));

        let err = game.place(0, Destination::Floor, &mut rng).unwrap_err();
        assert_eq!(err, RulesError::OutOfOrder(OutOfOrder::NothingTaken));

        assert_eq!(game.tile_census(), census);
        assert_eq!(game.round().factories().total_tiles(), factory_tiles);
        assert!(game.round().table().has_marker());
    }

    #[test]
    fn test_finished_game_rejects_turns() {
        let (mut game, _) = random_game(GameConfig::default(), 99, 1000);
        assert!(game.is_finished());

        let mv = Move {
            source: Source::Table,
            color: Color::Red,
            dest: Destination::Floor,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = game.apply(game.current_player(), mv, &mut rng).unwrap_err();
        assert_eq!(err, RulesError::OutOfOrder(OutOfOrder::GameFinished));
        assert!(game.legal_moves().is_empty());
    }

    // =========================================================================
    // End of game
    // =========================================================================

    #[test]
    fn test_winners_tie_break_on_rows() {
        let mut rng = StdRng::seed_from_u64(42);
        let (mut game, _) = Game::start(GameConfig::default(), &mut rng).unwrap();
        {
            let boards = game.boards_mut();
            boards[0].set_score(10);
            boards[1].set_score(10);
            for color in ALL_COLORS {
                boards[1].fill_wall(2, color);
            }
        }
        assert_eq!(game.winners(), vec![1]);

        game.boards_mut()[0].set_score(11);
        assert_eq!(game.winners(), vec![0]);
    }

    #[test]
    fn test_game_ends_when_row_completed() {
        let mut rng = StdRng::seed_from_u64(5);
        let (mut game, _) = Game::start(GameConfig::default(), &mut rng).unwrap();

        // Player 0 holds four of the top row's cells and has red staged for
        // the fifth. The tiles come out of the bag so the census still holds.
        for color in [Color::Blue, Color::Yellow, Color::Black, Color::Cyan] {
            let tile = game.supply.take_from_bag(color).unwrap();
            game.boards[0].fill_wall(0, tile.color());
        }
        let red = game.supply.take_from_bag(Color::Red).unwrap();
        game.boards[0]
            .place(
                Destination::Row { number: 1 },
                &mut TileCollection::from_tiles([red]),
            )
            .unwrap();
        assert!(game.is_conserved());

        let mut finished = None;
        while !game.is_finished() {
            let player = game.current_player();
            // Everything else goes to the floor so the staged red survives
            let mv = game
                .legal_moves()
                .into_iter()
                .find(|m| m.dest == Destination::Floor)
                .unwrap();
            let events = game.apply(player, mv, &mut rng).unwrap();
            finished = events.into_iter().find_map(|e| match e {
                GameEvent::GameFinished { bonuses, .. } => Some(bonuses),
                _ => None,
            });
        }

        let bonuses = finished.expect("game finished after the first round");
        assert_eq!(bonuses[0].rows, 1);
        assert!(game.boards()[0].wall().is_row_complete(0));
        assert!(game.is_conserved());
    }

    #[test]
    fn test_game_ends_when_bag_runs_dry() {
        let config = GameConfig {
            tiles_per_color: 2,
            refill_bag_from_discard: false,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let (mut game, events) = Game::start(config, &mut rng).unwrap();
        assert_eq!(events, vec![GameEvent::RoundCreated { first_player: 0 }]);

        // Ten tiles across five factories: dealt short, the last ones empty
        let factories = game.round().factories();
        assert_eq!(factories.total_tiles(), 10);
        assert_eq!(game.supply().bag_count(), 0);
        assert!(factories.iter().any(|f| f.is_empty()));
        assert!(factories
            .iter()
            .all(|f| f.tiles_count() <= crate::FACTORY_CAPACITY));

        let mut last = Vec::new();
        while !game.is_finished() {
            let player = game.current_player();
            let mv = game
                .legal_moves()
                .into_iter()
                .find(|m| m.dest == Destination::Floor)
                .unwrap();
            last = game.apply(player, mv, &mut rng).unwrap();
            assert!(game.is_conserved(), "census: {:?}", game.tile_census());
        }

        // Round 1 tiles the walls, round 2 is dealt empty and the game stops
        let n = last.len();
        assert!(n >= 4);
        assert!(matches!(last[n - 3], GameEvent::WallTiled { player: 0, .. }));
        assert!(matches!(last[n - 2], GameEvent::WallTiled { player: 1, .. }));
        assert!(matches!(last[n - 1], GameEvent::GameFinished { .. }));
        assert!(last.contains(&GameEvent::RoundCreated { first_player: 0 })
            || last.contains(&GameEvent::RoundCreated { first_player: 1 }));

        assert!(game.round().factories().all_empty());
        assert!(game.boards().iter().all(|b| !b.wall().has_complete_row()));
        assert_eq!(game.supply().discard_count(), 10);
        assert_eq!(game.scores(), vec![0, 0]);
        assert_eq!(game.winners(), vec![0, 1]);
    }
}
