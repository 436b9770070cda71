//! One round of drafting: dealing, turns, and the wall-tiling pass

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::action::{Destination, Move, Source};
use crate::board::Board;
use crate::collection::TileCollection;
use crate::config::GameConfig;
use crate::error::{OutOfOrder, RulesError};
use crate::event::GameEvent;
use crate::factory::FactoryCollection;
use crate::supply::Supply;
use crate::table::Table;
use crate::tile::{Color, Marker, ALL_COLORS};
use crate::{PlayerIdx, TILE_COLORS};

/// Round lifecycle
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Dealing,
    /// Players drafting
    InProgress,
    WallTiling,
    /// Terminal for this round; the game decides what comes next
    RoundEnd,
}

/// Tiles taken by the current player and not yet placed
#[derive(Debug)]
pub struct PendingTake {
    pub player: PlayerIdx,
    pub source: Source,
    pub color: Color,
    pub tiles: TileCollection,
}

#[derive(Debug)]
pub struct GameRound {
    phase: RoundPhase,
    factories: FactoryCollection,
    table: Table,
    num_players: u8,
    first_player: PlayerIdx,
    current_player: PlayerIdx,
    pending: Option<PendingTake>,
    /// Whoever claimed the marker this round
    marker_holder: Option<PlayerIdx>,
}

impl GameRound {
    /// Deal the factories from the supply and open the round for turns.
    #[instrument(skip(config, supply, rng))]
    pub fn deal(
        config: &GameConfig,
        first_player: PlayerIdx,
        supply: &mut Supply,
        rng: &mut impl Rng,
    ) -> (Self, GameEvent) {
        let mut round = GameRound {
            phase: RoundPhase::Dealing,
            factories: FactoryCollection::default(),
            table: Table::new(Marker::new()),
            num_players: config.players,
            first_player,
            current_player: first_player,
            pending: None,
            marker_holder: None,
        };

        round.factories = FactoryCollection::deal(config.factory_count(), supply, rng);
        round.phase = RoundPhase::InProgress;
        info!(
            factories = round.factories.len(),
            tiles = round.factories.total_tiles(),
            bag = supply.bag_count(),
            "round dealt"
        );

        (round, GameEvent::RoundCreated { first_player })
    }

    /// Build a round around hand-made factories, skipping the bag
    pub fn with_factories(
        num_players: u8,
        first_player: PlayerIdx,
        factories: FactoryCollection,
    ) -> Self {
        GameRound {
            phase: RoundPhase::InProgress,
            factories,
            table: Table::new(Marker::new()),
            num_players,
            first_player,
            current_player: first_player,
            pending: None,
            marker_holder: None,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn factories(&self) -> &FactoryCollection {
        &self.factories
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn first_player(&self) -> PlayerIdx {
        self.first_player
    }

    pub fn current_player(&self) -> PlayerIdx {
        self.current_player
    }

    pub fn pending_take(&self) -> Option<&PendingTake> {
        self.pending.as_ref()
    }

    pub fn marker_holder(&self) -> Option<PlayerIdx> {
        self.marker_holder
    }

    /// Who opens the next round: the marker holder, or this round's
    /// first player if the marker was never claimed
    pub fn next_first_player(&self) -> PlayerIdx {
        self.marker_holder.unwrap_or(self.first_player)
    }

    /// Every factory and the center pile are empty and nothing is in hand
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_none() && self.factories.all_empty() && self.table.is_empty()
    }

    /// Tiles of each color still in this round's containers (incl. a pending take)
    pub fn tile_counts(&self) -> [usize; TILE_COLORS] {
        ALL_COLORS.map(|color| {
            self.factories.count(color)
                + self.table.center_pile_count(Some(color))
                + self
                    .pending
                    .as_ref()
                    .map_or(0, |p| p.tiles.count(Some(color)))
        })
    }

    /// Every legal move for the current player
    pub fn legal_moves(&self, board: &Board) -> Vec<Move> {
        if self.phase != RoundPhase::InProgress || self.pending.is_some() {
            return Vec::new();
        }

        let mut moves = Vec::new();
        let mut push_color = |source: Source, color: Color| {
            moves.extend(board.legal_destinations(color).map(|dest| Move {
                source,
                color,
                dest,
            }));
        };

        for factory in &self.factories {
            let mut seen = [false; TILE_COLORS];
            for tile in factory.tiles() {
                let ci = tile.color().index();
                if !seen[ci] {
                    seen[ci] = true;
                    push_color(
                        Source::Factory {
                            index: factory.index(),
                        },
                        tile.color(),
                    );
                }
            }
        }
        for (color, _) in self.table.center_pile() {
            push_color(Source::Table, color);
        }

        moves
    }

    // =========================================================================
    // Turn protocol
    // =========================================================================

    fn check_turn(&self, player: PlayerIdx) -> Result<(), OutOfOrder> {
        if self.phase != RoundPhase::InProgress {
            return Err(OutOfOrder::RoundNotInProgress);
        }
        if player != self.current_player {
            return Err(OutOfOrder::NotPlayersTurn {
                expected: self.current_player,
                actual: player,
            });
        }
        Ok(())
    }

    /// First half of a turn: take every tile of `color` from `source`.
    pub fn take(
        &mut self,
        player: PlayerIdx,
        source: Source,
        color: Color,
    ) -> Result<&TileCollection, RulesError> {
        self.check_turn(player)?;
        if self.pending.is_some() {
            return Err(OutOfOrder::TakeAlreadyPending.into());
        }

        let tiles = match source {
            Source::Factory { index } => self.factories.take(index, color, &mut self.table)?,
            Source::Table => self.table.take(color)?,
        };
        if tiles.has_marker() {
            self.marker_holder = Some(player);
        }
        debug!(player, %source, %color, count = tiles.count(None), "take");

        let pending = self.pending.insert(PendingTake {
            player,
            source,
            color,
            tiles,
        });
        Ok(&pending.tiles)
    }

    /// Second half of a turn: stage the pending take on `player`'s board.
    ///
    /// A rejected placement keeps the take pending so the player can pick
    /// another destination.
    pub fn place(
        &mut self,
        player: PlayerIdx,
        dest: Destination,
        boards: &mut [Board],
        supply: &mut Supply,
    ) -> Result<Vec<GameEvent>, RulesError> {
        self.check_turn(player)?;
        let pending = self.pending.as_mut().ok_or(OutOfOrder::NothingTaken)?;

        let board = boards
            .get_mut(player as usize)
            .ok_or(RulesError::NoSuchBoard { player })?;
        let placement = board.place(dest, &mut pending.tiles)?;
        debug!(
            player,
            %dest,
            staged = placement.staged,
            to_floor = placement.to_floor,
            marker = placement.marker,
            "place"
        );
        self.pending = None;

        let mut events = vec![GameEvent::PlayerFinishedTurn { player }];
        if self.is_exhausted() {
            events.extend(self.tile_walls(boards, supply));
        } else {
            self.current_player = (self.current_player + 1) % self.num_players;
        }
        Ok(events)
    }

    /// Validate a whole turn without touching any container
    pub fn check_move(
        &self,
        player: PlayerIdx,
        mv: &Move,
        board: &Board,
    ) -> Result<(), RulesError> {
        self.check_turn(player)?;
        if self.pending.is_some() {
            return Err(OutOfOrder::TakeAlreadyPending.into());
        }

        let available = match mv.source {
            Source::Factory { index } => self
                .factories
                .get(index)
                .ok_or(RulesError::NoSuchFactory { index })?
                .count(mv.color),
            Source::Table => self.table.center_pile_count(Some(mv.color)),
        };
        if available == 0 {
            return Err(RulesError::EmptyTake {
                origin: mv.source,
                color: mv.color,
            });
        }
        board.check_placement(mv.dest, mv.color)
    }

    /// Take and place in one call. Either the whole turn happens or nothing does.
    pub fn apply(
        &mut self,
        player: PlayerIdx,
        mv: Move,
        boards: &mut [Board],
        supply: &mut Supply,
    ) -> Result<Vec<GameEvent>, RulesError> {
        self.check_turn(player)?;
        let board = boards
            .get(player as usize)
            .ok_or(RulesError::NoSuchBoard { player })?;
        self.check_move(player, &mv, board)?;
        self.take(player, mv.source, mv.color)?;
        self.place(player, mv.dest, boards, supply)
    }

    /// Run wall-tiling over every board in player order and close the round
    #[instrument(skip_all)]
    pub(crate) fn tile_walls(
        &mut self,
        boards: &mut [Board],
        supply: &mut Supply,
    ) -> Vec<GameEvent> {
        debug_assert!(self.is_exhausted());
        self.phase = RoundPhase::WallTiling;

        let events = boards
            .iter_mut()
            .enumerate()
            .map(|(player, board)| {
                let report = board.tile_wall(supply);
                info!(
                    player,
                    placed = report.placements.len(),
                    penalty = report.floor_penalty,
                    score = report.score_after,
                    "wall tiled"
                );
                GameEvent::WallTiled {
                    player: player as PlayerIdx,
                    report,
                }
            })
            .collect();

        self.phase = RoundPhase::RoundEnd;
        events
    }
}
