//! Notifications emitted by state transitions.
//!
//! Events are plain values returned from the calls that caused them. They
//! name who was affected; the containers themselves are read through `&Game`.

use serde::Serialize;

use crate::board::{EndGameBonus, WallTilingReport};
use crate::{PlayerIdx, Score};

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Factories are dealt and `first_player` is to act
    RoundCreated { first_player: PlayerIdx },

    /// `player` completed a take and its placement
    PlayerFinishedTurn { player: PlayerIdx },

    /// `player`'s board went through wall-tiling
    WallTiled {
        player: PlayerIdx,
        report: WallTilingReport,
    },

    /// Bonuses applied; no further turns are accepted
    GameFinished {
        scores: Vec<Score>,
        bonuses: Vec<EndGameBonus>,
        winners: Vec<PlayerIdx>,
    },
}
