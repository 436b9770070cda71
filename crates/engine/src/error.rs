//! Rule violations and configuration errors

use std::path::PathBuf;

use crate::action::{Destination, Source};
use crate::config::BonusTable;
use crate::tile::Color;
use crate::PlayerIdx;

/// A rejected take or placement. Every variant leaves the game untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RulesError {
    /// The chosen factory or table holds no tile of the requested color.
    #[error("{origin} holds no {color} tiles: at least 1 is required")]
    EmptyTake { origin: Source, color: Color },

    /// There is no factory with this index in the current round.
    #[error("no factory with index {index}")]
    NoSuchFactory { index: u8 },

    /// The caller supplied no board for this player.
    #[error("no board for player {player}")]
    NoSuchBoard { player: PlayerIdx },

    /// The destination row cannot accept tiles of this color.
    #[error("cannot place {color} tiles on {destination}: {conflict}")]
    IllegalPlacement {
        destination: Destination,
        color: Color,
        conflict: PlacementConflict,
    },

    /// The action is not permitted in the current turn state.
    #[error("out of order: {0}")]
    OutOfOrder(#[from] OutOfOrder),
}

/// Why a staging row rejected a placement
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PlacementConflict {
    #[error("row already holds {0} tiles")]
    RowHoldsOtherColor(Color),
    #[error("the matching wall cell is already filled")]
    WallCellFilled,
    #[error("rows are numbered 1 to 5")]
    NoSuchRow,
    #[error("a placement must be a single color")]
    MixedColors,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum OutOfOrder {
    #[error("it is player {expected}'s turn, not player {actual}'s")]
    NotPlayersTurn {
        expected: PlayerIdx,
        actual: PlayerIdx,
    },
    #[error("tiles were already taken this turn; place them first")]
    TakeAlreadyPending,
    #[error("nothing has been taken this turn")]
    NothingTaken,
    #[error("the round is not accepting turns")]
    RoundNotInProgress,
    #[error("the game is finished")]
    GameFinished,
}

/// Invalid or unreadable game configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("player count must be between 2 and 4, got {0}")]
    PlayerCount(u8),

    #[error("first player {first} does not exist in a {players}-player game")]
    FirstPlayer { first: PlayerIdx, players: u8 },

    #[error("tiles per color must be between 1 and {max}, got {got}")]
    TilesPerColor { got: u8, max: u8 },

    #[error(
        "bonus table (row {}, column {}, color {}) could overflow the score",
        .0.row, .0.column, .0.color
    )]
    Bonus(BonusTable),

    #[error("parse error in config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
