//! Azul Rules Engine
//!
//! Tile supply, drafting and placement rules, wall-tiling and scoring for the
//! board game Azul. Containers own their tiles outright and hand them over by
//! move, so every tile is always in exactly one place:
//! bag/discard -> factories -> table -> boards -> discard.
//!
//! The engine does no I/O. State transitions return [`GameEvent`] values and
//! renderers read the current state through [`Game`]'s queries or a
//! serializable [`GameView`].

mod action;
mod board;
mod collection;
mod config;
mod error;
mod event;
mod factory;
mod game;
mod round;
mod supply;
mod table;
mod tile;
mod view;

pub use action::*;
pub use board::*;
pub use collection::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use factory::*;
pub use game::*;
pub use round::*;
pub use supply::*;
pub use table::*;
pub use tile::*;
pub use view::*;

// =============================================================================
// Basic types and constants
// =============================================================================

/// Index into the players' boards: 0..num_players-1
pub type PlayerIdx = u8;

/// Points. Never negative: floor penalties clamp at zero.
pub type Score = u16;

pub const BOARD_SIZE: usize = 5;
pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: usize = 4;
pub const FACTORY_CAPACITY: usize = 4;
pub const FLOOR_CAPACITY: usize = 7;
pub const TILE_COLORS: usize = 5;
pub const TILES_PER_COLOR: u8 = 20;
