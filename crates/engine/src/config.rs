//! Game configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{PlayerIdx, Score, BOARD_SIZE, MAX_PLAYERS, MIN_PLAYERS, TILES_PER_COLOR};

/// Upper bound on points from wall placements: 25 tiles at 10 points each
const MAX_WALL_SCORE: Score = 250;

/// Points awarded at game end for each completed wall line or color set
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusTable {
    /// Per complete horizontal row
    pub row: Score,
    /// Per complete vertical column
    pub column: Score,
    /// Per color with all 5 tiles on the wall
    pub color: Score,
}

impl BonusTable {
    /// Bonus for a completely filled wall, or None if it does not fit in a `Score`
    pub fn max_points(&self) -> Option<Score> {
        let per_line = self.row.checked_add(self.column)?.checked_add(self.color)?;
        per_line.checked_mul(BOARD_SIZE as Score)
    }
}

impl Default for BonusTable {
    fn default() -> Self {
        BonusTable {
            row: 2,
            column: 7,
            color: 10,
        }
    }
}

/// Game configuration parameters
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players (2..=4)
    pub players: u8,

    /// Who acts first in round 1
    pub first_player: PlayerIdx,

    /// Tiles of each color in the bag at game start
    pub tiles_per_color: u8,

    /// Pour the discard pile back into the bag when it runs dry.
    /// When false, discarded tiles never return and factories may be dealt short.
    pub refill_bag_from_discard: bool,

    pub bonus: BonusTable,

    /// Seed for the bag's RNG, if the caller wants reproducible games
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 2,
            first_player: 0,
            tiles_per_color: TILES_PER_COLOR,
            refill_bag_from_discard: true,
            bonus: BonusTable::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn for_players(players: u8) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Factories per round: 5, 7 or 9
    pub fn factory_count(&self) -> u8 {
        2 * self.players + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS as u8).contains(&self.players) {
            return Err(ConfigError::PlayerCount(self.players));
        }
        if self.first_player >= self.players {
            return Err(ConfigError::FirstPlayer {
                first: self.first_player,
                players: self.players,
            });
        }
        // Per-color counts live in u8 cells: bag + discard can never exceed this
        if self.tiles_per_color == 0 || self.tiles_per_color > TILES_PER_COLOR * 2 {
            return Err(ConfigError::TilesPerColor {
                got: self.tiles_per_color,
                max: TILES_PER_COLOR * 2,
            });
        }
        let fits = self
            .bonus
            .max_points()
            .and_then(|p| p.checked_add(MAX_WALL_SCORE))
            .is_some();
        if !fits {
            return Err(ConfigError::Bonus(self.bonus));
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard_game() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.factory_count(), 5);
        assert_eq!(GameConfig::for_players(3).factory_count(), 7);
        assert_eq!(GameConfig::for_players(4).factory_count(), 9);
    }

    #[test]
    fn test_validate_rejects_bad_players() {
        assert!(matches!(
            GameConfig::for_players(1).validate(),
            Err(ConfigError::PlayerCount(1))
        ));
        assert!(matches!(
            GameConfig::for_players(5).validate(),
            Err(ConfigError::PlayerCount(5))
        ));

        let config = GameConfig {
            first_player: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FirstPlayer { first: 2, players: 2 })
        ));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = GameConfig::from_toml_str(
            r#"
            players = 3
            seed = 7

            [bonus]
            color = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.players, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.bonus.color, 12);
        assert_eq!(config.bonus.row, 2, "unspecified bonus keeps its default");
        assert!(config.refill_bag_from_discard);
    }

    #[test]
    fn test_validate_rejects_oversized_bonus() {
        assert_eq!(BonusTable::default().max_points(), Some(95));

        let err = GameConfig::from_toml_str("[bonus]\nrow = 65535\n").unwrap_err();
        assert!(matches!(err, ConfigError::Bonus(b) if b.row == 65535));

        let config = GameConfig {
            bonus: BonusTable {
                row: 6000,
                column: 6000,
                color: 2000,
            },
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Bonus(_))));

        // Largest table that still leaves room for the wall score
        let config = GameConfig {
            bonus: BonusTable {
                row: (Score::MAX - MAX_WALL_SCORE) / 5,
                column: 0,
                color: 0,
            },
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(matches!(
            GameConfig::from_toml_str("players = \"two\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::from_toml_str("players = 6"),
            Err(ConfigError::PlayerCount(6))
        ));
    }
}
