use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::spawn::SpawnPolicy;

/// Parameters of a single game.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    /// Side length of the square board.
    pub size: usize,
    pub spawn_policy: SpawnPolicy,
    /// Number of times the spawn policy runs before the first move.
    pub initial_spawns: usize,
    /// Tile value that counts as a win. Play continues past it.
    pub win_tile: u32,
}

impl GameConfig {
    pub const DEFAULT_SIZE: usize = 4;
    pub const DEFAULT_INITIAL_SPAWNS: usize = 2;
    pub const DEFAULT_WIN_TILE: u32 = 2048;
    pub const MAX_SIZE: usize = 64;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 2 {
            return Err(ConfigError::GridTooSmall(self.size));
        }

        if self.size > Self::MAX_SIZE {
            return Err(ConfigError::GridTooLarge(self.size));
        }

        if self.initial_spawns == 0 {
            return Err(ConfigError::NoInitialSpawns);
        }

        if self.win_tile < 4 || !self.win_tile.is_power_of_two() {
            return Err(ConfigError::InvalidWinTile(self.win_tile));
        }

        self.spawn_policy.validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            spawn_policy: SpawnPolicy::default(),
            initial_spawns: Self::DEFAULT_INITIAL_SPAWNS,
            win_tile: Self::DEFAULT_WIN_TILE,
        }
    }
}

/// Errors found while validating a [`GameConfig`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Boards must be at least 2x2.
    GridTooSmall(usize),
    /// Boards are at most [`GameConfig::MAX_SIZE`] cells wide.
    GridTooLarge(usize),
    /// A game that starts empty has no legal move.
    NoInitialSpawns,
    /// A spawn probability outside `[0, 1]`.
    InvalidProbability(f64),
    /// A spawn policy with nothing to draw from.
    EmptyValueSet,
    /// A spawn value that is not a power of two of at least 2.
    NotPowerOfTwo(u32),
    /// A win tile that no merge can produce.
    InvalidWinTile(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall(size) => write!(f, "grid size {size} is too small, need at least 2"),
            Self::GridTooLarge(size) => write!(
                f,
                "grid size {size} is too large, at most {} is allowed",
                GameConfig::MAX_SIZE
            ),
            Self::NoInitialSpawns => write!(f, "at least one initial spawn is required"),
            Self::InvalidProbability(p) => write!(f, "probability {p} is outside [0, 1]"),
            Self::EmptyValueSet => write!(f, "spawn value set is empty"),
            Self::NotPowerOfTwo(value) => {
                write!(f, "spawn value {value} is not a power of two of at least 2")
            }
            Self::InvalidWinTile(value) => {
                write!(f, "win tile {value} is not a power of two of at least 4")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = GameConfig::default();

        assert_eq!(config.size, 4);
        assert_eq!(config.initial_spawns, 2);
        assert_eq!(config.spawn_policy, SpawnPolicy::classic());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let config = GameConfig {
            size: 1,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridTooSmall(1)));

        let config = GameConfig {
            size: GameConfig::MAX_SIZE,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));

        let config = GameConfig {
            size: GameConfig::MAX_SIZE + 1,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridTooLarge(65)));

        let config = GameConfig {
            initial_spawns: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoInitialSpawns));

        let config = GameConfig {
            win_tile: 1000,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidWinTile(1000)));

        let config = GameConfig {
            spawn_policy: SpawnPolicy::Uniform(vec![2, 3]),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NotPowerOfTwo(3)));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::GridTooSmall(1).to_string(),
            "grid size 1 is too small, need at least 2"
        );
        assert_eq!(
            ConfigError::InvalidProbability(-0.5).to_string(),
            "probability -0.5 is outside [0, 1]"
        );
        assert_eq!(
            ConfigError::GridTooLarge(100000).to_string(),
            "grid size 100000 is too large, at most 64 is allowed"
        );
    }
}
