//! Grid engine for the sliding-tile game 2048 on square boards of any size.
//!
//! [`Board`] holds the tiles and knows how to slide them, [`spawn_tile`]
//! drops new tiles in, and [`Game`] strings the two together into a playable
//! game with a score.

pub mod board;
pub mod config;
pub mod direction;
pub mod game;
pub mod spawn;

pub use board::{slide_and_merge, Board, MoveOutcome};
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use game::{Game, GameState, Turn};
pub use spawn::{spawn_tile, Spawn, SpawnPolicy};
