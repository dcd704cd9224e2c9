use log::{debug, info};
use rand::Rng;

use crate::{
    board::Board,
    config::{ConfigError, GameConfig},
    direction::Direction,
    spawn::{self, Spawn, SpawnPolicy},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Ready,
    GameOver,
}

/// What happened during an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub direction: Direction,
    pub score_delta: u32,
    pub spawned: Vec<Spawn>,
}

/// A board together with its score and the random source that feeds it new
/// tiles.
pub struct Game<R> {
    board: Board,
    score: u64,
    moves: u32,
    state: GameState,
    spawn_policy: SpawnPolicy,
    win_tile: u32,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Validates `config`, then creates its board and runs the initial spawns.
    pub fn new(config: &GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut board = Board::new(config.size);

        for _ in 0..config.initial_spawns {
            spawn::spawn_tile(&mut board, &config.spawn_policy, &mut rng);
        }

        info!(
            "new {0}x{0} game, spawn policy {1:?}",
            config.size, config.spawn_policy
        );

        let state = if board.is_game_over() {
            GameState::GameOver
        } else {
            GameState::Ready
        };

        Ok(Self {
            board,
            score: 0,
            moves: 0,
            state,
            spawn_policy: config.spawn_policy.clone(),
            win_tile: config.win_tile,
            rng,
        })
    }

    /// Moves in `direction` and spawns if anything changed.
    ///
    /// Returns `None`, touching nothing, when the game is over or the move
    /// would not change the board.
    pub fn play(&mut self, direction: Direction) -> Option<Turn> {
        if self.state == GameState::GameOver {
            return None;
        }

        let outcome = self.board.apply_move(direction);

        if !outcome.changed {
            debug!("{direction:?} changes nothing");
            return None;
        }

        self.score += u64::from(outcome.score_delta);
        self.moves += 1;

        let spawned = spawn::spawn_tile(&mut self.board, &self.spawn_policy, &mut self.rng);

        debug!(
            "move {}: {direction:?} scored {}, score {}",
            self.moves, outcome.score_delta, self.score
        );

        if self.board.is_game_over() {
            self.state = GameState::GameOver;

            info!(
                "game over after {} moves, score {}, highest tile {}",
                self.moves,
                self.score,
                self.board.highest_tile()
            );
        }

        Some(Turn {
            direction,
            score_delta: outcome.score_delta,
            spawned,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Whether the win tile has been reached.
    pub fn has_won(&self) -> bool {
        self.board.highest_tile() >= self.win_tile
    }

    /// Directions that would change the board.
    pub fn available_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::iter().filter(move |&direction| self.board.try_move(direction).is_some())
    }
}
