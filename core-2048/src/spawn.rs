use log::debug;
use rand::{seq::SliceRandom, Rng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    board::{is_tile_value, Board},
    config::ConfigError,
};

/// How new tiles are valued when they appear on the board.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpawnPolicy {
    /// Every new tile is a 2.
    AlwaysTwo,
    /// A 4 with the given probability, otherwise a 2.
    TwoOrFour { four_probability: f64 },
    /// Uniform pick from the listed values.
    Uniform(Vec<u32>),
    /// A 2 followed by a second tile picked uniformly from the listed values.
    Paired(Vec<u32>),
}

/// A tile placed by [`spawn_tile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub column: usize,
    pub value: u32,
}

impl SpawnPolicy {
    pub const FOUR_PROBABILITY: f64 = 0.1;
    pub const UNIFORM_VALUES: [u32; 5] = [2, 4, 8, 16, 32];

    /// 90% twos, 10% fours.
    pub const fn classic() -> Self {
        Self::TwoOrFour {
            four_probability: Self::FOUR_PROBABILITY,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::AlwaysTwo => Ok(()),
            &Self::TwoOrFour { four_probability } => {
                if (0.0..=1.0).contains(&four_probability) {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidProbability(four_probability))
                }
            }
            Self::Uniform(values) | Self::Paired(values) => {
                if values.is_empty() {
                    return Err(ConfigError::EmptyValueSet);
                }

                match values.iter().find(|&&value| value == 0 || !is_tile_value(value)) {
                    Some(&value) => Err(ConfigError::NotPowerOfTwo(value)),
                    None => Ok(()),
                }
            }
        }
    }

    fn draw(&self, rng: &mut impl Rng) -> u32 {
        match self {
            Self::AlwaysTwo => 2,
            &Self::TwoOrFour { four_probability } => {
                if rng.gen_bool(four_probability) {
                    4
                } else {
                    2
                }
            }
            Self::Uniform(values) | Self::Paired(values) => {
                values.choose(rng).copied().unwrap_or(2)
            }
        }
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::classic()
    }
}

fn place(board: &mut Board, rng: &mut impl Rng, value: u32) -> Option<Spawn> {
    let slot_count = board.empty_count();

    if slot_count == 0 {
        return None;
    }

    let slot_idx = rng.gen_range(0..slot_count);
    let index = board.empty_cells().nth(slot_idx)?;

    board.set(index, value);

    let spawn = Spawn {
        row: index / board.size(),
        column: index % board.size(),
        value,
    };

    debug!("spawned {} at ({}, {})", spawn.value, spawn.row, spawn.column);

    Some(spawn)
}

/// Places new tiles into uniformly chosen empty cells according to `policy`.
///
/// A full board is left untouched and nothing is returned. [`SpawnPolicy::Paired`]
/// places its second tile only if a cell is still free after the first.
pub fn spawn_tile(board: &mut Board, policy: &SpawnPolicy, rng: &mut impl Rng) -> Vec<Spawn> {
    if board.is_full() {
        debug!("no empty cell to spawn into");
        return Vec::new();
    }

    match policy {
        SpawnPolicy::Paired(_) => {
            let mut spawns = Vec::with_capacity(2);
            spawns.extend(place(board, rng, 2));

            if !board.is_full() {
                let value = policy.draw(rng);
                spawns.extend(place(board, rng, value));
            }

            spawns
        }
        _ => {
            let value = policy.draw(rng);
            place(board, rng, value).into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn full_board_is_left_alone() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut board = Board::from_rows(&[[2, 4], [4, 2]]);

        for policy in [
            SpawnPolicy::AlwaysTwo,
            SpawnPolicy::classic(),
            SpawnPolicy::Uniform(SpawnPolicy::UNIFORM_VALUES.to_vec()),
            SpawnPolicy::Paired(SpawnPolicy::UNIFORM_VALUES.to_vec()),
        ] {
            assert!(spawn_tile(&mut board, &policy, &mut rng).is_empty());
            assert_eq!(board, Board::from_rows(&[[2, 4], [4, 2]]));
        }
    }

    #[test]
    fn spawn_fills_an_empty_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut board = Board::from_rows(&[[2, 0], [4, 2]]);

        let spawns = spawn_tile(&mut board, &SpawnPolicy::AlwaysTwo, &mut rng);

        assert_eq!(
            spawns,
            [Spawn {
                row: 0,
                column: 1,
                value: 2
            }]
        );
        assert_eq!(board, Board::from_rows(&[[2, 2], [4, 2]]));
    }

    #[test]
    fn spawns_never_overwrite_tiles() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut board = Board::new(5);

        for filled in 1..=25 {
            let spawns = spawn_tile(&mut board, &SpawnPolicy::classic(), &mut rng);

            assert_eq!(spawns.len(), 1);
            assert_eq!(board.tile_count(), filled);
            assert_eq!(board.get(spawns[0].row, spawns[0].column), spawns[0].value);
        }

        assert!(board.is_full());
    }

    #[test]
    fn cells_are_chosen_uniformly() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut counts = [0u32; 4];

        for _ in 0..8000 {
            let mut board = Board::new(2);
            let spawns = spawn_tile(&mut board, &SpawnPolicy::AlwaysTwo, &mut rng);

            counts[spawns[0].row * 2 + spawns[0].column] += 1;
        }

        for count in counts {
            assert!((1800..=2200).contains(&count), "{counts:?}");
        }
    }

    #[test]
    fn classic_policy_spawns_about_ten_percent_fours() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let samples = 20_000;
        let mut fours = 0;

        for _ in 0..samples {
            let mut board = Board::new(4);
            let spawns = spawn_tile(&mut board, &SpawnPolicy::classic(), &mut rng);

            match spawns[0].value {
                2 => {}
                4 => fours += 1,
                value => panic!("unexpected spawn value {value}"),
            }
        }

        let frequency = f64::from(fours) / f64::from(samples);
        assert!((0.085..=0.115).contains(&frequency), "{frequency}");
    }

    #[test]
    fn uniform_policy_draws_from_its_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let policy = SpawnPolicy::Uniform(SpawnPolicy::UNIFORM_VALUES.to_vec());
        let mut seen = [false; 5];

        for _ in 0..1000 {
            let mut board = Board::new(4);
            let value = spawn_tile(&mut board, &policy, &mut rng)[0].value;

            let position = SpawnPolicy::UNIFORM_VALUES
                .iter()
                .position(|&v| v == value)
                .unwrap();
            seen[position] = true;
        }

        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn paired_policy_places_two_tiles_when_room_allows() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let policy = SpawnPolicy::Paired(vec![8]);

        let mut board = Board::new(3);
        let spawns = spawn_tile(&mut board, &policy, &mut rng);

        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].value, 2);
        assert_eq!(spawns[1].value, 8);
        assert_ne!(
            (spawns[0].row, spawns[0].column),
            (spawns[1].row, spawns[1].column)
        );
        assert_eq!(board.tile_count(), 2);

        let mut board = Board::from_rows(&[[2, 4], [4, 0]]);
        let spawns = spawn_tile(&mut board, &policy, &mut rng);

        assert_eq!(
            spawns,
            [Spawn {
                row: 1,
                column: 1,
                value: 2
            }]
        );
    }

    #[test]
    fn validation() {
        assert!(SpawnPolicy::AlwaysTwo.validate().is_ok());
        assert!(SpawnPolicy::classic().validate().is_ok());
        assert_eq!(
            SpawnPolicy::TwoOrFour {
                four_probability: 1.5
            }
            .validate(),
            Err(ConfigError::InvalidProbability(1.5))
        );
        assert_eq!(
            SpawnPolicy::Uniform(Vec::new()).validate(),
            Err(ConfigError::EmptyValueSet)
        );
        assert_eq!(
            SpawnPolicy::Paired(vec![2, 6]).validate(),
            Err(ConfigError::NotPowerOfTwo(6))
        );
        assert_eq!(
            SpawnPolicy::Uniform(vec![0, 2]).validate(),
            Err(ConfigError::NotPowerOfTwo(0))
        );
    }
}
