use clap::{Parser, ValueEnum};

use core_2048::{ConfigError, GameConfig, SpawnPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SpawnKind {
    /// 90% twos, 10% fours (see --four-chance).
    Classic,
    /// Always a 2.
    Twos,
    /// Uniform pick from --values.
    Uniform,
    /// A 2 plus a uniform pick from --values.
    Paired,
}

/// Play 2048 in the terminal. Arrow keys or w/a/s/d to move, q to quit.
#[derive(Parser, Debug)]
#[command(name = "grid-2048")]
pub struct Args {
    /// Side length of the board.
    #[arg(long, default_value_t = GameConfig::DEFAULT_SIZE)]
    pub size: usize,
    /// How new tiles are valued.
    #[arg(long, value_enum, default_value_t = SpawnKind::Classic)]
    pub spawn: SpawnKind,
    /// Chance of a 4 under the classic policy.
    #[arg(long, default_value_t = SpawnPolicy::FOUR_PROBABILITY)]
    pub four_chance: f64,
    /// Values for the uniform and paired policies.
    #[arg(long, value_delimiter = ',', default_values_t = SpawnPolicy::UNIFORM_VALUES)]
    pub values: Vec<u32>,
    /// Spawns before the first move.
    #[arg(long, default_value_t = GameConfig::DEFAULT_INITIAL_SPAWNS)]
    pub initial_spawns: usize,
    /// Tile that counts as a win.
    #[arg(long, default_value_t = GameConfig::DEFAULT_WIN_TILE)]
    pub win_tile: u32,
    /// Seed for tile spawns. Drawn from the OS when absent.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Play random legal moves instead of reading the keyboard.
    #[arg(long)]
    pub random: bool,
}

impl Args {
    pub fn spawn_policy(&self) -> SpawnPolicy {
        match self.spawn {
            SpawnKind::Classic => SpawnPolicy::TwoOrFour {
                four_probability: self.four_chance,
            },
            SpawnKind::Twos => SpawnPolicy::AlwaysTwo,
            SpawnKind::Uniform => SpawnPolicy::Uniform(self.values.clone()),
            SpawnKind::Paired => SpawnPolicy::Paired(self.values.clone()),
        }
    }

    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            size: self.size,
            spawn_policy: self.spawn_policy(),
            initial_spawns: self.initial_spawns,
            win_tile: self.win_tile,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("grid-2048").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_game_defaults() {
        let args = parse(&[]);

        assert_eq!(args.game_config(), Ok(GameConfig::default()));
        assert_eq!(args.seed, None);
        assert!(!args.random);
    }

    #[test]
    fn paired_policy_with_custom_values() {
        let args = parse(&["--size", "5", "--spawn", "paired", "--values", "2,4,8", "--seed", "7"]);
        let config = args.game_config().unwrap();

        assert_eq!(config.size, 5);
        assert_eq!(config.spawn_policy, SpawnPolicy::Paired(vec![2, 4, 8]));
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn invalid_config_is_reported() {
        let args = parse(&["--spawn", "uniform", "--values", "2,5"]);

        assert_eq!(args.game_config(), Err(ConfigError::NotPowerOfTwo(5)));

        let args = parse(&["--four-chance", "2"]);

        assert_eq!(
            args.game_config(),
            Err(ConfigError::InvalidProbability(2.0))
        );

        let args = parse(&["--size", "100000"]);

        assert_eq!(args.game_config(), Err(ConfigError::GridTooLarge(100000)));

        let args = parse(&["--initial-spawns", "0"]);

        assert_eq!(args.game_config(), Err(ConfigError::NoInitialSpawns));
    }
}
