use std::{
    io::{self, Read, Write},
    os::fd::AsRawFd,
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::{seq::IteratorRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use core_2048::Game;

mod args;
mod input;
mod render;

use args::Args;
use input::{Key, KeyReader};

fn play_interactive(
    out: &mut impl Write,
    input: &mut (impl AsRawFd + Read),
    game: &mut Game<impl Rng>,
) -> Result<()> {
    let _terminal = render::setup_terminal(&*input).context("failed to configure the terminal")?;
    let mut key_reader = KeyReader::new()?;

    render::draw_board(out, game.board(), game.score())?;

    'game: while !game.is_over() {
        for key in key_reader.read_keys(input)? {
            let Key::Move(direction) = key else {
                break 'game;
            };

            let old_board = game.board().clone();
            let old_score = game.score();

            if game.play(direction).is_some() {
                render::redraw_board(out, &old_board, game.board(), old_score, game.score())?;
            }

            if game.is_over() {
                break 'game;
            }
        }
    }

    Ok(())
}

fn play_random(out: &mut impl Write, game: &mut Game<impl Rng>, rng: &mut impl Rng) -> Result<()> {
    render::draw_board(out, game.board(), game.score())?;

    loop {
        let Some(direction) = game.available_moves().choose(rng) else {
            break;
        };

        let old_board = game.board().clone();
        let old_score = game.score();

        game.play(direction);

        render::redraw_board(out, &old_board, game.board(), old_score, game.score())?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.game_config().context("invalid game configuration")?;

    let seed = args
        .seed
        .unwrap_or_else(|| ChaCha8Rng::from_entropy().gen());

    info!("seed {seed}");

    let mut game = Game::new(&config, ChaCha8Rng::seed_from_u64(seed))?;
    let mut stdout = io::stdout().lock();

    if args.random {
        let mut move_rng = ChaCha8Rng::seed_from_u64(seed);
        move_rng.set_stream(1);

        play_random(&mut stdout, &mut game, &mut move_rng)?;
    } else {
        let mut stdin = io::stdin().lock();

        play_interactive(&mut stdout, &mut stdin, &mut game)?;
    }

    let verdict = if game.is_over() { "Game over" } else { "Quit" };
    let won = if game.has_won() { ", you won" } else { "" };

    writeln!(
        stdout,
        "{verdict}: score {}, highest tile {}, {} moves{won}",
        game.score(),
        game.board().highest_tile(),
        game.moves()
    )?;

    Ok(())
}
