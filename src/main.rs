use std::{path::Path, process::ExitCode, time::SystemTime};

use clap::Parser;
use log::{LevelFilter, error, info, warn};

use cli::{Cli, Command};
use hare_chess::{
    STARTING_FEN,
    bench::bench,
    board::Board,
    piece::Color,
    search::{DEFAULT_DEPTH, Searcher},
};

mod cli;
mod play;

build_info::build_info!(fn build_info);

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logger(cli.log_level.into(), cli.log_file.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }
    log_panics::init();

    let build = build_info();
    info!("{} {}", build.crate_info.name, build.crate_info.version);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

fn run(cli: &Cli) -> Result<(), String> {
    match &cli.command {
        None => play::play(cli.search_config(DEFAULT_DEPTH)).map_err(|e| e.to_string()),
        Some(Command::Play { depth }) => play::play(cli.search_config(*depth)).map_err(|e| e.to_string()),
        Some(Command::BestMove { fen, depth }) => {
            let (board, side) = Board::from_fen(fen)?;
            if side != Color::Black {
                warn!("The engine only moves for Black, searching Black's move anyway");
            }

            let mut searcher = Searcher::new(cli.search_config(*depth));
            match searcher.search(&board, *depth) {
                Some((mv, score)) => println!("{mv} {} score {score}", mv.pretty_print(&board)),
                None => println!("Black has no legal moves"),
            }
            Ok(())
        }
        Some(Command::Perft { depth, fen, divide }) => {
            let (board, side) = Board::from_fen(fen.as_deref().unwrap_or(STARTING_FEN))?;
            let stats = board.start_perft(side, *depth, *divide);
            if !*divide {
                println!("{}", stats.nodes);
            }
            Ok(())
        }
        Some(Command::Bench { depth }) => {
            bench(*depth, cli.threads as usize, cli.scoring.into());
            Ok(())
        }
        Some(Command::Selfplay {
            games,
            seed,
            max_plies,
            depth,
        }) => {
            play::selfplay(cli.search_config(*depth), *games, *seed, *max_plies);
            Ok(())
        }
    }
}
