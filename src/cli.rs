use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use hare_chess::search::{DEFAULT_DEPTH, ScoringMode, SearchConfig};

#[derive(Debug, Parser)]
#[command(version, about = "Play chess against a minimax engine that moves for Black")]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Also write the log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Threads used to search root moves
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..), global = true)]
    pub threads: u16,

    #[arg(long, value_enum, default_value_t = Scoring::Strict, global = true)]
    pub scoring: Scoring,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play White against the engine in the terminal
    Play {
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: u8,
    },
    /// Print the engine's move for Black in a position
    BestMove {
        #[arg(long)]
        fen: String,
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: u8,
    },
    /// Count the leaves of the legal move tree
    Perft {
        #[arg(long)]
        depth: u8,
        #[arg(long)]
        fen: Option<String>,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Search a fixed set of positions and report the speed
    Bench {
        #[arg(long, default_value_t = 3)]
        depth: u8,
    },
    /// Random White moves against the engine
    Selfplay {
        #[arg(long, default_value_t = 1)]
        games: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 200)]
        max_plies: u32,
        #[arg(long, default_value_t = 2)]
        depth: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scoring {
    /// White's material, no distinction between mate and stalemate
    Compatible,
    /// Black's material, mate is a loss and stalemate a draw
    Strict,
}

impl From<Scoring> for ScoringMode {
    fn from(value: Scoring) -> Self {
        match value {
            Scoring::Compatible => ScoringMode::Compatible,
            Scoring::Strict => ScoringMode::Strict,
        }
    }
}

impl Cli {
    pub fn search_config(&self, depth: u8) -> SearchConfig {
        SearchConfig {
            depth,
            threads: self.threads as usize,
            scoring: self.scoring.into(),
        }
    }
}
