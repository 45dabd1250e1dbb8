use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};

use log::{error, info, warn};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use hare_chess::{
    board::Square,
    game::{Game, GameError},
    game_state::GameStatus,
    moves::Move,
    piece::Color,
    search::{SearchConfig, Searcher},
};

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Move(Move),
    Moves(Square),
    Board,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("quit" | "exit"), None, _) => Ok(Input::Quit),
        (Some("board"), None, _) => Ok(Input::Board),
        (Some("moves"), Some(square), None) => Ok(Input::Moves(square.parse()?)),
        (Some("moves"), _, _) => Err(String::from("Usage: moves <square>, for example 'moves e2'")),
        (None, _, _) => Err(String::from("Enter a move like 'e2e4', 'moves <square>', 'board' or 'quit'")),
        _ => Ok(Input::Move(line.parse()?)),
    }
}

/// Human White against the engine, reading commands from stdin
pub fn play(config: SearchConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut Game::new(), &mut Searcher::new(config), stdin.lock(), stdout.lock())
}

fn run_session<R: BufRead, W: Write>(
    game: &mut Game,
    searcher: &mut Searcher,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(output, "{}", game.board())?;

    loop {
        if game.is_over() {
            writeln!(output, "Checkmate, {} wins", game.turn().opposite())?;
            return Ok(());
        }

        if game.turn() == Color::Black {
            let before = *game.board();
            match game.play_ai_move(searcher) {
                Ok(outcome) => {
                    writeln!(output, "Black plays {}", outcome.mv.pretty_print(&before))?;
                    writeln!(output, "{}", game.board())?;
                    if outcome.status == GameStatus::Check {
                        writeln!(output, "White is in check")?;
                    }
                }
                Err(GameError::NoMovesAvailable { .. }) => {
                    writeln!(output, "Stalemate, Black has no moves")?;
                    return Ok(());
                }
                Err(e) => {
                    error!("{e}");
                    return Ok(());
                }
            }
            continue;
        }

        if game.legal_moves().is_empty() {
            writeln!(output, "Stalemate, White has no moves")?;
            return Ok(());
        }

        write!(output, "White to move> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match parse_input(&line) {
            Ok(Input::Quit) => return Ok(()),
            Ok(Input::Board) => writeln!(output, "{}", game.board())?,
            Ok(Input::Moves(square)) => match game.legal_destinations(square) {
                Ok(destinations) => {
                    let listed: Vec<String> = destinations.iter().map(|s| s.to_string()).collect();
                    writeln!(output, "{square}: {}", listed.join(" "))?;
                }
                Err(e) => writeln!(output, "{e}")?,
            },
            Ok(Input::Move(mv)) => match game.play_move(mv) {
                Ok(outcome) if outcome.status == GameStatus::Check => writeln!(output, "Black is in check")?,
                Ok(_) => {}
                Err(e) => writeln!(output, "{e}")?,
            },
            Err(e) => writeln!(output, "{e}")?,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfplayResult {
    Checkmate { winner: Color },
    Stalemate,
    PlyLimit,
}

impl Display for SelfplayResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelfplayResult::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            SelfplayResult::Stalemate => write!(f, "stalemate"),
            SelfplayResult::PlyLimit => write!(f, "ply limit reached"),
        }
    }
}

/// Plays `games` games of uniformly random White moves against the engine
pub fn selfplay(config: SearchConfig, games: u32, seed: Option<u64>, max_plies: u32) -> Vec<SelfplayResult> {
    let seed = seed.unwrap_or_else(rand::random);
    info!("Self play seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut searcher = Searcher::new(config);

    let mut results = Vec::with_capacity(games as usize);
    for game_number in 1..=games {
        let (result, plies) = selfplay_game(&mut searcher, &mut rng, max_plies);
        info!("Game {game_number}: {result} after {plies} plies");
        results.push(result);
    }

    let black_wins = results
        .iter()
        .filter(|r| **r == SelfplayResult::Checkmate { winner: Color::Black })
        .count();
    println!("Black won {black_wins} of {games} games");
    info!("{:?}", searcher.stats);

    results
}

fn selfplay_game(searcher: &mut Searcher, rng: &mut StdRng, max_plies: u32) -> (SelfplayResult, u32) {
    let mut game = Game::new();

    for ply in 0..max_plies {
        if game.is_over() {
            return (SelfplayResult::Checkmate { winner: game.turn().opposite() }, ply);
        }

        let played = match game.turn() {
            Color::White => {
                let moves = game.legal_moves();
                match moves.choose(rng) {
                    Some(mv) => game.play_move(*mv),
                    None => Err(GameError::NoMovesAvailable { side: Color::White }),
                }
            }
            Color::Black => game.play_ai_move(searcher),
        };

        match played {
            Ok(_) => {}
            Err(GameError::NoMovesAvailable { .. }) => return (SelfplayResult::Stalemate, ply),
            Err(e) => {
                warn!("Self play stopped early: {e}");
                return (SelfplayResult::PlyLimit, ply);
            }
        }
    }

    if game.is_over() {
        return (SelfplayResult::Checkmate { winner: game.turn().opposite() }, max_plies);
    }
    (SelfplayResult::PlyLimit, max_plies)
}
