use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::{
    board::Board,
    game_state::is_checkmate,
    move_generator::{get_all_moves, is_king_in_check},
    moves::Move,
    piece::Color,
};

/// Number of leaf positions of the legal move tree `depth` plies deep
pub fn perft(board: &Board, side: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = get_all_moves(board, side);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|r#move| perft(&board.apply_move(r#move.start, r#move.end), side.opposite(), depth - 1))
        .sum()
}

impl Board {
    /// Runs perft and logs the timing. With `divide` the leaf count below every root move is printed.
    pub fn start_perft(&self, side: Color, depth: u8, divide: bool) -> PerftStats {
        let mut stats = PerftStats::default();

        let start_time = Instant::now();
        do_perft(depth, 1, self, side, &mut stats, divide);
        let elapsed = start_time.elapsed();

        if divide {
            println!("\n{}", stats.nodes);
        }

        let nps = stats.nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        info!(
            "depth {depth} in {elapsed:#?}. Nodes: {}. Nodes per second: {}",
            stats.nodes.to_formatted_string(&Locale::en),
            (nps as u64).to_formatted_string(&Locale::en)
        );
        info!("{:?}", stats);

        stats
    }
}

/// Counts are taken over the moves of the last ply
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

// Code referenced from https://www.chessprogramming.org/Perft
fn do_perft(draft: u8, ply: u8, board: &Board, side: Color, stats: &mut PerftStats, divide: bool) {
    if draft == 0 {
        stats.nodes += 1;
        return;
    }

    for r#move in get_all_moves(board, side) {
        let next = board.make_move(&r#move);

        if draft == 1 {
            check_perft_stats(&r#move, board, &next, side, stats);
        }

        let start_nodes = stats.nodes;
        do_perft(draft - 1, ply + 1, &next, side.opposite(), stats, divide);

        if divide && ply == 1 {
            println!("{} {}", r#move, stats.nodes - start_nodes);
        }
    }
}

fn check_perft_stats(r#move: &Move, before: &Board, after: &Board, side: Color, stats: &mut PerftStats) {
    if r#move.is_capture(before) {
        stats.captures += 1;
    } else if r#move.is_castle(before) {
        stats.castles += 1;
    }

    if r#move.is_promotion(before) {
        stats.promotions += 1;
    }

    let opponent = side.opposite();
    if is_king_in_check(after, opponent) {
        stats.checks += 1;

        if is_checkmate(after, opponent) {
            stats.checkmates += 1;
        }
    }
}

#[cfg(test)]
mod perft_tests {
    use crate::STARTING_FEN;

    use super::*;

    macro_rules! perft_test {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (fen, depth, expected_nodes) = $value;

                    let (board, side) = Board::from_fen(fen).unwrap();

                    assert_eq!(expected_nodes, perft(&board, side, depth));
                    assert_eq!(expected_nodes, board.start_perft(side, depth, false).nodes);
                }
            )*
        }
    }

    perft_test! {
        start_depth_0: (STARTING_FEN, 0, 1),
        start_depth_1: (STARTING_FEN, 1, 20),
        start_depth_2: (STARTING_FEN, 2, 400),
        start_depth_3: (STARTING_FEN, 3, 8902),
        black_to_move_depth_2: ("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq -", 2, 600),
        kings_and_rook: ("4k3/8/8/8/8/8/8/R3K3 w Q -", 1, 16),
        mated_side_has_no_moves: ("rnbqkbnr/pppppQpp/8/8/2B5/8/PPPPPPPP/RNB1K1NR b KQkq -", 2, 0),
    }

    #[test]
    pub fn start_position_stats() {
        let stats = Board::initialize().start_perft(Color::White, 3, false);

        assert_eq!(
            PerftStats {
                nodes: 8902,
                captures: 34,
                castles: 0,
                promotions: 0,
                checks: 12,
                checkmates: 0,
            },
            stats
        );
    }

    #[test]
    pub fn castles_and_promotions_are_counted() {
        let (board, side) = Board::from_fen("4k3/1P6/8/8/8/8/8/R3K2R w KQ -").unwrap();
        let stats = board.start_perft(side, 1, false);

        assert_eq!(2, stats.castles);
        assert_eq!(1, stats.promotions);
        assert_eq!(perft(&board, side, 1), stats.nodes);
    }
}
