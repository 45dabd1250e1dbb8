use std::time::Instant;

use log::{error, info};
use num_format::{Locale, ToFormattedString};

use crate::{
    board::Board,
    search::{ScoringMode, SearchConfig, SearchStats, Searcher},
};

/// Middlegame and endgame positions with Black to move
pub static BENCH_FENS: [&str; 12] = [
    "rn3rk1/ppp1ppbp/6p1/3qP3/3P2bP/4BN2/PP2BPP1/R2QK2R b KQ - 1 11",
    "r6k/1p3p2/1np1b1pp/p2pP2n/P2P3q/1P2P2P/3QN1BK/2R2R2 b - - 1 26",
    "r7/p2k3p/1p2pp2/1P6/3P1nP1/R4N1P/5P1K/8 b - - 1 40",
    "2kr3r/p1p2pp1/2nqpn1p/8/3Pb3/BQ2PNP1/P4PBP/R4RK1 b - - 4 17",
    "r1bqk2r/1ppn1pp1/p2b1n1p/3p4/3P4/2N1BNP1/PP2PPBP/R2QK2R b KQkq - 1 9",
    "7r/1bk3R1/5p2/2p1pP1P/4P3/P1P2QPK/1q6/8 b - - 3 41",
    "8/8/5pk1/2R5/6P1/7r/5K2/8 b - - 18 60",
    "r1bqkbnr/pp2pppp/2n5/2pp4/3P4/2P1PN2/PP3PPP/RNBQKB1R b KQkq - 0 4",
    "2r5/5pk1/2n1pnp1/2Qp3p/8/4NBPP/1q2PP2/3R2K1 b - - 5 43",
    "r3k2r/1p2bppp/pqnpbn2/8/3NPB2/2N5/PPPQB1PP/2KR3R b kq - 6 12",
    "6k1/p4p1p/2B1np2/1p2r3/1P6/2PR2PP/5K2/8 b - - 1 29",
    "r1bq1rk1/p4ppp/n1p1p3/2p1P3/3P4/PPN2NP1/5P1P/R2Q1RK1 b - - 3 17",
];

/// Searches every bench position and prints the combined node count and speed
pub fn bench(depth: u8, threads: usize, scoring: ScoringMode) -> SearchStats {
    let mut total = SearchStats::default();
    let start_time = Instant::now();

    for fen in BENCH_FENS {
        let board = match Board::from_fen(fen) {
            Ok((board, _)) => board,
            Err(e) => {
                error!("Skipping bench position '{fen}': {e}");
                continue;
            }
        };

        let mut searcher = Searcher::new(SearchConfig { depth, threads, scoring });
        searcher.make_best_move(&board);

        total.merge(&searcher.stats);
    }

    let elapsed = start_time.elapsed();
    let nps = total.nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

    info!("{:?}", total);
    println!(
        "Nodes: {} NPS: {} Time: {elapsed:#?}",
        total.nodes.to_formatted_string(&Locale::en),
        (nps as u64).to_formatted_string(&Locale::en)
    );

    total
}

#[cfg(test)]
mod bench_tests {
    use crate::{move_generator::get_all_moves, piece::Color};

    use super::*;

    #[test]
    pub fn bench_positions_are_black_to_move() {
        for fen in BENCH_FENS {
            let (board, side) = Board::from_fen(fen).unwrap();

            assert_eq!(Color::Black, side, "{fen}");
            assert!(!get_all_moves(&board, Color::Black).is_empty(), "{fen}");
        }
    }

    #[test]
    pub fn bench_counts_every_position() {
        let stats = bench(1, 1, ScoringMode::Strict);

        assert_eq!(stats.nodes, stats.leaf_nodes);
        assert!(stats.nodes as usize >= BENCH_FENS.len());
        assert_eq!(stats, bench(1, 3, ScoringMode::Strict));
    }
}
