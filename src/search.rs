use std::{panic, thread, time::Instant};

use log::{debug, info};
use num_format::{Locale, ToFormattedString};

use crate::{
    board::Board,
    evaluate::evaluate_board,
    move_generator::{get_all_moves, is_king_in_check},
    moves::Move,
    piece::Color,
};

pub const SCORE_INFINITY: i32 = i32::MAX;
/// The search always plays Black, which is the maximizing side
pub const AI_COLOR: Color = Color::Black;
pub const DEFAULT_DEPTH: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMode {
    /// Leaves are scored with `evaluate_board` (White positive). A side with no moves scores
    /// +infinity at a maximizing ply and -infinity at a minimizing ply, checkmate or not.
    #[default]
    Compatible,
    /// Leaves are scored as Black's material balance. Being mated is a loss for the mated side
    /// and having no moves while not in check is a draw.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u8,
    /// Root moves are split across this many threads, 1 searches on the calling thread
    pub threads: usize,
    pub scoring: ScoringMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            threads: 1,
            scoring: ScoringMode::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaf_nodes: u64,
    /// Nodes where the side to move had no moves
    pub terminal_nodes: u64,
    pub cutoffs: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.leaf_nodes += other.leaf_nodes;
        self.terminal_nodes += other.terminal_nodes;
        self.cutoffs += other.cutoffs;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Searcher {
    pub config: SearchConfig,
    pub stats: SearchStats,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
        }
    }

    /// Depth limited minimax with alpha-beta pruning. Black moves at maximizing plies, White at minimizing plies.
    pub fn minimax(&mut self, board: &Board, depth: u8, maximizing: bool, mut alpha: i32, mut beta: i32) -> i32 {
        self.stats.nodes += 1;

        if depth == 0 {
            self.stats.leaf_nodes += 1;
            return self.leaf_score(board);
        }

        let side = if maximizing { Color::Black } else { Color::White };
        let moves = get_all_moves(board, side);

        if moves.is_empty() {
            self.stats.terminal_nodes += 1;
            return self.no_moves_score(board, side, maximizing);
        }

        if maximizing {
            let mut best_value = -SCORE_INFINITY;
            for r#move in &moves {
                let result = self.minimax(&board.make_move(r#move), depth - 1, false, alpha, beta);

                best_value = best_value.max(result);
                alpha = alpha.max(best_value);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best_value
        } else {
            let mut best_value = SCORE_INFINITY;
            for r#move in &moves {
                let result = self.minimax(&board.make_move(r#move), depth - 1, true, alpha, beta);

                best_value = best_value.min(result);
                beta = beta.min(best_value);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best_value
        }
    }

    fn leaf_score(&self, board: &Board) -> i32 {
        match self.config.scoring {
            ScoringMode::Compatible => evaluate_board(board),
            ScoringMode::Strict => board.evaluate_for(AI_COLOR),
        }
    }

    fn no_moves_score(&self, board: &Board, side: Color, maximizing: bool) -> i32 {
        match self.config.scoring {
            ScoringMode::Compatible => {
                if maximizing {
                    SCORE_INFINITY
                } else {
                    -SCORE_INFINITY
                }
            }
            ScoringMode::Strict => {
                if !is_king_in_check(board, side) {
                    0
                } else if maximizing {
                    -SCORE_INFINITY
                } else {
                    SCORE_INFINITY
                }
            }
        }
    }

    /// Best move for Black searched to the configured depth
    pub fn make_best_move(&mut self, board: &Board) -> Option<Move> {
        self.search(board, self.config.depth).map(|(m, _)| m)
    }

    /// Scores every legal Black move with a full window search of the reply and returns the first move
    /// with the strictly highest score, along with that score. None when Black has no moves.
    /// A depth of 0 is searched as depth 1.
    pub fn search(&mut self, board: &Board, depth: u8) -> Option<(Move, i32)> {
        let start_time = Instant::now();
        let start_nodes = self.stats.nodes;

        let moves = get_all_moves(board, AI_COLOR);
        if moves.is_empty() {
            debug!("Search found no moves for {AI_COLOR}. {:?}", board);
            return None;
        }

        let scores = self.score_root_moves(board, &moves, depth.saturating_sub(1));

        let mut best: Option<(Move, i32)> = None;
        for (r#move, score) in moves.iter().zip(scores) {
            debug!("root move {} scored {}", r#move, score);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((*r#move, score));
            }
        }

        let elapsed = start_time.elapsed();
        let nodes = self.stats.nodes - start_nodes;
        let nps = nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        if let Some((r#move, score)) = best {
            info!(
                "depth {depth} best {} score {score} in {elapsed:#?}. Nodes: {}. Nodes per second: {}",
                r#move.pretty_print(board),
                nodes.to_formatted_string(&Locale::en),
                (nps as u64).to_formatted_string(&Locale::en)
            );
        }

        best
    }

    fn score_root_moves(&mut self, board: &Board, moves: &[Move], reply_depth: u8) -> Vec<i32> {
        let threads = self.config.threads.clamp(1, moves.len().max(1));
        if threads == 1 {
            return moves
                .iter()
                .map(|r#move| {
                    self.minimax(
                        &board.make_move(r#move),
                        reply_depth,
                        false,
                        -SCORE_INFINITY,
                        SCORE_INFINITY,
                    )
                })
                .collect();
        }

        let config = self.config;
        let chunk_size = moves.len().div_ceil(threads);

        // Chunks are contiguous so concatenating the results keeps enumeration order
        let results: Vec<(Vec<i32>, SearchStats)> = thread::scope(|s| {
            let handles: Vec<_> = moves
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        let mut worker = Searcher::new(config);
                        let scores = chunk
                            .iter()
                            .map(|r#move| {
                                worker.minimax(
                                    &board.make_move(r#move),
                                    reply_depth,
                                    false,
                                    -SCORE_INFINITY,
                                    SCORE_INFINITY,
                                )
                            })
                            .collect::<Vec<i32>>();
                        (scores, worker.stats)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        });

        let mut scores = Vec::with_capacity(moves.len());
        for (chunk_scores, stats) in results {
            scores.extend(chunk_scores);
            self.stats.merge(&stats);
        }

        scores
    }
}

/// Minimax with the compatible scoring mode
pub fn minimax(board: &Board, depth: u8, maximizing: bool, alpha: i32, beta: i32) -> i32 {
    Searcher::default().minimax(board, depth, maximizing, alpha, beta)
}

/// Best Black move with the compatible scoring mode, searched on the calling thread
pub fn make_best_move(board: &Board, depth: u8) -> Option<Move> {
    Searcher::default().search(board, depth).map(|(m, _)| m)
}
