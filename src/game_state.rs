use std::fmt::Display;

use crate::{
    board::Board,
    move_generator::{get_valid_moves, is_king_in_check},
    piece::Color,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Normal,
    Check,
    Checkmate,
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Normal => write!(f, "normal"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate => write!(f, "checkmate"),
        }
    }
}

/// In check with no legal move for any piece. A side with no legal moves that is not in check
/// (stalemate) is not reported here.
pub fn is_checkmate(board: &Board, color: Color) -> bool {
    if !is_king_in_check(board, color) {
        return false;
    }

    board
        .pieces_of(color)
        .all(|(square, piece)| get_valid_moves(square, &piece, board).is_empty())
}

/// Status for `color`, the side about to move
pub fn game_status(board: &Board, color: Color) -> GameStatus {
    if !is_king_in_check(board, color) {
        GameStatus::Normal
    } else if is_checkmate(board, color) {
        GameStatus::Checkmate
    } else {
        GameStatus::Check
    }
}
