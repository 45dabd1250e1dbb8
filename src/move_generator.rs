use log::debug;
use tinyvec::TinyVec;

use crate::{
    board::{Board, Square},
    moves::Move,
    piece::{Color, Piece},
};

/// A queen in the middle of an empty board reaches 27 squares
pub type Destinations = TinyVec<[Square; 32]>;

/// Legal destinations for `piece` standing on `start`, in row-major order.
/// Every candidate that passes the piece's geometry is tried on a copy of the board and dropped
/// if it leaves the mover's own king attacked.
pub fn get_valid_moves(start: Square, piece: &Piece, board: &Board) -> Destinations {
    let mut result = Destinations::new();

    for end in Square::all() {
        if !piece.is_valid_move(start, end, board) {
            continue;
        }

        let hypothetical = board.place_move(*piece, start, end);
        if !is_king_in_check(&hypothetical, piece.color) {
            result.push(end);
        }
    }

    result
}

/// True if any opposing piece's geometry reaches the first king of `color` in row-major order.
/// A board without that king is never in check.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king_square) = board.find_king(color) else {
        debug!("No {color} king on the board, treating it as not in check. {:?}", board);
        return false;
    };

    board
        .pieces_of(color.opposite())
        .any(|(from, attacker)| attacker.is_valid_move(from, king_square, board))
}

/// Every legal move for `color`: pieces in row-major order, then each piece's destinations in row-major order.
pub fn get_all_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();

    for (start, piece) in board.pieces_of(color) {
        for end in get_valid_moves(start, &piece, board) {
            // Already filtered by get_valid_moves, checked again against the full move application
            let next = board.apply_move(start, end);
            if is_king_in_check(&next, color) {
                debug!("Dropping {start}{end} which get_valid_moves returned but leaves the king in check");
                continue;
            }

            moves.push(Move::new(start, end));
        }
    }

    moves
}
