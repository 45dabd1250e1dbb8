use std::{fmt::Display, str::FromStr, sync::LazyLock};

use log::trace;
use regex::Regex;

use crate::{
    board::{Board, Square},
    piece::{Piece, PieceKind},
};

static MOVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([a-h][1-8])\s*[- ]?\s*([a-h][1-8])\s*$").unwrap());

/// Castling and promotion are not stored, they are worked out from the moving piece when the move is applied
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Default)]
pub struct Move {
    pub start: Square,
    pub end: Square,
}

impl Move {
    pub fn new(start: Square, end: Square) -> Move {
        Move { start, end }
    }

    pub fn is_castle(&self, board: &Board) -> bool {
        board
            .get(self.start)
            .is_some_and(|p| p.kind == PieceKind::King && self.start.delta_to(self.end).1.abs() == 2)
    }

    pub fn is_promotion(&self, board: &Board) -> bool {
        board
            .get(self.start)
            .is_some_and(|p| p.kind == PieceKind::Pawn && self.end.row == p.color.promotion_row())
    }

    pub fn is_capture(&self, board: &Board) -> bool {
        board.get(self.end).is_some()
    }

    /// Like "Ne2xe4" or "0-0", needs the board from before the move is made
    pub fn pretty_print(&self, board: &Board) -> String {
        if self.is_castle(board) {
            return if self.end.col > self.start.col {
                String::from("0-0")
            } else {
                String::from("0-0-0")
            };
        }

        let piece_name = board.get(self.start).map(|p| p.name()).unwrap_or('?');
        let capture_char = if self.is_capture(board) { 'x' } else { '-' };
        let promoted_to = if self.is_promotion(board) { "=Q" } else { "" };

        format!("{}{}{}{}{}", piece_name, self.start, capture_char, self.end, promoted_to)
    }
}

/// Coordinate notation, for example "e2e4"
impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.start, self.end)
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(captures) = MOVE_PATTERN.captures(s) else {
            return Err(format!("Expected a move like 'e2e4' but got '{s}'"));
        };

        Ok(Move::new(captures[1].parse()?, captures[2].parse()?))
    }
}

impl Board {
    /// Returns the board after the piece on `start` moves to `end`. self is left untouched.
    /// An empty or off-board start, or an off-board end, gives back an unchanged copy.
    pub fn apply_move(&self, start: Square, end: Square) -> Board {
        match self.get(start) {
            Some(piece) if end.is_on_board() => self.place_move(piece, start, end),
            _ => {
                trace!("apply_move from {start} to {end} has nothing to move");
                *self
            }
        }
    }

    #[inline]
    pub fn make_move(&self, r#move: &Move) -> Board {
        self.apply_move(r#move.start, r#move.end)
    }

    /// Moves `piece` regardless of what stands on `start`. Both squares must be on the board.
    pub(crate) fn place_move(&self, piece: Piece, start: Square, end: Square) -> Board {
        let mut next = *self;
        let d_col = start.delta_to(end).1;

        if piece.kind == PieceKind::King && d_col.abs() == 2 {
            let (rook_from, rook_to) = if d_col > 0 {
                (Square::new(start.row, 7), Square::new(start.row, end.col - 1))
            } else {
                (Square::new(start.row, 0), Square::new(start.row, end.col + 1))
            };

            if let Some(rook) = next.get(rook_from).filter(|p| p.kind == PieceKind::Rook) {
                next.set(rook_from, None);
                next.set(rook_to, Some(rook.with_moved()));
            }
        }

        let landing = if piece.kind == PieceKind::Pawn && end.row == piece.color.promotion_row() {
            Piece::new(piece.color, PieceKind::Queen)
        } else {
            piece
        };

        next.set(end, Some(landing.with_moved()));
        next.set(start, None);

        next
    }
}
