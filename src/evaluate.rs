use crate::{board::Board, piece::Color};

/// Material balance, positive when White is ahead. There is no positional term.
pub fn evaluate_board(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(_, piece)| {
            let value = piece.kind.material_value();
            match piece.color {
                Color::White => value,
                Color::Black => -value,
            }
        })
        .sum()
}

impl Board {
    #[inline]
    pub fn evaluate(&self) -> i32 {
        evaluate_board(self)
    }

    /// Material balance from the point of view of `color`
    pub fn evaluate_for(&self, color: Color) -> i32 {
        match color {
            Color::White => self.evaluate(),
            Color::Black => -self.evaluate(),
        }
    }
}
