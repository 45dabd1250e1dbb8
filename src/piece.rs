use std::fmt::Display;

use crate::board::{Board, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward pawn step. White starts on row 6 and moves toward row 0.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_home_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row a pawn of this color promotes on
    pub fn promotion_row(self) -> u8 {
        self.opposite().back_row()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Kings are worth nothing since they are never captured in a legal game
    pub fn material_value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    pub fn from_name(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    fn lowercase_name(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// A piece is a plain value. Boards hold their own copies, so updating `moved` on one board never touches another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    /// Only meaningful for kings and rooks, where it controls castling
    pub moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Piece {
        Piece {
            color,
            kind,
            moved: false,
        }
    }

    pub fn with_moved(self) -> Piece {
        Piece { moved: true, ..self }
    }

    /// FEN style letter, uppercase for White
    pub fn name(&self) -> char {
        let c = self.kind.lowercase_name();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_name(c: char) -> Option<Piece> {
        let kind = PieceKind::from_name(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(color, kind))
    }

    /// Pseudo legal test: geometry and occupancy only. Whether the mover's king is left in check is not considered.
    pub fn is_valid_move(&self, start: Square, end: Square, board: &Board) -> bool {
        if !start.is_on_board() || !end.is_on_board() || start == end {
            return false;
        }

        match self.kind {
            PieceKind::Pawn => is_valid_pawn_move(self.color, start, end, board),
            PieceKind::Rook => is_valid_rook_move(self.color, start, end, board),
            PieceKind::Knight => is_valid_knight_move(self.color, start, end, board),
            PieceKind::Bishop => is_valid_bishop_move(self.color, start, end, board),
            PieceKind::Queen => {
                is_valid_rook_move(self.color, start, end, board) || is_valid_bishop_move(self.color, start, end, board)
            }
            PieceKind::King => is_valid_king_move(self, start, end, board),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Empty or holding an enemy piece
#[inline]
fn can_land_on(color: Color, end: Square, board: &Board) -> bool {
    match board.get(end) {
        None => true,
        Some(p) => p.color != color,
    }
}

/// Every square strictly between start and end is empty. start and end must share a row, column or diagonal.
fn path_is_clear(start: Square, end: Square, board: &Board) -> bool {
    let (d_row, d_col) = start.delta_to(end);
    let step_row = d_row.signum();
    let step_col = d_col.signum();

    let mut current = start.offset(step_row, step_col);
    while let Some(sq) = current {
        if sq == end {
            return true;
        }
        if board.get(sq).is_some() {
            return false;
        }
        current = sq.offset(step_row, step_col);
    }

    false
}

fn is_valid_pawn_move(color: Color, start: Square, end: Square, board: &Board) -> bool {
    let direction = color.pawn_direction();
    let (d_row, d_col) = start.delta_to(end);

    if d_col == 0 {
        if board.get(end).is_some() {
            return false;
        }
        if d_row == direction {
            return true;
        }
        if d_row == 2 * direction && start.row == color.pawn_home_row() {
            return start.offset(direction, 0).is_some_and(|middle| board.get(middle).is_none());
        }
        return false;
    }

    if d_col.abs() == 1 && d_row == direction {
        return board.get(end).is_some_and(|p| p.color != color);
    }

    false
}

fn is_valid_rook_move(color: Color, start: Square, end: Square, board: &Board) -> bool {
    let (d_row, d_col) = start.delta_to(end);
    if d_row != 0 && d_col != 0 {
        return false;
    }

    path_is_clear(start, end, board) && can_land_on(color, end, board)
}

fn is_valid_bishop_move(color: Color, start: Square, end: Square, board: &Board) -> bool {
    let (d_row, d_col) = start.delta_to(end);
    if d_row.abs() != d_col.abs() {
        return false;
    }

    path_is_clear(start, end, board) && can_land_on(color, end, board)
}

fn is_valid_knight_move(color: Color, start: Square, end: Square, board: &Board) -> bool {
    let (d_row, d_col) = start.delta_to(end);
    let (d_row, d_col) = (d_row.abs(), d_col.abs());

    ((d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2)) && can_land_on(color, end, board)
}

fn is_valid_king_move(king: &Piece, start: Square, end: Square, board: &Board) -> bool {
    let (d_row, d_col) = start.delta_to(end);

    if d_row.abs() <= 1 && d_col.abs() <= 1 {
        return can_land_on(king.color, end, board);
    }

    d_row == 0 && d_col.abs() == 2 && can_castle(king, start, d_col > 0, board)
}

/// Only checks that neither piece has moved and that the squares between them are empty.
/// Squares the king passes over are not tested for attacks.
fn can_castle(king: &Piece, start: Square, towards_h_file: bool, board: &Board) -> bool {
    if king.moved {
        return false;
    }

    let rook_square = Square::new(start.row, if towards_h_file { 7 } else { 0 });
    let rook_ready = board
        .get(rook_square)
        .is_some_and(|p| p.kind == PieceKind::Rook && p.color == king.color && !p.moved);

    rook_ready && path_is_clear(start, rook_square, board)
}

#[cfg(test)]
mod piece_tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap().0
    }

    fn piece_at(b: &Board, s: &str) -> Piece {
        b.get(sq(s)).unwrap()
    }

    macro_rules! geometry_test {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (fen, from, to, expected) = $value;

                    let b = board(fen);
                    let p = piece_at(&b, from);

                    assert_eq!(expected, p.is_valid_move(sq(from), sq(to), &b), "{from}{to} in {fen}");
                }
            )*
        }
    }

    geometry_test! {
        white_pawn_single_step: ("4k3/8/8/8/8/8/4P3/4K3 w - -", "e2", "e3", true),
        white_pawn_double_step_from_home: ("4k3/8/8/8/8/8/4P3/4K3 w - -", "e2", "e4", true),
        white_pawn_double_step_away_from_home: ("4k3/8/8/8/8/4P3/8/4K3 w - -", "e3", "e5", false),
        white_pawn_double_step_jumping: ("4k3/8/8/8/8/4n3/4P3/4K3 w - -", "e2", "e4", false),
        white_pawn_blocked: ("4k3/8/8/8/8/4n3/4P3/4K3 w - -", "e2", "e3", false),
        white_pawn_backwards: ("4k3/8/8/8/8/4P3/8/4K3 w - -", "e3", "e2", false),
        white_pawn_diagonal_needs_capture: ("4k3/8/8/8/8/8/4P3/4K3 w - -", "e2", "d3", false),
        white_pawn_diagonal_capture: ("4k3/8/8/8/8/3n4/4P3/4K3 w - -", "e2", "d3", true),
        white_pawn_diagonal_own_piece: ("4k3/8/8/8/8/3N4/4P3/4K3 w - -", "e2", "d3", false),
        black_pawn_single_step: ("4k3/4p3/8/8/8/8/8/4K3 b - -", "e7", "e6", true),
        black_pawn_double_step: ("4k3/4p3/8/8/8/8/8/4K3 b - -", "e7", "e5", true),
        black_pawn_wrong_direction: ("4k3/8/4p3/8/8/8/8/4K3 b - -", "e6", "e7", false),
        black_pawn_capture: ("4k3/4p3/5N2/8/8/8/8/4K3 b - -", "e7", "f6", true),
        rook_open_file: ("4k3/8/8/8/8/8/8/R3K3 w - -", "a1", "a8", true),
        rook_blocked_file: ("4k3/8/8/8/p7/8/8/R3K3 w - -", "a1", "a8", false),
        rook_captures_blocker: ("4k3/8/8/8/p7/8/8/R3K3 w - -", "a1", "a4", true),
        rook_diagonal: ("4k3/8/8/8/8/8/8/R3K3 w - -", "a1", "b2", false),
        rook_onto_own_piece: ("4k3/8/8/8/8/8/8/R3K3 w - -", "a1", "e1", false),
        knight_jump_over_pieces: ("4k3/8/8/8/8/8/PPP5/1N2K3 w - -", "b1", "c3", true),
        knight_onto_own_piece: ("4k3/8/8/8/8/8/3P4/1N2K3 w - -", "b1", "d2", false),
        knight_not_an_l: ("4k3/8/8/8/8/8/8/1N2K3 w - -", "b1", "b3", false),
        bishop_open_diagonal: ("4k3/8/8/8/8/8/8/2B1K3 w - -", "c1", "h6", true),
        bishop_blocked_diagonal: ("4k3/8/8/8/8/4p3/8/2B1K3 w - -", "c1", "h6", false),
        bishop_straight: ("4k3/8/8/8/8/8/8/2B1K3 w - -", "c1", "c4", false),
        queen_like_rook: ("4k3/8/8/8/8/8/8/3QK3 w - -", "d1", "d8", true),
        queen_like_bishop: ("4k3/8/8/8/8/8/8/3QK3 w - -", "d1", "h5", true),
        queen_knight_jump: ("4k3/8/8/8/8/8/8/3QK3 w - -", "d1", "e3", false),
        king_single_step: ("4k3/8/8/8/8/8/8/4K3 w - -", "e1", "f2", true),
        king_two_steps_without_rook: ("4k3/8/8/8/8/8/8/4K3 w - -", "e1", "g1", false),
        king_castle_short: ("4k3/8/8/8/8/8/8/4K2R w K -", "e1", "g1", true),
        king_castle_long: ("4k3/8/8/8/8/8/8/R3K3 w Q -", "e1", "c1", true),
        king_castle_long_blocked_on_b_file: ("4k3/8/8/8/8/8/8/RN2K3 w Q -", "e1", "c1", false),
        king_castle_without_right: ("4k3/8/8/8/8/8/8/4K2R w - -", "e1", "g1", false),
        king_castle_through_attack_is_allowed: ("4kr2/8/8/8/8/8/8/4K2R w K -", "e1", "g1", true),
        black_king_castle_short: ("4k2r/8/8/8/8/8/8/4K3 b k -", "e8", "g8", true),
    }

    #[test]
    pub fn off_board_squares_are_never_valid() {
        let b = Board::initialize();
        let rook = Piece::new(Color::White, PieceKind::Rook);

        assert!(!rook.is_valid_move(Square::new(3, 0), Square::new(3, 8), &b));
        assert!(!rook.is_valid_move(Square::new(8, 0), Square::new(3, 0), &b));
    }

    #[test]
    pub fn moved_king_cannot_castle() {
        let mut b = board("4k3/8/8/8/8/8/8/4K2R w K -");
        let king = piece_at(&b, "e1").with_moved();
        b.set(sq("e1"), Some(king));

        assert!(!king.is_valid_move(sq("e1"), sq("g1"), &b));
    }

    #[test]
    pub fn moved_rook_prevents_castling() {
        let mut b = board("4k3/8/8/8/8/8/8/4K2R w K -");
        let rook = piece_at(&b, "h1").with_moved();
        b.set(sq("h1"), Some(rook));

        assert!(!piece_at(&b, "e1").is_valid_move(sq("e1"), sq("g1"), &b));
    }

    #[test]
    pub fn names_round_trip() {
        for c in "PNBRQKpnbrqk".chars() {
            assert_eq!(c, Piece::from_name(c).unwrap().name());
        }
        assert!(Piece::from_name('x').is_none());
    }
}
