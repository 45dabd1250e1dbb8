use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use array_macro::array;
use log::debug;

use crate::piece::{Color, Piece, PieceKind};

static BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

const KING_HOME_COL: u8 = 4;

/// Row 0 is rank 8 and column 0 is the a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    pub fn is_on_board(self) -> bool {
        self.row < 8 && self.col < 8
    }

    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let result = Square::new(row, col);
        result.is_on_board().then_some(result)
    }

    /// (row difference, column difference) from self to other. Both squares must be on the board.
    pub fn delta_to(self, other: Square) -> (i8, i8) {
        (other.row as i8 - self.row as i8, other.col as i8 - self.col as i8)
    }

    /// All 64 squares in row-major order, starting at a8
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|row| (0..8).map(move |col| Square::new(row, col)))
    }

    pub fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    pub fn rank(self) -> u8 {
        8 - self.row
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_on_board() {
            return write!(f, "({}, {})", self.row, self.col);
        }
        write!(f, "{}{}", self.file_char(), self.rank())
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("Expected a square like 'e2' but got '{s}'"));
        }

        let col = match bytes[0] {
            b'a'..=b'h' => bytes[0] - b'a',
            _ => return Err(format!("Unexpected file in square '{s}'")),
        };
        let row = match bytes[1] {
            b'1'..=b'8' => 8 - (bytes[1] - b'0'),
            _ => return Err(format!("Unexpected rank in square '{s}'")),
        };

        Ok(Square::new(row, col))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// The standard starting position. Black owns rows 0 and 1, White rows 6 and 7.
    pub fn initialize() -> Board {
        Board {
            squares: array![row => array![col => starting_piece(row, col); 8]; 8],
        }
    }

    /// Off-board squares read as empty
    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        if !square.is_on_board() {
            return None;
        }
        self.squares[square.row as usize][square.col as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.row as usize][square.col as usize] = piece;
    }

    /// Occupied squares in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// First king of the color in row-major order
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Accepts the piece placement field and optionally side to move and castling availability.
    /// Any later fields are ignored. Kings and rooks only count as unmoved when the castling field says so.
    pub fn from_fen(fen: &str) -> Result<(Board, Color), String> {
        if !fen.is_ascii() {
            return Err(String::from("Expected FEN to only contain ASCII characters"));
        }

        let fen_pieces: Vec<&str> = fen.split_ascii_whitespace().collect();
        if fen_pieces.is_empty() {
            return Err(String::from("Expected FEN to have at least the piece placement part"));
        }

        let mut board = Board::default();

        let ranks: Vec<&str> = fen_pieces[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(format!("Expected FEN to have 8 ranks but it had {}", ranks.len()));
        }

        for (row, rank) in ranks.iter().enumerate() {
            let mut col: u8 = 0;
            for c in rank.chars() {
                match c {
                    '1'..='8' => {
                        col = col.saturating_add(c as u8 - b'0');
                    }
                    _ => {
                        let Some(piece) = Piece::from_name(c) else {
                            return Err(format!(
                                "Encountered unexpected character {} while processing piece placement",
                                c
                            ));
                        };
                        if col >= 8 {
                            return Err(format!("Rank {} has more than 8 files", 8 - row));
                        }
                        board.set(Square::new(row as u8, col), Some(piece));
                        col += 1;
                    }
                }
            }

            if col != 8 {
                return Err(format!("Rank {} has {} files instead of 8", 8 - row, col));
            }
        }

        let side_to_move = match fen_pieces.get(1) {
            None | Some(&"w") => Color::White,
            Some(&"b") => Color::Black,
            Some(other) => {
                return Err(format!("Encountered unexpected Side to move value '{}'", other));
            }
        };

        let castling = fen_pieces.get(2).copied().unwrap_or("-");
        if castling != "-" {
            if let Some(c) = castling.chars().find(|c| !matches!(c, 'K' | 'Q' | 'k' | 'q')) {
                return Err(format!(
                    "Encountered unexpected character {} while processing castling rights",
                    c
                ));
            }
        }

        for (sq, piece) in board.pieces().collect::<Vec<_>>() {
            let unmoved = match (piece.kind, piece.color) {
                (PieceKind::King, Color::White) => {
                    sq == Square::new(7, KING_HOME_COL) && (castling.contains('K') || castling.contains('Q'))
                }
                (PieceKind::King, Color::Black) => {
                    sq == Square::new(0, KING_HOME_COL) && (castling.contains('k') || castling.contains('q'))
                }
                (PieceKind::Rook, Color::White) => {
                    (sq == Square::new(7, 7) && castling.contains('K'))
                        || (sq == Square::new(7, 0) && castling.contains('Q'))
                }
                (PieceKind::Rook, Color::Black) => {
                    (sq == Square::new(0, 7) && castling.contains('k'))
                        || (sq == Square::new(0, 0) && castling.contains('q'))
                }
                _ => true,
            };

            if !unmoved {
                board.set(sq, Some(piece.with_moved()));
            }
        }

        debug!("Parsed FEN '{fen}'");
        Ok((board, side_to_move))
    }

    pub fn to_fen(&self, side_to_move: Color) -> String {
        let mut placement = String::new();
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.get(Square::new(row, col)) {
                    None => empty += 1,
                    Some(p) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(p.name());
                    }
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if row < 7 {
                placement.push('/');
            }
        }

        let mut castling = String::new();
        for (right, color, rook_col) in [
            ('K', Color::White, 7),
            ('Q', Color::White, 0),
            ('k', Color::Black, 7),
            ('q', Color::Black, 0),
        ] {
            if self.has_castling_pieces(color, rook_col) {
                castling.push(right);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let side = match side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };

        format!("{placement} {side} {castling} - 0 1")
    }

    fn has_castling_pieces(&self, color: Color, rook_col: u8) -> bool {
        let row = color.back_row();
        let king_ready = self
            .get(Square::new(row, KING_HOME_COL))
            .is_some_and(|p| p.kind == PieceKind::King && p.color == color && !p.moved);
        let rook_ready = self
            .get(Square::new(row, rook_col))
            .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color && !p.moved);

        king_ready && rook_ready
    }
}

fn starting_piece(row: usize, col: usize) -> Option<Piece> {
    match row {
        0 => Some(Piece::new(Color::Black, BACK_RANK[col])),
        1 => Some(Piece::new(Color::Black, PieceKind::Pawn)),
        6 => Some(Piece::new(Color::White, PieceKind::Pawn)),
        7 => Some(Piece::new(Color::White, BACK_RANK[col])),
        _ => None,
    }
}

/// An empty board
impl Default for Board {
    fn default() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8 {
                match self.get(Square::new(row, col)) {
                    Some(p) => write!(f, " {}", p.name())?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "\n   a b c d e f g h")
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("placement", &self.to_fen(Color::White))
            .finish()?;

        writeln!(f, "\n{}", self)
    }
}

#[cfg(test)]
mod board_tests {
    use crate::STARTING_FEN;

    use super::*;

    #[test]
    pub fn initial_setup_matches_starting_fen() {
        let (from_fen, side) = Board::from_fen(STARTING_FEN).unwrap();

        assert_eq!(Color::White, side);
        assert_eq!(Board::initialize(), from_fen);
        assert_eq!(STARTING_FEN, Board::initialize().to_fen(Color::White));
    }

    #[test]
    pub fn initial_setup_layout() {
        let b = Board::initialize();

        assert_eq!(Some(Piece::new(Color::Black, PieceKind::King)), b.get(Square::new(0, 4)));
        assert_eq!(Some(Piece::new(Color::Black, PieceKind::Queen)), b.get(Square::new(0, 3)));
        assert_eq!(Some(Piece::new(Color::White, PieceKind::King)), b.get(Square::new(7, 4)));
        assert_eq!(Some(Piece::new(Color::White, PieceKind::Rook)), b.get(Square::new(7, 0)));
        assert_eq!(Some(Piece::new(Color::White, PieceKind::Knight)), b.get(Square::new(7, 6)));

        for col in 0..8 {
            assert_eq!(Some(Piece::new(Color::Black, PieceKind::Pawn)), b.get(Square::new(1, col)));
            assert_eq!(Some(Piece::new(Color::White, PieceKind::Pawn)), b.get(Square::new(6, col)));
            for row in 2..6 {
                assert_eq!(None, b.get(Square::new(row, col)));
            }
        }

        assert_eq!(32, b.pieces().count());
        assert!(b.pieces().all(|(_, p)| !p.moved));
    }

    #[test]
    pub fn square_notation() {
        assert_eq!(Square::new(6, 4), "e2".parse().unwrap());
        assert_eq!(Square::new(0, 0), "a8".parse().unwrap());
        assert_eq!(Square::new(7, 7), "h1".parse().unwrap());
        assert_eq!("e2", Square::new(6, 4).to_string());
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    pub fn squares_are_row_major() {
        let all: Vec<Square> = Square::all().collect();

        assert_eq!(64, all.len());
        assert_eq!(Square::new(0, 0), all[0]);
        assert_eq!(Square::new(0, 1), all[1]);
        assert_eq!(Square::new(7, 7), all[63]);
    }

    #[test]
    pub fn offset_stays_on_board() {
        assert_eq!(None, Square::new(0, 0).offset(-1, 0));
        assert_eq!(None, Square::new(7, 7).offset(0, 1));
        assert_eq!(Some(Square::new(5, 5)), Square::new(7, 4).offset(-2, 1));
    }

    #[test]
    pub fn castling_field_controls_moved_flags() {
        let (b, side) = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 0 1").unwrap();

        assert_eq!(Color::Black, side);
        assert!(!b.get("e1".parse().unwrap()).unwrap().moved);
        assert!(!b.get("h1".parse().unwrap()).unwrap().moved);
        assert!(b.get("a1".parse().unwrap()).unwrap().moved);
        assert!(!b.get("e8".parse().unwrap()).unwrap().moved);
        assert!(!b.get("a8".parse().unwrap()).unwrap().moved);
        assert!(b.get("h8".parse().unwrap()).unwrap().moved);

        assert_eq!("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 0 1", b.to_fen(Color::Black));
    }

    #[test]
    pub fn placement_only_fen_defaults() {
        let (b, side) = Board::from_fen("4k3/8/8/8/8/8/8/4K2R").unwrap();

        assert_eq!(Color::White, side);
        assert!(b.get("e1".parse().unwrap()).unwrap().moved);
        assert!(b.get("h1".parse().unwrap()).unwrap().moved);
    }

    #[test]
    pub fn invalid_fens_are_rejected() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8 w - -").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8 w - -").is_err());
        assert!(Board::from_fen("rnbqkbnrr/8/8/8/8/8/8/8 w - -").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8 w - -").is_err());
        assert!(Board::from_fen("4x3/8/8/8/8/8/8/8 w - -").is_err());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 x - -").is_err());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 w KX -").is_err());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 w ♔ -").is_err());
    }

    #[test]
    pub fn find_king_uses_first_in_row_major_order() {
        let (b, _) = Board::from_fen("8/8/8/8/8/8/8/K6K w - -").unwrap();
        assert_eq!(Some(Square::new(7, 0)), b.find_king(Color::White));
        assert_eq!(None, b.find_king(Color::Black));
    }
}
