use log::{debug, info};

use crate::{
    board::{Board, Square},
    game_state::{GameStatus, game_status},
    move_generator::{Destinations, get_all_moves, get_valid_moves},
    moves::Move,
    piece::Color,
    search::{AI_COLOR, Searcher},
};

/// Errors returned by a game session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("The game is over, {loser} is checkmated")]
    GameOver { loser: Color },

    #[error("There is no piece on {square}")]
    EmptySquare { square: Square },

    #[error("The piece on {square} belongs to {owner} but it is {turn}'s turn")]
    WrongTurn { square: Square, owner: Color, turn: Color },

    #[error("{mv} is not a legal move")]
    IllegalMove { mv: Move },

    #[error("The AI only plays black but it is {turn}'s turn")]
    NotAiTurn { turn: Color },

    #[error("{side} has no legal moves")]
    NoMovesAvailable { side: Color },
}

pub type GameResult<T> = Result<T, GameError>;

/// What changed after a move was played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mv: Move,
    pub board: Board,
    /// Status of the side now to move
    pub status: GameStatus,
}

/// A game between White and Black, where Black can be played by a `Searcher`
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Color,
    status: GameStatus,
    history: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Game {
        Game::from_board(Board::initialize(), Color::White)
    }

    pub fn from_board(board: Board, turn: Color) -> Game {
        Game {
            board,
            turn,
            status: game_status(&board, turn),
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Checkmate
    }

    /// Every legal move for the side to move. Empty without checkmate means stalemate.
    pub fn legal_moves(&self) -> Vec<Move> {
        get_all_moves(&self.board, self.turn)
    }

    pub fn legal_destinations(&self, from: Square) -> GameResult<Destinations> {
        self.ensure_not_over()?;

        let piece = self.board.get(from).ok_or(GameError::EmptySquare { square: from })?;
        if piece.color != self.turn {
            return Err(GameError::WrongTurn {
                square: from,
                owner: piece.color,
                turn: self.turn,
            });
        }

        Ok(get_valid_moves(from, &piece, &self.board))
    }

    pub fn play_move(&mut self, mv: Move) -> GameResult<MoveOutcome> {
        let destinations = self.legal_destinations(mv.start)?;
        if !destinations.contains(&mv.end) {
            return Err(GameError::IllegalMove { mv });
        }

        Ok(self.commit(mv))
    }

    /// Searches for and plays Black's move with the searcher's configuration
    pub fn play_ai_move(&mut self, searcher: &mut Searcher) -> GameResult<MoveOutcome> {
        self.ensure_not_over()?;
        if self.turn != AI_COLOR {
            return Err(GameError::NotAiTurn { turn: self.turn });
        }

        let mv = searcher
            .make_best_move(&self.board)
            .ok_or(GameError::NoMovesAvailable { side: self.turn })?;

        Ok(self.commit(mv))
    }

    fn ensure_not_over(&self) -> GameResult<()> {
        if self.is_over() {
            return Err(GameError::GameOver { loser: self.turn });
        }
        Ok(())
    }

    fn commit(&mut self, mv: Move) -> MoveOutcome {
        info!("{} plays {}", self.turn, mv.pretty_print(&self.board));

        self.board = self.board.make_move(&mv);
        self.turn = self.turn.opposite();
        self.status = game_status(&self.board, self.turn);
        self.history.push(mv);

        debug!("{} to move, status {}. {}", self.turn, self.status, self.board.to_fen(self.turn));

        MoveOutcome {
            mv,
            board: self.board,
            status: self.status,
        }
    }
}
