use tracing::{debug, trace};

use crate::{
    MoveError, NoFallingPieceError, PieceCollisionError,
    core::{board::Board, piece::Piece},
};

use super::piece_generator::PieceGenerator;

/// Result of a drop step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece could not move down and was locked into the board.
    Locked(LockOutcome),
}

/// What happened when a piece locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    /// Number of rows removed by the line clear that followed the lock.
    pub cleared_lines: usize,
    /// Whether the replacement piece collided on spawn.
    pub topped_out: bool,
}

/// The board together with the falling piece and the piece source.
///
/// `GameField` implements the movement rules: every operation either commits
/// a collision-free result or leaves the field unchanged. It knows nothing
/// about timing, scoring, or game phases; see
/// [`GameSession`](super::GameSession) for those.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Option<Piece>,
    generator: PieceGenerator,
    locked_pieces: usize,
}

impl Default for GameField {
    fn default() -> Self {
        Self::new(PieceGenerator::new())
    }
}

impl GameField {
    /// Creates a field with an empty standard-size board and no falling piece.
    #[must_use]
    pub fn new(generator: PieceGenerator) -> Self {
        Self::with_board(Board::default(), generator)
    }

    #[must_use]
    pub fn with_board(board: Board, generator: PieceGenerator) -> Self {
        Self {
            board,
            falling_piece: None,
            generator,
            locked_pieces: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn generator(&self) -> &PieceGenerator {
        &self.generator
    }

    /// Returns the number of pieces locked since the field was last cleared.
    #[must_use]
    pub fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Empties the board and removes the falling piece.
    ///
    /// The piece generator keeps its state, so a restarted game continues the
    /// random sequence rather than replaying it.
    pub fn clear(&mut self) {
        self.board = Board::new(self.board.height(), self.board.width());
        self.falling_piece = None;
        self.locked_pieces = 0;
    }

    /// Places the falling piece, checking for collisions.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    /// Replaces the falling piece with a new random one at the spawn position.
    ///
    /// The new piece becomes the falling piece even if it collides, so that the
    /// final position stays visible after a top-out; the collision is reported
    /// as an error.
    pub fn spawn(&mut self) -> Result<(), PieceCollisionError> {
        let piece = Piece::spawn(self.generator.next_kind(), &self.board);
        trace!(kind = %piece.kind().as_char(), x = piece.position().x(), "spawned piece");
        self.falling_piece = Some(piece);
        if self.board.is_colliding(&piece) {
            debug!(kind = %piece.kind().as_char(), "spawned piece collides");
            return Err(PieceCollisionError);
        }
        Ok(())
    }

    fn current_piece(&self) -> Result<Piece, NoFallingPieceError> {
        self.falling_piece.ok_or(NoFallingPieceError)
    }

    /// Moves the falling piece `dx` columns; the field is unchanged on collision.
    pub fn try_move(&mut self, dx: i32) -> Result<(), MoveError> {
        let piece = self.current_piece()?.shifted(dx, 0);
        self.set_falling_piece(piece)?;
        Ok(())
    }

    /// Rotates the falling piece clockwise with kick search.
    ///
    /// If no kick resolves the rotation, the piece keeps its original
    /// orientation and column.
    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        let piece = self
            .current_piece()?
            .kicked_rotation(&self.board)
            .ok_or(PieceCollisionError)?;
        self.falling_piece = Some(piece);
        Ok(())
    }

    /// Moves the falling piece down one row, locking it if it cannot move.
    pub fn soft_drop(&mut self) -> Result<DropOutcome, NoFallingPieceError> {
        let piece = self.current_piece()?.shifted(0, 1);
        if self.set_falling_piece(piece).is_ok() {
            return Ok(DropOutcome::Moved);
        }
        Ok(DropOutcome::Locked(self.lock()?))
    }

    /// Drops the falling piece to its resting row and locks it.
    pub fn hard_drop(&mut self) -> Result<LockOutcome, NoFallingPieceError> {
        let piece = self.current_piece()?.drop_position(&self.board);
        self.falling_piece = Some(piece);
        self.lock()
    }

    /// Merges the falling piece, spawns its replacement, then clears full rows.
    ///
    /// The spawn check runs against the board before rows are cleared.
    fn lock(&mut self) -> Result<LockOutcome, NoFallingPieceError> {
        let piece = self.current_piece()?;
        self.board.fill_piece(&piece);
        self.locked_pieces += 1;
        debug!(
            kind = %piece.kind().as_char(),
            x = piece.position().x(),
            y = piece.position().y(),
            "locked piece"
        );

        let topped_out = self.spawn().is_err();
        let cleared_lines = self.board.clear_lines();
        if cleared_lines > 0 {
            debug!(cleared_lines, "cleared lines");
        }
        Ok(LockOutcome {
            cleared_lines,
            topped_out,
        })
    }
}
