use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    MoveError, NoFallingPieceError,
    core::{board::Board, piece::Piece},
};

use super::{
    game_field::{DropOutcome, GameField, LockOutcome},
    piece_generator::{PieceGenerator, PieceSeed},
    progression::Progression,
};

/// Phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum GamePhase {
    /// Before the first start; nothing moves.
    Idle,
    /// Normal play.
    Running,
    /// Gravity and piece commands are suspended.
    Paused,
    /// The last spawn collided; only a restart is accepted.
    GameOver,
}

/// Discrete player commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
    /// Starts the first game, or restarts after a game over.
    Start,
}

/// A game with timing, progression, and phase handling.
///
/// `GameSession` is the single owner of all game state. Front-ends feed it
/// [`Command`]s and elapsed time through [`GameSession::tick`], then read the
/// board, falling piece, progression, and phase to redraw.
///
/// # State machine
///
/// ```text
/// Idle --Start--> Running <--TogglePause--> Paused
///                    |
///            spawn collision
///                    v
///                GameOver --Start--> (reset) Running
/// ```
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{Command, GamePhase, GameSession};
///
/// let mut session = GameSession::new();
/// assert_eq!(session.phase(), GamePhase::Idle);
///
/// session.apply(Command::Start);
/// assert_eq!(session.phase(), GamePhase::Running);
///
/// let y = session.falling_piece().unwrap().position().y();
/// session.tick(Duration::from_millis(1001));
/// assert_eq!(session.falling_piece().unwrap().position().y(), y + 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    progression: Progression,
    phase: GamePhase,
    drop_counter: Duration,
    running_time: Duration,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates an idle session with a randomly seeded piece generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::new())
    }

    /// Like [`Self::new`], but with a fixed seed for a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_generator(PieceGenerator::with_seed(seed))
    }

    #[must_use]
    pub fn with_generator(generator: PieceGenerator) -> Self {
        Self::with_field(GameField::new(generator))
    }

    /// Creates an idle session around an existing field.
    ///
    /// The field is used as-is on the first start, which lets callers begin
    /// from a prepared board.
    #[must_use]
    pub fn with_field(field: GameField) -> Self {
        Self {
            field,
            progression: Progression::new(),
            phase: GamePhase::Idle,
            drop_counter: Duration::ZERO,
            running_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.field.generator().seed()
    }

    /// Time accumulated towards the next automatic drop.
    #[must_use]
    pub fn drop_counter(&self) -> Duration {
        self.drop_counter
    }

    /// Total time spent in the running phase since the last start.
    #[must_use]
    pub fn running_time(&self) -> Duration {
        self.running_time
    }

    /// Applies one player command.
    ///
    /// Piece commands are ignored unless the game is running. Rejected moves
    /// and rotations leave the state unchanged.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => _ = self.try_move_left(),
            Command::MoveRight => _ = self.try_move_right(),
            Command::SoftDrop => _ = self.soft_drop(),
            Command::Rotate => _ = self.try_rotate(),
            Command::HardDrop => _ = self.hard_drop(),
            Command::TogglePause => self.toggle_pause(),
            Command::Start => self.start(),
        }
    }

    /// Starts a game from `Idle` or restarts one after `GameOver`.
    ///
    /// Has no effect while a game is running or paused.
    pub fn start(&mut self) {
        match self.phase {
            GamePhase::Idle => {}
            GamePhase::GameOver => {
                self.field.clear();
                self.progression = Progression::new();
            }
            GamePhase::Running | GamePhase::Paused => return,
        }
        self.drop_counter = Duration::ZERO;
        self.running_time = Duration::ZERO;
        self.set_phase(GamePhase::Running);
        if self.field.spawn().is_err() {
            self.set_phase(GamePhase::GameOver);
        }
    }

    /// Switches between `Running` and `Paused`; other phases are unaffected.
    pub fn toggle_pause(&mut self) {
        let phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::Idle | GamePhase::GameOver => return,
        };
        self.set_phase(phase);
    }

    /// Advances time by `elapsed`.
    ///
    /// While running, elapsed time accumulates in the drop counter; once it
    /// exceeds the current drop interval the piece drops one row (or locks).
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.phase.is_running() {
            return;
        }
        self.running_time += elapsed;
        self.drop_counter += elapsed;
        if self.drop_counter > self.progression.drop_interval() {
            _ = self.soft_drop();
        }
    }

    fn ensure_running(&self) -> Result<(), NoFallingPieceError> {
        if self.phase.is_running() {
            Ok(())
        } else {
            Err(NoFallingPieceError)
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.ensure_running()?;
        self.field.try_move(-1)
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.ensure_running()?;
        self.field.try_move(1)
    }

    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        self.ensure_running()?;
        self.field.try_rotate()
    }

    /// Moves the piece down one row or locks it, and restarts the drop countdown.
    pub fn soft_drop(&mut self) -> Result<DropOutcome, NoFallingPieceError> {
        self.ensure_running()?;
        let outcome = self.field.soft_drop()?;
        if let DropOutcome::Locked(lock) = outcome {
            self.complete_lock(lock);
        }
        self.drop_counter = Duration::ZERO;
        Ok(outcome)
    }

    /// Drops the piece to its resting row and locks it in one step.
    pub fn hard_drop(&mut self) -> Result<LockOutcome, NoFallingPieceError> {
        self.ensure_running()?;
        let lock = self.field.hard_drop()?;
        self.complete_lock(lock);
        self.drop_counter = Duration::ZERO;
        Ok(lock)
    }

    fn complete_lock(&mut self, lock: LockOutcome) {
        if self.progression.record_cleared_lines(lock.cleared_lines) {
            info!(
                level = self.progression.level(),
                drop_interval_ms = self.progression.drop_interval_ms(),
                "level up"
            );
        }
        if lock.topped_out {
            info!(
                score = self.progression.score(),
                lines = self.progression.lines_cleared(),
                level = self.progression.level(),
                "game over"
            );
            self.set_phase(GamePhase::GameOver);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase transition");
            self.phase = phase;
        }
    }
}
