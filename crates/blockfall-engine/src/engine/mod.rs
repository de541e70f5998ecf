//! Game rules built on top of the core data structures.
//!
//! - [`GameField`] - Board, falling piece, and movement rules (move, rotate, drop, lock)
//! - [`GameSession`] - Phase state machine, gravity timing, and command dispatch
//! - [`Progression`] - Score, level, cleared lines, and drop interval
//! - [`PieceGenerator`] - Seedable uniform random piece source
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (optionally with a [`PieceSeed`]) and apply [`Command::Start`]
//! 2. Feed player commands through [`GameSession::apply`]
//! 3. Call [`GameSession::tick`] with elapsed time; gravity drops the piece when
//!    the drop interval is exceeded
//! 4. A piece that cannot move down locks: it is merged into the board, the next
//!    piece spawns, and full rows are cleared
//! 5. The game ends when a freshly spawned piece collides; [`Command::Start`]
//!    restarts it
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, GamePhase, GameSession};
//!
//! let mut session = GameSession::new();
//! session.apply(Command::Start);
//!
//! while session.phase() == GamePhase::Running {
//!     session.apply(Command::HardDrop);
//! }
//! assert_eq!(session.phase(), GamePhase::GameOver);
//! ```

pub use self::{game_field::*, game_session::*, piece_generator::*, progression::*};

mod game_field;
mod game_session;
mod piece_generator;
mod progression;
