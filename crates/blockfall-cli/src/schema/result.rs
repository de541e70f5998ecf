use blockfall_engine::{GamePhase, GameSession, PieceSeed, Progression};
use serde::{Deserialize, Serialize};

/// Summary of a play session, written with `--save-result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    /// Seed of the piece sequence, so the game can be replayed
    pub seed: PieceSeed,
    /// Phase the session was in when the program exited
    pub phase: GamePhase,
    pub progression: Progression,
    pub locked_pieces: usize,
    /// Time spent running, excluding pauses
    pub duration_ms: u64,
}

impl GameResult {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            seed: session.seed(),
            phase: session.phase(),
            progression: *session.progression(),
            locked_pieces: session.field().locked_pieces(),
            duration_ms: u64::try_from(session.running_time().as_millis()).unwrap_or(u64::MAX),
        }
    }
}
