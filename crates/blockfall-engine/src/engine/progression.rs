use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Points awarded per cleared line, multiplied by the level.
const POINTS_PER_LINE: usize = 100;
/// Cleared lines needed to advance one level.
const LINES_PER_LEVEL: usize = 10;
const INITIAL_DROP_INTERVAL_MS: u64 = 1000;
const DROP_INTERVAL_STEP_MS: u64 = 100;
const MIN_DROP_INTERVAL_MS: u64 = 100;

/// Score, level, cleared lines, and gravity speed.
///
/// Only line clears change progression; it is reset by replacing it with
/// [`Progression::new`] when a game restarts.
///
/// # Scoring
///
/// Each line clear event awards `lines * 100 * level`, using the level in
/// effect before the clear. The level is `lines / 10 + 1` and the automatic
/// drop interval is `1000 - (level - 1) * 100` milliseconds, never below 100.
///
/// # Example
///
/// ```
/// use blockfall_engine::Progression;
///
/// let mut progression = Progression::new();
/// progression.record_cleared_lines(4);
/// assert_eq!(progression.score(), 400);
///
/// progression.record_cleared_lines(6);
/// assert_eq!(progression.score(), 1000);
/// assert_eq!(progression.level(), 2);
/// assert_eq!(progression.drop_interval_ms(), 900);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    score: usize,
    level: usize,
    lines_cleared: usize,
    drop_interval_ms: u64,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Creates the progression of a fresh game: level 1, one second per drop.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines_cleared: 0,
            drop_interval_ms: INITIAL_DROP_INTERVAL_MS,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the total number of lines cleared so far.
    #[must_use]
    pub const fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    #[must_use]
    pub const fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }

    #[must_use]
    pub const fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.drop_interval_ms)
    }

    /// Updates score, level, and drop interval after a piece lock.
    ///
    /// Returns `true` if the level changed. Clearing zero lines changes nothing.
    pub fn record_cleared_lines(&mut self, cleared_lines: usize) -> bool {
        if cleared_lines == 0 {
            return false;
        }
        let previous_level = self.level;
        self.lines_cleared += cleared_lines;
        self.score += cleared_lines * POINTS_PER_LINE * previous_level;
        self.level = self.lines_cleared / LINES_PER_LEVEL + 1;
        self.drop_interval_ms = drop_interval_ms(self.level);
        self.level != previous_level
    }
}

fn drop_interval_ms(level: usize) -> u64 {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    INITIAL_DROP_INTERVAL_MS
        .saturating_sub(steps.saturating_mul(DROP_INTERVAL_STEP_MS))
        .max(MIN_DROP_INTERVAL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_progression() {
        let progression = Progression::new();
        assert_eq!(progression.score(), 0);
        assert_eq!(progression.level(), 1);
        assert_eq!(progression.lines_cleared(), 0);
        assert_eq!(progression.drop_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_lines_changes_nothing() {
        let mut progression = Progression::new();
        assert!(!progression.record_cleared_lines(0));
        assert_eq!(progression, Progression::new());
    }

    #[test]
    fn test_single_line_scores_current_level() {
        let mut progression = Progression::new();
        assert!(!progression.record_cleared_lines(1));
        assert_eq!(progression.score(), 100);
        assert_eq!(progression.lines_cleared(), 1);
        assert_eq!(progression.level(), 1);
        assert_eq!(progression.drop_interval_ms(), 1000);
    }

    #[test]
    fn test_score_uses_level_before_clear() {
        let mut progression = Progression::new();
        progression.record_cleared_lines(9);
        assert_eq!(progression.score(), 900);

        // Crossing into level 2 is still scored at level 1.
        assert!(progression.record_cleared_lines(3));
        assert_eq!(progression.score(), 900 + 300);
        assert_eq!(progression.level(), 2);

        progression.record_cleared_lines(1);
        assert_eq!(progression.score(), 1200 + 200);
    }

    #[test]
    fn test_level_and_speed_progression() {
        let mut progression = Progression::new();
        for _ in 0..10 {
            progression.record_cleared_lines(1);
        }
        assert_eq!(progression.level(), 2);
        assert_eq!(progression.drop_interval_ms(), 900);

        for _ in 0..15 {
            progression.record_cleared_lines(1);
        }
        assert_eq!(progression.lines_cleared(), 25);
        assert_eq!(progression.level(), 3);
        assert_eq!(progression.drop_interval_ms(), 800);
    }

    #[test]
    fn test_drop_interval_floor() {
        assert_eq!(drop_interval_ms(1), 1000);
        assert_eq!(drop_interval_ms(9), 200);
        assert_eq!(drop_interval_ms(10), 100);
        assert_eq!(drop_interval_ms(11), 100);
        assert_eq!(drop_interval_ms(1000), 100);

        let mut progression = Progression::new();
        progression.record_cleared_lines(150);
        assert_eq!(progression.level(), 16);
        assert_eq!(progression.drop_interval_ms(), 100);
    }

    #[test]
    fn test_serialization() {
        let mut progression = Progression::new();
        progression.record_cleared_lines(2);
        let json = serde_json::to_string(&progression).unwrap();
        assert_eq!(
            json,
            r#"{"score":200,"level":1,"lines_cleared":2,"drop_interval_ms":1000}"#
        );
        let back: Progression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progression);
    }
}
