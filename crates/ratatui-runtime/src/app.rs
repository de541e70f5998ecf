use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Callbacks a game drives through [`Runtime::run`].
pub trait App {
    /// Called once before the first event; set the tick rate and render mode here.
    fn init(&mut self, runtime: &mut Runtime);

    /// Checked before every event; returning `true` leaves the loop.
    fn should_exit(&self) -> bool;

    /// Key presses, resizes, and other terminal input.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances game time.
    ///
    /// `elapsed` is the wall-clock time since the previous tick rather than
    /// the nominal interval, so timers such as a gravity countdown stay
    /// accurate when ticks arrive late.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);
}
