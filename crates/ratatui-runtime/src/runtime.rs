use std::{io, time::Duration};

use tracing::debug;

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Owns the terminal session and the tick/render schedule of one [`App`].
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    /// Creates a runtime with ticks disabled and on-dirty rendering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many times per second [`App::update`] is called; `None` stops ticking.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Like [`Self::set_tick_rate`], but with the period between ticks.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Enters the terminal, runs `app` until it asks to exit, and restores the terminal.
    ///
    /// Each loop iteration handles exactly one event. Ticks take priority over
    /// renders and carry the real elapsed time, so a slow frame delays gravity
    /// instead of dropping it. Input is handled as soon as it arrives.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);
        debug!(events = ?self.events, "runtime started");

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(elapsed) => {
                        app.update(&mut self, elapsed);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            debug!("runtime stopped");
            Ok(())
        })
    }
}
