use std::time::Duration;

use blockfall_engine::{Command, GameSession};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use ratatui_runtime::{App, RenderMode, Runtime};

use crate::view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay};

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    fps: u32,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, fps: u32) -> Self {
        Self {
            session,
            fps,
            is_exiting: false,
        }
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }

    fn key_bindings(&self) -> Vec<KeyBinding<'static>> {
        let phase = self.session.phase();
        let mut bindings = vec![];
        if phase.is_running() {
            bindings.extend_from_slice(PLAYING_BINDINGS);
            bindings.push((PAUSE_KEYS, "Pause"));
        } else if phase.is_paused() {
            bindings.push((PAUSE_KEYS, "Resume"));
        } else if phase.is_idle() {
            bindings.push((START_KEYS, "Start"));
        } else {
            bindings.push((START_KEYS, "Restart"));
        }
        bindings.push((QUIT_KEYS, "Quit"));
        bindings
    }
}

const PLAYING_BINDINGS: &[KeyBinding<'static>] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑"], "Rotate"),
    (&["Space"], "Hard Drop"),
];
const PAUSE_KEYS: &[&str] = &["P"];
const START_KEYS: &[&str] = &["S", "Enter"];
const QUIT_KEYS: &[&str] = &["Q"];

/// Maps a key to the game command it triggers.
fn command_for_key(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Up => Command::Rotate,
        KeyCode::Char(' ') => Command::HardDrop,
        KeyCode::Char('p' | 'P') => Command::TogglePause,
        KeyCode::Char('s' | 'S') | KeyCode::Enter => Command::Start,
        _ => return None,
    };
    Some(command)
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        let fps = f64::from(self.fps);
        runtime.set_tick_rate(Some(fps));
        runtime.set_render_mode(RenderMode::throttled_from_rate(fps));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.is_exiting = true,
            code => {
                if let Some(command) = command_for_key(code) {
                    self.session.apply(command);
                }
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session);
        let bindings = self.key_bindings();
        let help = KeyBindingDisplay::new(&bindings);

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(session_display.height()), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.session.tick(elapsed);
    }
}
