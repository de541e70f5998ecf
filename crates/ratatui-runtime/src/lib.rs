//! Minimal frame-scheduling runtime for ratatui applications.
//!
//! [`Runtime::run`] drives an [`App`] with three kinds of events: fixed-rate
//! ticks carrying the elapsed time since the previous tick, render requests,
//! and terminal input. All callbacks run on the calling thread, one at a time.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
