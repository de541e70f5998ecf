use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameSession, PieceSeed};
use ratatui_runtime::Runtime;
use tracing::info;

use crate::{command::play::app::PlayApp, logging, schema::result::GameResult, util};

mod app;

const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence, as 32 hex digits (random if omitted)
    #[clap(long)]
    pub(crate) seed: Option<PieceSeed>,
    /// Frames (and gravity ticks) per second
    #[clap(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub(crate) fps: u32,
    /// Write diagnostic logs to this file
    #[clap(long)]
    pub(crate) log_file: Option<PathBuf>,
    /// Log filter directive used with `--log-file`
    #[clap(long, default_value = "info")]
    pub(crate) log_level: String,
    /// Write the final result as JSON to this file when the program exits
    #[clap(long)]
    pub(crate) save_result: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            fps: DEFAULT_FPS,
            log_file: None,
            log_level: "info".to_owned(),
            save_result: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        fps,
        log_file,
        log_level,
        save_result,
    } = arg;

    if let Some(path) = log_file {
        logging::init(path, log_level)?;
    }

    let session = match seed {
        Some(seed) => GameSession::with_seed(*seed),
        None => GameSession::new(),
    };
    info!(seed = %session.seed(), fps, "starting play session");

    let mut app = PlayApp::new(session, *fps);
    Runtime::new()
        .run(&mut app)
        .context("Failed to run terminal UI")?;

    let session = app.into_session();
    let result = GameResult::from_session(&session);
    info!(
        score = result.progression.score(),
        level = result.progression.level(),
        lines = result.progression.lines_cleared(),
        "play session finished"
    );

    if let Some(path) = save_result {
        util::save_json(&result, path)?;
    }

    Ok(())
}
