/// Entry point: config, logging, terminal setup, then one game session.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use error::GameError;
use sim::leaderboard::Leaderboard;
use sim::session::{Session, ThreadClock};
use ui::input::TerminalInput;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

fn main() -> ExitCode {
    let config = GameConfig::load();
    init_tracing(&config.log_file);
    tracing::info!(?config, "cowpasture starting");

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "pasture seed");

    let mut board = Leaderboard::load(&config.leaderboard_file);

    let mut renderer = Renderer::new(BufWriter::with_capacity(16384, io::stdout()));
    if let Err(e) = renderer.init() {
        let err = GameError::TerminalInit(e);
        tracing::error!(error = %err, "terminal setup failed");
        // Raw mode may be half on
        let _ = renderer.cleanup();
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let mut session = Session::new(TerminalInput::new(), renderer, ThreadClock, SmallRng::seed_from_u64(seed));
    if config.sound_enabled {
        session.sound = SoundEngine::new();
    }

    let result = session.run(&mut board, &config.leaderboard_file);

    if let Err(e) = session.renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(state) => {
            tracing::info!(score = state.score, "cowpasture exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "game aborted");
            eprintln!("Game error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to a file: stdout is the game screen. No file, no logging.
fn init_tracing(path: &Path) {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
