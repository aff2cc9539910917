/// Error types shared across the game.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Raw mode could not be switched on. Fatal: play needs raw input.
    #[error("cannot initialize terminal: {0}")]
    TerminalInit(#[source] io::Error),

    #[error("cannot write leaderboard {}: {source}", path.display())]
    LeaderboardWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
