//! Crate-level error type and `Result` alias.
//! Wraps I/O and config parse failures, and carries the exit status of external
//! tools so the CLI can propagate it unchanged.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed with exit code {code}")]
    ToolFailed { tool: String, code: i32 },

    #[error("{tool} was terminated by a signal")]
    ToolKilled { tool: String },

    #[error("No artifacts to upload in {dir:?}. Run with --create first")]
    NoArtifacts { dir: PathBuf },
}

impl Error {
    /// Process exit status to report for this error.
    ///
    /// A failing external tool hands its own code through; everything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::ToolFailed { code, .. } => match u8::try_from(*code) {
                Ok(0) | Err(_) => 1,
                Ok(code) => code,
            },
            _ => 1,
        }
    }
}
