use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown parameter passed: {flag}")]
    UnknownFlag { flag: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error(transparent)]
    Release(#[from] pyrelease::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::UnknownFlag { .. } | AppError::InvalidArguments { .. } => 1,
            AppError::Release(e) => e.exit_code(),
        }
    }
}

impl From<clap::Error> for AppError {
    fn from(err: clap::Error) -> Self {
        use clap::error::{ContextKind, ContextValue, ErrorKind};

        if err.kind() == ErrorKind::UnknownArgument {
            if let Some(ContextValue::String(flag)) = err.get(ContextKind::InvalidArg) {
                return AppError::UnknownFlag { flag: flag.clone() };
            }
        }
        // First line only; clap appends its own usage and tips.
        let rendered = err.to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        AppError::InvalidArguments { message }
    }
}
