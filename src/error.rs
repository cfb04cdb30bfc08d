//! Error taxonomy for the greeting engine.
//!
//! None of these are fatal. Each one degrades to "skip this greeting" or
//! "proceed without persisting":
//!
//! - [`WelcomerError::ConfigIo`]: a list file could not be read or written. The
//!   in-memory state is still updated or falls back to built-in defaults.
//! - [`WelcomerError::EmptyPool`]: no templates are available at all.
//! - [`WelcomerError::Delivery`]: the outbound sink rejected the chat line.
//!   The cooldown clock update is kept and nothing is retried.
//! - [`WelcomerError::MalformedEvent`]: an inbound line is not a join line.
//!   Dropped silently by the adapter.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced by the welcomer services
#[derive(Error, Debug)]
pub enum WelcomerError {
    #[error("I/O error on {path}: {source}")]
    ConfigIo {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No message templates available")]
    EmptyPool,

    #[error("Failed to deliver chat message: {0}")]
    Delivery(String),

    #[error("Not a join event: {0}")]
    MalformedEvent(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Unknown mode '{0}' (expected default, constantiam or hypersafe)")]
    UnknownMode(String),
}

impl WelcomerError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        WelcomerError::ConfigIo {
            path: path.into(),
            source,
        }
    }
}

pub type WelcomerResult<T> = Result<T, WelcomerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_io_display_includes_path() {
        let err = WelcomerError::io(
            "config/welcomer_ignore.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.to_string();
        assert!(text.contains("config/welcomer_ignore.txt"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_unknown_mode_display() {
        let err = WelcomerError::UnknownMode("turbo".to_string());
        assert!(err.to_string().contains("turbo"));
    }
}
