//! Error types for kapsule.

use std::io;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while validating, launching, or configuring a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong number of arguments for a subcommand.
    #[error("{0}")]
    Usage(String),

    /// The backend executable could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        /// Program that was being launched.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The backend ran but exited with a non-zero status.
    #[error("exit status {code}")]
    Exit {
        /// Exit code reported by the backend.
        code: i32,
    },

    /// The backend was terminated by a signal.
    #[error("terminated by signal {signal}")]
    Signaled {
        /// Signal number.
        signal: i32,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(String),
}

impl Error {
    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Create a launch error for `program`.
    pub fn launch(program: impl Into<String>, source: io::Error) -> Self {
        Error::Launch {
            program: program.into(),
            source,
        }
    }

    /// True if the error was raised before any process was spawned.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_display_matches_backend_status() {
        assert_eq!(Error::Exit { code: 3 }.to_string(), "exit status 3");
    }

    #[test]
    fn test_launch_display_names_program() {
        let err = Error::launch("ignite", io::Error::new(io::ErrorKind::NotFound, "not found"));
        let msg = err.to_string();
        assert!(msg.contains("ignite"));
        assert!(msg.contains("not found"));
        assert!(!err.is_usage());
    }
}
