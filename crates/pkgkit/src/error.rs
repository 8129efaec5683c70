//! Error types for native tooling operations.
//!
//! A nonzero exit is not an error here: it is a normal outcome the caller
//! interprets. Errors cover the cases where no usable outcome exists.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Categories of tooling errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Executable not found
    ToolMissing,
    /// Command ran past the configured timeout
    Timeout,
    /// Command exited nonzero when asked to fail on it
    Execution,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ToolMissing => "Executable not found",
            Self::Timeout => "Command timed out",
            Self::Execution => "Command failed",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::ToolMissing => "Check that the native package tools are installed and in PATH",
            Self::Timeout => "Raise the timeout or check whether the tool is waiting for input",
            Self::Execution => "Check the command's stderr for details",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while running native tools.
#[derive(Debug, Error)]
pub enum Error {
    /// The program could not be found
    #[error("{program}: command not found")]
    ToolMissing {
        /// Program that was looked up
        program: String,
    },

    /// The command did not finish in time and was killed
    #[error("command timed out after {}s: {command}", timeout.as_secs())]
    Timeout {
        /// Rendered command line
        command: String,
        /// Configured limit
        timeout: Duration,
    },

    /// The command exited nonzero and the caller asked to fail on it
    #[error("command failed with rc={rc}: {command}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit code
        rc: i32,
        /// Standard error output
        stderr: String,
    },

    /// IO error while spawning or waiting
    #[error("IO error running {command}: {source}")]
    Io {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with command context.
    pub fn io(command: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            command: command.into(),
            source,
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::ToolMissing { .. } => ErrorCategory::ToolMissing,
            Error::Timeout { .. } => ErrorCategory::Timeout,
            Error::CommandFailed { .. } => ErrorCategory::Execution,
            Error::Io { .. } => ErrorCategory::Other,
        }
    }
}

/// Result type for native tooling operations.
pub type Result<T> = std::result::Result<T, Error>;
