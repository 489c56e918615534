//! Error taxonomy for a single launcher run.
//!
//! Exit code mapping:
//! - `RunFailed` relays the container's own status code.
//! - Every other error maps to 1.
//!
//! No error is retried; each one ends the current invocation.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    /// A path that must already exist (the working directory) is missing.
    #[error("working directory does not exist: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// The config or data directory could not be created or resolved.
    #[error("cannot create {what} directory {}: {source}", .path.display())]
    PathCreation {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown option: {option}")]
    UnknownOption { option: String },

    #[error("option {option} requires a value")]
    MissingValue { option: String },

    /// Any other command line rejection (e.g. a stray positional before `--`).
    #[error("{message}")]
    Usage { message: String },

    #[error("cannot determine the home directory for default config/data paths")]
    HomeUnknown,

    /// The container runtime is not installed or its daemon is not reachable.
    #[error("container runtime unavailable: {reason}")]
    RuntimeUnavailable { reason: String },

    #[error("build descriptor not found: {}", .path.display())]
    BuildDescriptorMissing { path: PathBuf },

    #[error("building image {image} failed: {reason}")]
    BuildFailed { image: String, reason: String },

    #[error("container exited with status {code}")]
    RunFailed { code: i32 },
}

impl LaunchError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            LaunchError::RunFailed { code } => exit_code_for_status(*code),
            _ => 1,
        }
    }

    /// True when the usage text should follow the error line.
    pub fn shows_usage(&self) -> bool {
        matches!(
            self,
            LaunchError::UnknownOption { .. }
                | LaunchError::MissingValue { .. }
                | LaunchError::Usage { .. }
        )
    }
}

/// Clamp a child status into a non-zero process exit code.
pub fn exit_code_for_status(code: i32) -> u8 {
    match u8::try_from(code) {
        Ok(0) | Err(_) => 1,
        Ok(c) => c,
    }
}
