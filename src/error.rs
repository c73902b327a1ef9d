//! Error types and handling for skiff
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for skiff operations
#[derive(Error, Diagnostic, Debug)]
pub enum SkiffError {
    // Selection errors
    #[error("Cannot use both --include and --exclude options together")]
    #[diagnostic(
        code(skiff::selection::conflicting),
        help("Pick one selection mode: an allow-list (--include) or a deny-list (--exclude)")
    )]
    ConflictingSelection,

    #[error("Option '{flag}' requires a value")]
    #[diagnostic(
        code(skiff::cli::missing_value),
        help("Pass the value right after the flag, e.g. '--include web'")
    )]
    DirectiveMissingValue { flag: String },

    // Port mapping errors
    #[error("Invalid port mapping '{token}': {reason}")]
    #[diagnostic(
        code(skiff::ports::invalid_mapping),
        help("Port mappings use the form SERVICE:HOST_PORT:CONTAINER_PORT, e.g. 'web:8080:80'")
    )]
    InvalidPortMapping { token: String, reason: String },

    // Compose file errors
    #[error("No compose file found")]
    #[diagnostic(
        code(skiff::compose::not_found),
        help(
            "Pass one with -f, or create docker-compose.yml / docker-compose.yaml in the working directory"
        )
    )]
    ComposeFileNotFound,

    #[error("Failed to read compose file: {path}")]
    #[diagnostic(code(skiff::compose::read_failed))]
    ComposeReadFailed { path: String, reason: String },

    #[error("Failed to parse compose file: {path}")]
    #[diagnostic(code(skiff::compose::parse_failed))]
    ComposeParseFailed { path: String, reason: String },

    #[error("Failed to serialize compose document")]
    #[diagnostic(code(skiff::compose::serialize_failed))]
    SerializeFailed { reason: String },

    // Process errors
    #[error("Failed to run '{binary}': {reason}")]
    #[diagnostic(
        code(skiff::process::spawn_failed),
        help("Check that the compose binary is installed and on PATH (override with --compose-bin)")
    )]
    SpawnFailed { binary: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(skiff::io::error))]
    IoError { message: String },
}

impl From<std::io::Error> for SkiffError {
    fn from(err: std::io::Error) -> Self {
        SkiffError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SkiffError {
    fn from(err: serde_yaml::Error) -> Self {
        SkiffError::SerializeFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SkiffError>;
