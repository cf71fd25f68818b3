//! Error types for `stimdeck`.
//!
//! Every engine failure is a rejected operation, never a panic: callers
//! receive a typed reason, the run state is left untouched, and retrying
//! once the precondition holds succeeds. The top-level error maps each
//! domain to a process exit code for the CLI.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `stimdeck` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Deck configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Ingest error (no usable stimulus sources)
    pub const INGEST_ERROR: i32 = 4;

    /// Sequencing engine error (operation rejected outside its precondition)
    pub const ENGINE_ERROR: i32 = 5;

    /// Usage error (invalid arguments)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type aggregating all `stimdeck` domains.
#[derive(Debug, Error)]
pub enum StimdeckError {
    /// Deck configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sequencing engine rejected an operation
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Stimulus ingest error
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StimdeckError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Engine(_) => ExitCode::ENGINE_ERROR,
            Self::Ingest(_) => ExitCode::INGEST_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Sequencing engine rejections.
///
/// None of these is fatal: each call is a no-op on the run state and the
/// reason is reported to the caller.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EngineError {
    /// An operation was invoked outside its precondition state.
    #[error("operation '{operation}' rejected: {reason}")]
    InvalidOperation {
        /// Name of the rejected operation
        operation: &'static str,
        /// Why the precondition did not hold
        reason: String,
    },

    /// `start()` was called with zero items in the sequence.
    #[error("cannot start a run: the sequence is empty")]
    EmptySequence,

    /// Pool mutation attempted while a run is active.
    #[error("pool is frozen while a run is {status}: {request}")]
    PoolMutationRejected {
        /// Run status at the time of the request (`running` or `paused`)
        status: &'static str,
        /// The rejected request, for the user-facing message
        request: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidOperation`] rejection.
    pub(crate) fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Ingest Errors
// ============================================================================

/// Stimulus ingest failures.
///
/// Unclassifiable content inside an otherwise readable source is not an
/// error; it is reported as a skip at the pool boundary and never
/// surfaces into the engine.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A stimulus source path could not be read at all.
    #[error("cannot read stimulus source {path}: {message}")]
    UnreadableSource {
        /// Path to the source file
        path: PathBuf,
        /// Underlying I/O failure
        message: String,
    },

    /// Ingest produced no items from any source.
    #[error("no usable stimulus items in {sources} source(s)")]
    EmptyDeck {
        /// Number of sources inspected
        sources: usize,
    },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Deck configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the deck file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Referenced deck file not found
    #[error("deck file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

/// Result type alias for `stimdeck` operations.
pub type Result<T> = std::result::Result<T, StimdeckError>;

// ============================================================================
// Tests
// ============================================================================
