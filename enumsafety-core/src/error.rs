//! Typed error handling for enumsafety.
//!
//! Analysis itself has a single hard failure (every detection technique
//! switched off). The remaining variants cover loading configuration and
//! package snapshots from disk.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for enumsafety operations.
#[derive(Error, Debug)]
pub enum EnumSafetyError {
    /// All five detection techniques are disabled; nothing could ever be
    /// detected, which is a configuration mistake rather than a clean result.
    #[error("all detection techniques are disabled; enable at least one")]
    DetectionDisabled,

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// I/O error when reading files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A package snapshot could not be decoded
    #[error("Snapshot error in {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl EnumSafetyError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a snapshot decoding error.
    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Errors caused by how the run was configured, as opposed to what it
    /// was asked to read. The CLI maps these to exit code 2.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::DetectionDisabled | Self::Config { .. } | Self::InvalidArgument { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Snapshot { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for enumsafety results.
pub type EnumSafetyResult<T> = Result<T, EnumSafetyError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> EnumSafetyResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> EnumSafetyResult<T> {
        self.map_err(|e| EnumSafetyError::io(path, e))
    }
}
