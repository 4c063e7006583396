//! Error types for the convection map pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DarnError.
pub type DarnResult<T> = Result<T, DarnError>;

/// Primary error type for pipeline operations.
#[derive(Debug, Error)]
pub enum DarnError {
    // === Filesystem Errors ===
    #[error("Path: {} does not exist", .0.display())]
    PathDoesNotExist(PathBuf),

    #[error("{} does not exist, please make sure the spelling and path is correct", .0.display())]
    FileDoesNotExist(PathBuf),

    #[error("{0}")]
    UnsupportedType(String),

    // === Toolkit Errors ===
    #[error("RST function {program} failed with error value of {code}")]
    RstCommand { program: String, code: i32 },

    #[error("RST file {} is empty", .0.display())]
    RstFileEmpty(PathBuf),

    #[error("No grid files were produced for the following radars: {}", .0.join(", "))]
    NoGridFiles(Vec<String>),

    // === Input Errors ===
    #[error("OMNI error: {0}")]
    Omni(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DarnError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid(param: &str, message: impl Into<String>) -> Self {
        DarnError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}
