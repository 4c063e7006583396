//! OMNI error types.

use std::path::PathBuf;

use darn_common::{DarnError, PipelineWarning};
use thiserror::Error;

use crate::files::OmniFiles;

pub type OmniResult<T> = Result<T, OmniError>;

#[derive(Debug, Error)]
pub enum OmniError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OMNI data availability could not be determined: {0}")]
    Availability(String),

    #[error("OMNI response did not contain a listing link")]
    ListingNotFound,

    #[error("No OMNI file was found at {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("OMNI file {filename} was not generated for the date {date}")]
    FileNotGenerated { filename: String, date: String },

    #[error("No good IMF data in the OMNI file for {date}")]
    BadData { date: String },
}

impl OmniError {
    /// The warning a map run records when IMF preparation fails this way.
    pub fn to_warning(&self, files: &OmniFiles) -> PipelineWarning {
        match self {
            OmniError::FileNotFound(path) => PipelineWarning::OmniFileNotFound { path: path.clone() },
            OmniError::BadData { date } => PipelineWarning::OmniBadData { date: date.clone() },
            OmniError::FileNotGenerated { filename, date } => PipelineWarning::OmniFileNotGenerated {
                filename: filename.clone(),
                date: date.clone(),
            },
            _ => PipelineWarning::OmniFileNotGenerated {
                filename: files.omni_filename(),
                date: files.date().to_string(),
            },
        }
    }
}

impl From<OmniError> for DarnError {
    fn from(err: OmniError) -> Self {
        match err {
            OmniError::Io(e) => DarnError::Io(e),
            other => DarnError::Omni(other.to_string()),
        }
    }
}
