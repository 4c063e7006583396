//! Non-fatal conditions reported by a map run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A condition that degrades the output but does not stop the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    OmniFileNotGenerated { filename: String, date: String },
    OmniFileNotFound { path: PathBuf },
    OmniBadData { date: String },
    EmptyDataFile { file: PathBuf, process: String },
    FileNotFound { file: PathBuf, process: String },
    Convert { ps_file: PathBuf, extension: String },
    GridFailed { file: PathBuf, reason: String },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::OmniFileNotGenerated { filename, date } => write!(
                f,
                "OMNI file {} was not generated for the date {}; OMNI data will not be used \
                 in the convection map process",
                filename, date
            ),
            PipelineWarning::OmniFileNotFound { path } => {
                write!(f, "No OMNI file was found at {}", path.display())
            }
            PipelineWarning::OmniBadData { date } => write!(
                f,
                "The IMF file for the date {} was not generated because there was no good \
                 data in the OMNI file",
                date
            ),
            PipelineWarning::EmptyDataFile { file, process } => write!(
                f,
                "Data file {} is empty, will not be used in the {} process",
                file.display(),
                process
            ),
            PipelineWarning::FileNotFound { file, process } => write!(
                f,
                "Data file {} does not exist, will not be used in the {} process",
                file.display(),
                process
            ),
            PipelineWarning::Convert { ps_file, extension } => write!(
                f,
                "convert could not convert {} to {} format",
                ps_file.display(),
                extension
            ),
            PipelineWarning::GridFailed { file, reason } => {
                write!(f, "grid generation failed for {}: {}", file.display(), reason)
            }
        }
    }
}
