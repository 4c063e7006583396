//! Common types and utilities shared across the convection map crates.

pub mod constants;
pub mod error;
pub mod files;
pub mod hemisphere;
pub mod radar;
pub mod time;
pub mod warning;

pub use error::{DarnError, DarnResult};
pub use files::{CompressionType, DataFileKind, MapFilenames};
pub use hemisphere::{Channel, Hemisphere};
pub use time::{MapDate, TimeOfDay};
pub use warning::PipelineWarning;
