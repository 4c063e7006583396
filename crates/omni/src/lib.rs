//! Client for the OMNI solar wind archive.
//!
//! A map run optionally folds interplanetary magnetic field measurements into
//! the statistical model. This crate finds out how current the archive is,
//! downloads the 1-minute listing for a day through the OMNIWeb CGI form and
//! rewrites it as the IMF text file RST's `map_addimf` reads.

mod client;
mod config;
mod error;
mod files;
mod imf;

pub use client::{parse_availability, parse_listing_link, OmniClient};
pub use config::OmniConfig;
pub use error::{OmniError, OmniResult};
pub use files::{archive_stale, OmniFiles};
pub use imf::{convert_line, convert_to_imf, ImfLine, ImfSummary};
