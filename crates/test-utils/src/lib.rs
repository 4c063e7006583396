//! Shared test utilities for the convection map workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Temporary directory layouts for map runs
//! - OMNI archive fixtures (availability page, CGI response, listings)
//! - Fake RST toolkit scripts that stand in for the real binaries
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod paths;
pub mod tools;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use paths::*;
pub use tools::*;
