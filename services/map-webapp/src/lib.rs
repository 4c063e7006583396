//! Web form for generating SuperDARN convection map plots.
//!
//! This module exposes the internal modules for testing purposes.

pub mod form;
pub mod jobs;
pub mod server;
pub mod state;

pub use server::{build_router, start_server};
pub use state::AppState;
