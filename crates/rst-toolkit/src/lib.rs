//! Radar Software Toolkit invocation.
//!
//! Every gridding, fitting and plotting step of a map run is an external RST
//! binary. This crate models those invocations without a shell:
//!
//! - [`ToolCommand`] describes program, arguments and stdout redirection
//! - [`CommandRunner`] is the seam between the pipeline and the OS
//! - [`run_checked`] applies the exit-code and empty-output policy
//! - [`channel_present`] and [`decompress`] wrap the helper tools

mod command;
mod runner;
mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use runner::{run_checked, CommandRunner, ProcessRunner};
pub use tools::{channel_present, count_channel_records, decompress};
