//! Pipeline execution
//!
//! This module runs a planned pipeline: launching external programs, removing
//! leftovers in-process, and checking the artifact chain between steps.

pub mod cleanup;
pub mod command;
pub mod dependencies;
pub mod runner;

pub use command::{Launcher, ProcessLauncher};
pub use dependencies::{dependency_graph, verify_chain};
pub use runner::{format_elapsed, PipelineRunner, RunReport};
