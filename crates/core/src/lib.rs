//! Photopipe Core Library
//!
//! This is the core library for the photopipe photogrammetry driver. It turns a
//! handful of user options into the OpenMVG/OpenMVS command sequence that takes
//! a folder of images to a textured mesh, and runs that sequence one process at
//! a time.
//!
//! ## Architecture
//!
//! - [`pipeline`] - High-level interface: plan, verify, run
//! - [`plan`] - Pure planner producing the ordered [`step::Step`] list
//! - [`execution`] - Sequential runner, process launching, cleanup, artifact chain
//! - [`scene`] - OpenMVS scene file naming
//! - [`configs`] - Run configuration and toolchain install locations
//! - [`types`] - Error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use photopipe_core::configs::pipeline::{DescriberPreset, PipelineConfig};
//! use photopipe_core::Pipeline;
//!
//! # async fn example() -> photopipe_core::PipelineResult<()> {
//! let config = PipelineConfig::new("./imgs", "./out")
//!     .with_describer_preset(Some(DescriberPreset::High));
//! let report = Pipeline::new(config)?.run().await?;
//! println!("Used time: {}", report.elapsed_hms());
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod execution;
pub mod pipeline;
pub mod plan;
pub mod scene;
pub mod step;
pub mod types;

// Re-export the main types for easier usage
pub use pipeline::Pipeline;
pub use types::{PipelineError, PipelineResult, StepFailure};
