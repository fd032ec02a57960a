//! Configuration types
//!
//! - [`pipeline`] - the immutable run configuration built from the command line
//! - [`toolchain`] - install locations of the OpenMVG and OpenMVS binaries

pub mod pipeline;
pub mod toolchain;
