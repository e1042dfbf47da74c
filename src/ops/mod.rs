//! High-level operations.
//!
//! This module contains the implementation of libsmith commands.

pub mod build_lib;

pub use build_lib::{build, BuildEnv, BuildResult};
