//! libsmith - build a C/C++ library with whatever compiler the host has
//!
//! This crate provides the library behind the `libsmith` binary: source
//! discovery, toolchain detection, flag assembly, build planning and
//! execution.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for libsmith unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for process execution
/// and executable lookup.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    BuildOptions, HostPlatform, Language, LibraryArtifact, LibraryKind, SourceSet,
};
pub use util::errors::BuildError;
