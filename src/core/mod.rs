//! Core data structures for libsmith.
//!
//! This module contains the foundational types used throughout libsmith:
//! - Source languages and discovered translation units
//! - Build options and host platform classification
//! - Library artifacts and their platform naming

pub mod artifact;
pub mod language;
pub mod options;
pub mod source;

pub use artifact::LibraryArtifact;
pub use language::Language;
pub use options::{BuildOptions, HostPlatform, LibraryKind};
pub use source::{discover_sources, SourceFile, SourceSet};
