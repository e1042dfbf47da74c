//! Source discovery.
//!
//! Expands user inputs (files, directories, glob patterns) into a
//! deduplicated, sorted set of translation units. The ordering is stable
//! across runs so compiler invocations are reproducible.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::language::{has_source_extension, Language};
use crate::util::errors::BuildError;
use crate::util::fs::{glob_files, walk_files};

/// One translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
}

/// Ordered, unique set of source files. Never empty.
///
/// Files are sorted by the string form of their paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSet {
    files: Vec<SourceFile>,
}

impl SourceSet {
    /// Build a set from paths, deduplicating and sorting them.
    ///
    /// Fails with [`BuildError::NoSourcesFound`] when `paths` is empty.
    pub fn from_paths(
        paths: impl IntoIterator<Item = PathBuf>,
        inputs: &[String],
    ) -> Result<Self, BuildError> {
        // Keyed by the path's text so ordering follows plain string order
        let unique: BTreeMap<String, PathBuf> = paths
            .into_iter()
            .map(|path| (path.to_string_lossy().into_owned(), path))
            .collect();

        if unique.is_empty() {
            return Err(BuildError::NoSourcesFound {
                inputs: inputs.to_vec(),
            });
        }

        let files = unique
            .into_values()
            .map(|path| {
                // Explicit files with an unknown extension go through the C front-end
                let language = Language::from_path(&path).unwrap_or_default();
                SourceFile { path, language }
            })
            .collect();
        Ok(SourceSet { files })
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether any translation unit is C++.
    pub fn has_cxx(&self) -> bool {
        self.files.iter().any(|f| f.language == Language::Cxx)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }
}

/// Discover sources from a list of files, directories, or glob patterns.
///
/// - directories are searched recursively for recognized extensions
/// - existing files are always included, whatever their extension
/// - anything else is a glob pattern; only matching source files are kept
pub fn discover_sources(inputs: &[String]) -> Result<SourceSet, BuildError> {
    let mut found = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            let before = found.len();
            found.extend(
                walk_files(path)
                    .into_iter()
                    .filter(|p| has_source_extension(p)),
            );
            tracing::debug!("found {} source(s) under {}", found.len() - before, input);
        } else if path.is_file() {
            found.push(path.to_path_buf());
        } else {
            found.extend(
                glob_files(input)?
                    .into_iter()
                    .filter(|p| has_source_extension(p)),
            );
        }
    }

    SourceSet::from_paths(found, inputs)
}
