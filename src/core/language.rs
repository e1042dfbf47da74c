//! Source languages and the file extensions that select them.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Extensions (lowercase, without the dot) recognized as C/C++ sources.
pub const SOURCE_EXTENSIONS: &[(&str, Language)] = &[
    ("c", Language::C),
    ("cpp", Language::Cxx),
    ("cxx", Language::Cxx),
    ("cc", Language::Cxx),
    ("c++", Language::Cxx),
];

/// Language class of a translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language (default)
    #[default]
    C,
    /// C++ language
    #[serde(rename = "c++", alias = "cpp", alias = "cxx")]
    Cxx,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// Classify a path by its extension, case-insensitively.
    ///
    /// Returns `None` when the extension is not a recognized source extension.
    pub fn from_path(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        SOURCE_EXTENSIONS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|&(_, language)| language)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a path carries one of the recognized source extensions.
pub fn has_source_extension(path: &Path) -> bool {
    Language::from_path(path).is_some()
}
