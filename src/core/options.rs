//! Build options and host platform classification.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of library to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    /// Shared library (`.so`, `.dylib`, `.dll`)
    #[default]
    Shared,
    /// Static library (`.a`, `.lib`)
    Static,
}

impl LibraryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryKind::Shared => "shared",
            LibraryKind::Static => "static",
        }
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shared" => Ok(LibraryKind::Shared),
            "static" => Ok(LibraryKind::Static),
            _ => Err(format!(
                "invalid library type '{}'; expected 'shared' or 'static'",
                s
            )),
        }
    }
}

/// Class of host operating system.
///
/// Decides artifact naming and which detection strategies apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    /// Windows-class hosts
    Windows,
    /// macOS-class hosts
    #[serde(rename = "macos")]
    MacOs,
    /// Linux and every other POSIX host
    Unix,
}

impl HostPlatform {
    /// The platform this binary is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Unix
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, HostPlatform::Windows)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "windows",
            HostPlatform::MacOs => "macos",
            HostPlatform::Unix => "unix",
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single library build.
///
/// Supplied once per invocation and read-only while the build runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Files, directories, or glob patterns to discover sources from
    pub inputs: Vec<String>,
    /// Output base name, without prefix or suffix
    pub output: String,
    /// Library kind
    pub kind: LibraryKind,
    /// Directory receiving objects and the final artifact
    pub build_dir: PathBuf,
    /// Include directories
    pub include_dirs: Vec<String>,
    /// Library search directories
    pub lib_dirs: Vec<String>,
    /// Libraries to link (names without `lib` prefix on POSIX)
    pub libs: Vec<String>,
    /// Extra compile flags, passed through verbatim
    pub cflags: Vec<String>,
    /// Extra link flags, passed through verbatim
    pub ldflags: Vec<String>,
    /// Preferred compiler executable name
    pub compiler: Option<String>,
    /// Request position-independent code
    pub fpic: bool,
    /// Echo commands and their output
    pub verbose: bool,
    /// Write `compile_commands.json` into the build directory
    pub emit_compile_commands: bool,
}

impl BuildOptions {
    /// Options with defaults for everything except the output name.
    pub fn new(output: impl Into<String>) -> Self {
        BuildOptions {
            inputs: vec!["src".to_string()],
            output: output.into(),
            kind: LibraryKind::default(),
            build_dir: PathBuf::from("build"),
            include_dirs: Vec::new(),
            lib_dirs: Vec::new(),
            libs: Vec::new(),
            cflags: Vec::new(),
            ldflags: Vec::new(),
            compiler: None,
            fpic: false,
            verbose: false,
            emit_compile_commands: false,
        }
    }

    /// Directory holding object files.
    pub fn obj_dir(&self) -> PathBuf {
        self.build_dir.join("obj")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_kind_parse() {
        assert_eq!("shared".parse::<LibraryKind>().unwrap(), LibraryKind::Shared);
        assert_eq!("STATIC".parse::<LibraryKind>().unwrap(), LibraryKind::Static);
        assert!("dynamic".parse::<LibraryKind>().is_err());
    }

    #[test]
    fn test_build_options_defaults() {
        let opts = BuildOptions::new("mylib");
        assert_eq!(opts.inputs, vec!["src"]);
        assert_eq!(opts.kind, LibraryKind::Shared);
        assert_eq!(opts.build_dir, PathBuf::from("build"));
        assert_eq!(opts.obj_dir(), PathBuf::from("build").join("obj"));
        assert!(!opts.fpic);
    }
}
