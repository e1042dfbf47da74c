//! Toolchain abstraction for C/C++ compilers.
//!
//! A [`ToolchainDescriptor`] names the compiler front-ends picked by
//! detection and the [`FlagStyle`] they speak. The concrete
//! [`GccToolchain`] and [`MsvcToolchain`] render compile, archive and link
//! commands for that style.
//!
//! Toolchain detection priority:
//! 1. Preferred compiler given by the caller
//! 2. MSVC, then a GCC/Clang pair on Windows hosts
//! 3. Clang, then GCC on POSIX hosts
//! 4. A generic `cc`/`c99`

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::language::Language;
use crate::util::process::ExecutableLookup;

mod detect;
mod gcc;
mod msvc;

pub use detect::{cxx_counterpart, detect_toolchain, DetectRequest, DetectionStrategy, STRATEGIES};
pub use gcc::{GccToolchain, SharedBuildInput};
pub use msvc::MsvcToolchain;

/// Argument dialect spoken by a toolchain.
///
/// Selected once by detection; every flag is rendered through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStyle {
    /// `-I`, `-L`, `-l` (GCC, Clang and compatible drivers)
    Unix,
    /// `/I`, `/LIBPATH:`, `name.lib` (MSVC `cl`/`link`)
    Msvc,
}

impl FlagStyle {
    /// Flag adding an include directory.
    pub fn include_flag(&self, dir: &str) -> String {
        match self {
            FlagStyle::Unix => format!("-I{}", dir),
            FlagStyle::Msvc => format!("/I{}", dir),
        }
    }

    /// Flag adding a library search directory.
    pub fn lib_dir_flag(&self, dir: &str) -> String {
        match self {
            FlagStyle::Unix => format!("-L{}", dir),
            FlagStyle::Msvc => format!("/LIBPATH:{}", dir),
        }
    }

    /// Flag linking a library by name.
    pub fn link_lib_flag(&self, name: &str) -> String {
        match self {
            FlagStyle::Unix => format!("-l{}", name),
            FlagStyle::Msvc => {
                if name.to_lowercase().ends_with(".lib") {
                    name.to_string()
                } else {
                    format!("{}.lib", name)
                }
            }
        }
    }

    /// Extension of object files.
    pub fn object_extension(&self) -> &'static str {
        match self {
            FlagStyle::Unix => "o",
            FlagStyle::Msvc => "obj",
        }
    }
}

/// The compiler selected for one build invocation.
///
/// Created by detection and immutable afterwards. `cc` and `cxx` are
/// always paths that resolved on the search path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainDescriptor {
    /// Compiler name (e.g. "clang", "gcc", "msvc")
    pub name: String,
    /// Executable used for C sources
    pub cc: PathBuf,
    /// Executable used for C++ sources
    pub cxx: PathBuf,
    /// Argument dialect
    pub style: FlagStyle,
}

impl ToolchainDescriptor {
    pub fn new(name: impl Into<String>, cc: PathBuf, cxx: PathBuf, style: FlagStyle) -> Self {
        ToolchainDescriptor {
            name: name.into(),
            cc,
            cxx,
            style,
        }
    }

    pub fn is_msvc(&self) -> bool {
        self.style == FlagStyle::Msvc
    }

    /// Front-end for a language.
    pub fn compiler_for(&self, lang: Language) -> &Path {
        match lang {
            Language::C => &self.cc,
            Language::Cxx => &self.cxx,
        }
    }
}

impl fmt::Display for ToolchainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name:  {}", self.name)?;
        writeln!(f, "cc:    {}", self.cc.display())?;
        writeln!(f, "cxx:   {}", self.cxx.display())?;
        write!(
            f,
            "style: {}",
            match self.style {
                FlagStyle::Unix => "unix",
                FlagStyle::Msvc => "msvc",
            }
        )
    }
}

/// A command to execute: a program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Program followed by its arguments, space separated.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Input for a compile step.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub output: PathBuf,
    /// Rendered include flags
    pub include_flags: Vec<String>,
    /// Position-independent code flags
    pub pic_flags: Vec<String>,
    /// Additional compiler flags
    pub cflags: Vec<String>,
}

/// Input for an archive or link step.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to combine
    pub objects: Vec<PathBuf>,
    /// Output library file
    pub output: PathBuf,
    /// Rendered library search path flags
    pub lib_dir_flags: Vec<String>,
    /// Rendered library flags
    pub lib_flags: Vec<String>,
    /// Additional linker flags
    pub ldflags: Vec<String>,
}

/// Trait for toolchain implementations.
///
/// Each toolchain knows how to generate commands for its specific compiler.
pub trait Toolchain {
    /// Argument dialect of this toolchain.
    fn style(&self) -> FlagStyle;

    /// Generate a compile-only command for one translation unit.
    fn compile_command(&self, input: &CompileInput, lang: Language) -> CommandSpec;

    /// Generate a command bundling objects into a static library.
    fn archive_command(&self, input: &LinkInput) -> CommandSpec;

    /// Get the object file extension.
    fn object_extension(&self) -> &str {
        self.style().object_extension()
    }
}

/// Resolve a helper tool (archiver, linker) on the search path.
///
/// Falls back to the bare name so the failure surfaces when it is spawned.
pub(crate) fn resolve_tool(lookup: &dyn ExecutableLookup, name: &str) -> PathBuf {
    lookup.find(name).unwrap_or_else(|| PathBuf::from(name))
}
