//! GCC/Clang toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::language::Language;

use super::{CommandSpec, CompileInput, FlagStyle, LinkInput, Toolchain, ToolchainDescriptor};

/// GCC/Clang toolchain (Unix-style drivers).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler
    pub cc: PathBuf,
    /// Path to the C++ compiler
    pub cxx: PathBuf,
    /// Path to the archiver
    pub ar: PathBuf,
}

/// Input for the one-step compile+link of a shared library.
#[derive(Debug, Clone)]
pub struct SharedBuildInput {
    /// Every source of the library
    pub sources: Vec<PathBuf>,
    /// Output shared library
    pub output: PathBuf,
    pub include_flags: Vec<String>,
    pub pic_flags: Vec<String>,
    pub lib_dir_flags: Vec<String>,
    pub lib_flags: Vec<String>,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(cc: PathBuf, cxx: PathBuf, ar: PathBuf) -> Self {
        GccToolchain { cc, cxx, ar }
    }

    /// Create a toolchain from detected front-ends and a resolved archiver.
    pub fn from_descriptor(desc: &ToolchainDescriptor, ar: PathBuf) -> Self {
        GccToolchain::new(desc.cc.clone(), desc.cxx.clone(), ar)
    }

    fn driver(&self, lang: Language) -> &Path {
        match lang {
            Language::C => &self.cc,
            Language::Cxx => &self.cxx,
        }
    }

    /// Compile and link every source into a shared library in one invocation.
    pub fn shared_build_command(&self, input: &SharedBuildInput, driver: Language) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.driver(driver));

        cmd = cmd.arg("-shared");
        cmd = cmd.args(input.pic_flags.iter().cloned());

        // Output
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        // Sources
        for src in &input.sources {
            cmd = cmd.arg(src.display().to_string());
        }

        cmd = cmd.args(input.include_flags.iter().cloned());
        cmd = cmd.args(input.lib_dir_flags.iter().cloned());
        cmd = cmd.args(input.lib_flags.iter().cloned());

        // Custom flags
        cmd = cmd.args(input.cflags.iter().cloned());
        cmd = cmd.args(input.ldflags.iter().cloned());

        cmd
    }
}

impl Toolchain for GccToolchain {
    fn style(&self) -> FlagStyle {
        FlagStyle::Unix
    }

    fn compile_command(&self, input: &CompileInput, lang: Language) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.driver(lang));

        // Compile only
        cmd = cmd.arg("-c");

        cmd = cmd.args(input.pic_flags.iter().cloned());
        cmd = cmd.args(input.include_flags.iter().cloned());

        // Custom flags
        cmd = cmd.args(input.cflags.iter().cloned());

        // Input and output
        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        cmd
    }

    fn archive_command(&self, input: &LinkInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.ar);

        // Create archive with symbol index, replace files
        cmd = cmd.arg("rcs");
        cmd = cmd.arg(input.output.display().to_string());

        // Object files
        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        cmd
    }
}
