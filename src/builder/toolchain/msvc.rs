//! MSVC toolchain implementation.

use std::path::PathBuf;

use crate::core::language::Language;

use super::{CommandSpec, CompileInput, FlagStyle, LinkInput, Toolchain, ToolchainDescriptor};

/// MSVC toolchain (Windows).
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Path to cl.exe (compiler)
    pub cl: PathBuf,
    /// Path to lib.exe (librarian)
    pub lib: PathBuf,
    /// Path to link.exe (linker)
    pub link: PathBuf,
}

impl MsvcToolchain {
    /// Create a new MSVC toolchain.
    pub fn new(cl: PathBuf, lib: PathBuf, link: PathBuf) -> Self {
        MsvcToolchain { cl, lib, link }
    }

    /// Create a toolchain from a detected descriptor and resolved helper tools.
    pub fn from_descriptor(desc: &ToolchainDescriptor, lib: PathBuf, link: PathBuf) -> Self {
        MsvcToolchain::new(desc.cc.clone(), lib, link)
    }

    /// Generate a `link /DLL` command producing a shared library.
    pub fn link_dll_command(&self, input: &LinkInput) -> CommandSpec {
        let cmd = CommandSpec::new(&self.link)
            .arg("/NOLOGO")
            .arg(format!("/OUT:{}", input.output.display()))
            .arg("/DLL");
        with_link_inputs(cmd, input)
    }
}

/// Objects, library paths, libraries and extra flags, in that order.
fn with_link_inputs(mut cmd: CommandSpec, input: &LinkInput) -> CommandSpec {
    for obj in &input.objects {
        cmd = cmd.arg(obj.display().to_string());
    }
    cmd = cmd.args(input.lib_dir_flags.iter().cloned());
    cmd = cmd.args(input.lib_flags.iter().cloned());
    cmd.args(input.ldflags.iter().cloned())
}

impl Toolchain for MsvcToolchain {
    fn style(&self) -> FlagStyle {
        FlagStyle::Msvc
    }

    fn compile_command(&self, input: &CompileInput, _lang: Language) -> CommandSpec {
        // cl.exe picks the language from the extension
        let mut cmd = CommandSpec::new(&self.cl);

        // Quiet logo, compile only
        cmd = cmd.arg("/nologo");
        cmd = cmd.arg("/c");

        cmd = cmd.args(input.include_flags.iter().cloned());

        // Custom flags
        cmd = cmd.args(input.cflags.iter().cloned());

        // Input
        cmd = cmd.arg(input.source.display().to_string());

        // Output
        cmd = cmd.arg(format!("/Fo{}", input.output.display()));

        cmd
    }

    fn archive_command(&self, input: &LinkInput) -> CommandSpec {
        let cmd = CommandSpec::new(&self.lib)
            .arg("/NOLOGO")
            .arg(format!("/OUT:{}", input.output.display()));
        with_link_inputs(cmd, input)
    }
}
