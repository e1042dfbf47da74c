//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use libsmith::core::options::LibraryKind;

/// libsmith - build a C/C++ shared or static library with whatever
/// compiler the host has
#[derive(Parser, Debug)]
#[command(name = "libsmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source files or glob patterns
    #[arg(long, num_args = 1.., conflicts_with = "sources", value_name = "PATHS")]
    pub files: Vec<String>,

    /// Directories searched recursively for sources (default: src)
    #[arg(long, num_args = 1.., value_name = "DIRS")]
    pub sources: Vec<String>,

    /// Library base name, without prefix or extension
    #[arg(short, long)]
    pub output: String,

    /// Library kind [default: shared]
    #[arg(long = "type", value_name = "KIND", value_parser = parse_kind)]
    pub kind: Option<LibraryKind>,

    /// Directory for objects and the library [default: build]
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Include directories
    #[arg(short = 'I', long, num_args = 1.., value_name = "DIRS")]
    pub include: Vec<String>,

    /// Library search directories
    #[arg(short = 'L', long, num_args = 1.., value_name = "DIRS")]
    pub libdirs: Vec<String>,

    /// Libraries to link (names, without lib prefix on POSIX)
    #[arg(long, num_args = 1.., value_name = "NAMES")]
    pub libs: Vec<String>,

    /// Extra flag passed to the compiler (repeat for each flag)
    #[arg(
        long,
        action = ArgAction::Append,
        num_args = 1,
        allow_hyphen_values = true,
        value_name = "FLAG"
    )]
    pub cflags: Vec<String>,

    /// Extra flag passed to the linker (repeat for each flag)
    #[arg(
        long,
        action = ArgAction::Append,
        num_args = 1,
        allow_hyphen_values = true,
        value_name = "FLAG"
    )]
    pub ldflags: Vec<String>,

    /// Preferred compiler executable (gcc, clang, ...)
    #[arg(long, value_name = "NAME")]
    pub compiler: Option<String>,

    /// Compile position-independent code where applicable
    #[arg(long)]
    pub fpic: bool,

    /// Print commands and their output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write compile_commands.json into the build directory
    #[arg(long)]
    pub emit_compile_commands: bool,

    /// Print the build plan as JSON (no build)
    #[arg(long, conflicts_with = "print_toolchain")]
    pub plan: bool,

    /// Print the detected toolchain and exit
    #[arg(long)]
    pub print_toolchain: bool,
}

fn parse_kind(s: &str) -> Result<LibraryKind, String> {
    s.parse()
}
