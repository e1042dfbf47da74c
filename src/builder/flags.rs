//! Flag assembly.
//!
//! Turns abstract [`BuildOptions`] into argument lists rendered in the
//! detected toolchain's [`FlagStyle`]. Input order is preserved and nothing
//! is deduplicated; user-supplied extra flags are passed through verbatim.

use serde::Serialize;

use crate::builder::toolchain::FlagStyle;
use crate::core::options::BuildOptions;

/// Argument groups for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagSet {
    /// `-I<dir>` / `/I<dir>`
    pub include: Vec<String>,
    /// `-L<dir>` / `/LIBPATH:<dir>`
    pub lib_dirs: Vec<String>,
    /// `-l<name>` / `<name>.lib`
    pub libs: Vec<String>,
    /// Extra compile flags
    pub cflags: Vec<String>,
    /// Extra link flags
    pub ldflags: Vec<String>,
}

/// Render the flag groups for `opts` in `style`.
pub fn assemble_flags(opts: &BuildOptions, style: FlagStyle) -> FlagSet {
    FlagSet {
        include: opts
            .include_dirs
            .iter()
            .map(|dir| style.include_flag(dir))
            .collect(),
        lib_dirs: opts
            .lib_dirs
            .iter()
            .map(|dir| style.lib_dir_flag(dir))
            .collect(),
        libs: opts
            .libs
            .iter()
            .map(|lib| style.link_lib_flag(lib))
            .collect(),
        cflags: opts.cflags.clone(),
        ldflags: opts.ldflags.clone(),
    }
}

/// Flags requesting position-independent code.
///
/// MSVC has no equivalent, so the request is ignored there.
pub fn pic_flags(style: FlagStyle, requested: bool) -> Vec<String> {
    match (style, requested) {
        (FlagStyle::Unix, true) => vec!["-fPIC".to_string()],
        _ => Vec::new(),
    }
}
