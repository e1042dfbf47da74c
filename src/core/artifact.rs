//! Output artifacts of a build.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::options::{HostPlatform, LibraryKind};

/// The final library produced by a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryArtifact {
    /// Path of the library file
    pub path: PathBuf,
    /// Library kind
    pub kind: LibraryKind,
}

/// File name of a library with the given base name on `host`.
///
/// | Platform | shared | static |
/// |---|---|---|
/// | Windows | `<name>.dll` | `<name>.lib` |
/// | macOS | `lib<name>.dylib` | `lib<name>.a` |
/// | other POSIX | `lib<name>.so` | `lib<name>.a` |
pub fn library_file_name(name: &str, kind: LibraryKind, host: HostPlatform) -> String {
    match (host, kind) {
        (HostPlatform::Windows, LibraryKind::Shared) => format!("{}.dll", name),
        (HostPlatform::Windows, LibraryKind::Static) => format!("{}.lib", name),
        (HostPlatform::MacOs, LibraryKind::Shared) => format!("lib{}.dylib", name),
        (HostPlatform::Unix, LibraryKind::Shared) => format!("lib{}.so", name),
        (_, LibraryKind::Static) => format!("lib{}.a", name),
    }
}

/// Object file path for a translation unit.
///
/// Derived from the source stem only, so sources sharing a base name in
/// different directories map to the same object.
pub fn object_path(obj_dir: &Path, source: &Path, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    obj_dir.join(format!("{}.{}", stem, extension))
}
