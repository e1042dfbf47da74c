//! Toolchain detection.
//!
//! Detection walks an ordered list of [`DetectionStrategy`] values. Each one
//! says whether it applies to the request and, if so, tries to build a
//! descriptor from executables found on the search path. The first success
//! wins.

use std::path::PathBuf;

use crate::core::options::HostPlatform;
use crate::util::errors::BuildError;
use crate::util::process::ExecutableLookup;

use super::{FlagStyle, ToolchainDescriptor};

/// What the caller asks detection for.
#[derive(Debug, Clone, Copy)]
pub struct DetectRequest<'a> {
    pub host: HostPlatform,
    /// Preferred compiler executable name
    pub preferred: Option<&'a str>,
}

impl<'a> DetectRequest<'a> {
    pub fn new(host: HostPlatform, preferred: Option<&'a str>) -> Self {
        DetectRequest { host, preferred }
    }
}

/// One way of locating a toolchain.
pub struct DetectionStrategy {
    pub name: &'static str,
    applies: fn(&DetectRequest<'_>) -> bool,
    detect: fn(&DetectRequest<'_>, &dyn ExecutableLookup) -> Option<ToolchainDescriptor>,
}

impl DetectionStrategy {
    /// Run this strategy if it applies to the request.
    pub fn try_detect(
        &self,
        req: &DetectRequest<'_>,
        lookup: &dyn ExecutableLookup,
    ) -> Option<ToolchainDescriptor> {
        if !(self.applies)(req) {
            return None;
        }
        (self.detect)(req, lookup)
    }
}

impl std::fmt::Debug for DetectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionStrategy")
            .field("name", &self.name)
            .finish()
    }
}

/// Detection strategies in order of precedence.
pub const STRATEGIES: &[DetectionStrategy] = &[
    DetectionStrategy {
        name: "preferred",
        applies: has_preferred,
        detect: detect_preferred,
    },
    DetectionStrategy {
        name: "msvc",
        applies: is_windows_host,
        detect: detect_msvc,
    },
    DetectionStrategy {
        name: "windows-gnu",
        applies: is_windows_host,
        detect: detect_windows_gnu,
    },
    DetectionStrategy {
        name: "posix",
        applies: is_posix_host,
        detect: detect_posix,
    },
    DetectionStrategy {
        name: "generic",
        applies: any_host,
        detect: detect_generic,
    },
];

fn has_preferred(req: &DetectRequest<'_>) -> bool {
    req.preferred.is_some()
}

fn is_windows_host(req: &DetectRequest<'_>) -> bool {
    req.host.is_windows()
}

fn is_posix_host(req: &DetectRequest<'_>) -> bool {
    !req.host.is_windows()
}

fn any_host(_req: &DetectRequest<'_>) -> bool {
    true
}

/// Detect the toolchain for this build.
///
/// Fails with [`BuildError::NoToolchainFound`] when no strategy succeeds.
pub fn detect_toolchain(
    req: &DetectRequest<'_>,
    lookup: &dyn ExecutableLookup,
) -> Result<ToolchainDescriptor, BuildError> {
    for strategy in STRATEGIES {
        if let Some(desc) = strategy.try_detect(req, lookup) {
            tracing::debug!(
                "toolchain `{}` selected by {} detection: cc={}, cxx={}",
                desc.name,
                strategy.name,
                desc.cc.display(),
                desc.cxx.display()
            );
            return Ok(desc);
        }
    }

    Err(BuildError::NoToolchainFound { host: req.host })
}

/// Name of the C++ front-end paired with a C compiler name.
///
/// Handles the common conventions:
/// - gcc, gcc-12, x86_64-linux-gnu-gcc -> g++, g++-12, x86_64-linux-gnu-g++
/// - clang, clang-17 -> clang++, clang++-17
/// - cc, /usr/bin/cc -> c++, /usr/bin/c++
///
/// Only the file name is rewritten; directory components are kept as given.
/// Returns `None` when no convention applies.
pub fn cxx_counterpart(cc: &str) -> Option<String> {
    let (dir, name) = match cc.rfind(['/', '\\']) {
        Some(pos) => cc.split_at(pos + 1),
        None => ("", cc),
    };
    cxx_file_name(name).map(|cxx| format!("{}{}", dir, cxx))
}

fn cxx_file_name(cc: &str) -> Option<String> {
    if let Some(pos) = cc.rfind("gcc") {
        return Some(format!("{}g++{}", &cc[..pos], &cc[pos + 3..]));
    }

    if let Some(pos) = cc.rfind("clang") {
        let rest = &cc[pos + 5..];
        if rest.starts_with("++") {
            return None;
        }
        return Some(format!("{}clang++{}", &cc[..pos], rest));
    }

    // Only match "cc" as the whole name or a target-prefixed one, not "mycc"
    if cc == "cc" || cc.ends_with("-cc") {
        return Some(format!("{}++", &cc[..cc.len() - 1]));
    }

    None
}

/// Find `cc` and its paired C++ front-end.
///
/// When the C++ front-end is missing the C compiler is reused for C++ too.
fn find_pair(
    lookup: &dyn ExecutableLookup,
    cc: &str,
    cxx: &str,
) -> Option<(PathBuf, PathBuf)> {
    let cc_path = lookup.find(cc)?;
    let cxx_path = match lookup.find(cxx) {
        Some(p) => p,
        None => {
            tracing::warn!(
                "`{}` found but `{}` is not; C++ sources will be compiled with `{}`",
                cc,
                cxx,
                cc
            );
            cc_path.clone()
        }
    };
    Some((cc_path, cxx_path))
}

fn detect_preferred(
    req: &DetectRequest<'_>,
    lookup: &dyn ExecutableLookup,
) -> Option<ToolchainDescriptor> {
    let preferred = req.preferred?;

    let Some(cc) = lookup.find(preferred) else {
        tracing::warn!(
            "preferred compiler `{}` not found on PATH; falling back to auto-detection",
            preferred
        );
        return None;
    };

    let cxx = cxx_counterpart(preferred)
        .and_then(|name| lookup.find(&name))
        .unwrap_or_else(|| cc.clone());

    Some(ToolchainDescriptor::new(preferred, cc, cxx, FlagStyle::Unix))
}

fn detect_msvc(
    _req: &DetectRequest<'_>,
    lookup: &dyn ExecutableLookup,
) -> Option<ToolchainDescriptor> {
    let cl = lookup.find("cl")?;
    Some(ToolchainDescriptor::new("msvc", cl.clone(), cl, FlagStyle::Msvc))
}

fn detect_windows_gnu(
    _req: &DetectRequest<'_>,
    lookup: &dyn ExecutableLookup,
) -> Option<ToolchainDescriptor> {
    for (cc, cxx) in [("gcc", "g++"), ("clang", "clang++")] {
        if let Some((cc_path, cxx_path)) = find_pair(lookup, cc, cxx) {
            return Some(ToolchainDescriptor::new(cc, cc_path, cxx_path, FlagStyle::Unix));
        }
    }

    // A lone C++ driver compiles both languages
    for exe in ["g++", "clang++"] {
        if let Some(path) = lookup.find(exe) {
            return Some(ToolchainDescriptor::new(exe, path.clone(), path, FlagStyle::Unix));
        }
    }

    None
}

fn detect_posix(
    _req: &DetectRequest<'_>,
    lookup: &dyn ExecutableLookup,
) -> Option<ToolchainDescriptor> {
    for (cc, cxx) in [("clang", "clang++"), ("gcc", "g++")] {
        if let Some((cc_path, cxx_path)) = find_pair(lookup, cc, cxx) {
            return Some(ToolchainDescriptor::new(cc, cc_path, cxx_path, FlagStyle::Unix));
        }
    }
    None
}

fn detect_generic(
    _req: &DetectRequest<'_>,
    lookup: &dyn ExecutableLookup,
) -> Option<ToolchainDescriptor> {
    for exe in ["cc", "c99"] {
        if let Some(path) = lookup.find(exe) {
            return Some(ToolchainDescriptor::new(exe, path.clone(), path, FlagStyle::Unix));
        }
    }
    None
}
