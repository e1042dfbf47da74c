//! Configuration file support for libsmith.
//!
//! libsmith supports two configuration file locations:
//! - Global: `~/.libsmith/config.toml` - User-wide defaults
//! - Project: `.libsmith/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.
//!
//! ```toml
//! [build]
//! kind = "static"
//! compiler = "clang"
//! include = ["include"]
//! cflags = ["-O2", "-Wall"]
//! fpic = true
//!
//! [build.linux]
//! libs = ["m"]
//!
//! [build.macos]
//! ldflags = ["-framework", "CoreFoundation"]
//! ```
//!
//! The `[build.linux]`, `[build.macos]` and `[build.windows]` tables accept
//! the same keys as `[build]`. The table matching the host is applied on top
//! of `[build]`: its lists are appended, its other values replace.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::{HostPlatform, LibraryKind};

/// libsmith configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
///
/// List settings are used only when the command line gives none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default library kind (shared, static)
    pub kind: Option<String>,

    /// Default build directory
    pub build_dir: Option<PathBuf>,

    /// Preferred compiler executable
    pub compiler: Option<String>,

    /// Include directories
    pub include: Vec<String>,

    /// Library search directories
    pub libdirs: Vec<String>,

    /// Libraries to link
    pub libs: Vec<String>,

    /// Extra compile flags
    pub cflags: Vec<String>,

    /// Extra link flags
    pub ldflags: Vec<String>,

    /// Always request position-independent code
    pub fpic: bool,

    /// Always emit compile_commands.json
    pub emit_compile_commands: bool,

    /// Additions for Linux and other POSIX hosts
    pub linux: Option<PlatformConfig>,

    /// Additions for macOS hosts
    pub macos: Option<PlatformConfig>,

    /// Additions for Windows hosts
    pub windows: Option<PlatformConfig>,
}

/// Per-platform settings layered over [`BuildConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub kind: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub compiler: Option<String>,
    pub include: Vec<String>,
    pub libdirs: Vec<String>,
    pub libs: Vec<String>,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
    pub fpic: bool,
    pub emit_compile_commands: bool,
}

impl BuildConfig {
    fn platform(&self, host: HostPlatform) -> Option<&PlatformConfig> {
        match host {
            HostPlatform::Unix => self.linux.as_ref(),
            HostPlatform::MacOs => self.macos.as_ref(),
            HostPlatform::Windows => self.windows.as_ref(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let build = other.build;

        if build.kind.is_some() {
            self.build.kind = build.kind;
        }
        if build.build_dir.is_some() {
            self.build.build_dir = build.build_dir;
        }
        if build.compiler.is_some() {
            self.build.compiler = build.compiler;
        }
        replace_if_set(&mut self.build.include, build.include);
        replace_if_set(&mut self.build.libdirs, build.libdirs);
        replace_if_set(&mut self.build.libs, build.libs);
        replace_if_set(&mut self.build.cflags, build.cflags);
        replace_if_set(&mut self.build.ldflags, build.ldflags);
        if build.fpic {
            self.build.fpic = true;
        }
        if build.emit_compile_commands {
            self.build.emit_compile_commands = true;
        }
        if build.linux.is_some() {
            self.build.linux = build.linux;
        }
        if build.macos.is_some() {
            self.build.macos = build.macos;
        }
        if build.windows.is_some() {
            self.build.windows = build.windows;
        }
    }

    /// Apply the section for `host` on top of the base build settings.
    pub fn for_host(mut self, host: HostPlatform) -> Self {
        let Some(platform) = self.build.platform(host).cloned() else {
            return self;
        };
        tracing::debug!("applying [build.{}] config", section_name(host));

        let build = &mut self.build;
        if platform.kind.is_some() {
            build.kind = platform.kind;
        }
        if platform.build_dir.is_some() {
            build.build_dir = platform.build_dir;
        }
        if platform.compiler.is_some() {
            build.compiler = platform.compiler;
        }
        build.include.extend(platform.include);
        build.libdirs.extend(platform.libdirs);
        build.libs.extend(platform.libs);
        build.cflags.extend(platform.cflags);
        build.ldflags.extend(platform.ldflags);
        build.fpic |= platform.fpic;
        build.emit_compile_commands |= platform.emit_compile_commands;

        self
    }

    /// Parse the library kind from config string.
    ///
    /// An unrecognized value is ignored with a warning.
    pub fn kind(&self) -> Option<LibraryKind> {
        let raw = self.build.kind.as_deref()?;
        match raw.parse() {
            Ok(kind) => Some(kind),
            Err(e) => {
                tracing::warn!("ignoring build.kind in config: {}", e);
                None
            }
        }
    }
}

fn section_name(host: HostPlatform) -> &'static str {
    match host {
        HostPlatform::Unix => "linux",
        HostPlatform::MacOs => "macos",
        HostPlatform::Windows => "windows",
    }
}

fn replace_if_set(slot: &mut Vec<String>, value: Vec<String>) {
    if !value.is_empty() {
        *slot = value;
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.libsmith/config.toml)
/// 2. Global config (~/.libsmith/config.toml)
/// 3. Defaults
///
/// The section for `host` is applied after both files are merged.
pub fn load_config(
    global_path: Option<&Path>,
    project_path: &Path,
    host: HostPlatform,
) -> Config {
    let mut config = Config::default();

    // Load global config first
    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    // Project config overrides global
    config.merge(Config::load_or_default(project_path));

    config.for_host(host)
}

/// Get the global libsmith config directory (~/.libsmith).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".libsmith"))
}

/// Get the global config path (~/.libsmith/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.libsmith/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".libsmith").join("config.toml")
}
