//! Build error taxonomy.

use thiserror::Error;

use crate::core::options::HostPlatform;

/// Fatal conditions raised while building a library.
///
/// None of these are retried; they are surfaced verbatim to the user.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no source files found in {}; provide --files or --sources that contain .c/.cpp files", inputs.join(", "))]
    NoSourcesFound { inputs: Vec<String> },

    #[error("no suitable C/C++ compiler found in PATH for {host}; install gcc/clang or the MSVC toolset")]
    NoToolchainFound { host: HostPlatform },

    #[error("`{command}` failed with exit code {}", code.map(|c| c.to_string()).unwrap_or_else(|| "<none>".to_string()))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("invalid glob pattern `{pattern}`: {message}")]
    InvalidGlob { pattern: String, message: String },
}

impl BuildError {
    /// Exit status the process should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::CommandFailed { code: Some(code), .. } => *code,
            _ => 1,
        }
    }
}
