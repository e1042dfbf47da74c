//! Implementation of a library build.
//!
//! Runs the stages in order: source discovery, toolchain detection, flag
//! assembly, planning, then execution. Each stage finishes before the next
//! starts.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::executor::BuildExecutor;
use crate::builder::flags::assemble_flags;
use crate::builder::plan::{BuildPlan, HelperTools, PlanContext};
use crate::builder::toolchain::{detect_toolchain, DetectRequest, ToolchainDescriptor};
use crate::core::artifact::LibraryArtifact;
use crate::core::options::{BuildOptions, HostPlatform};
use crate::core::source::discover_sources;
use crate::util::process::{CommandRunner, ExecutableLookup};

/// Name of the compilation database written into the build directory.
pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/// Host facts a build depends on.
pub struct BuildEnv<'a> {
    pub host: HostPlatform,
    /// Executable search path
    pub lookup: &'a dyn ExecutableLookup,
    /// Archiver override (the `AR` environment variable)
    pub ar_override: Option<String>,
    /// Working directory recorded in compile_commands.json
    pub cwd: PathBuf,
}

impl<'a> BuildEnv<'a> {
    /// Environment of the running process.
    pub fn from_process(lookup: &'a dyn ExecutableLookup) -> Result<Self> {
        Ok(BuildEnv {
            host: HostPlatform::current(),
            lookup,
            ar_override: std::env::var("AR").ok(),
            cwd: std::env::current_dir()?,
        })
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub artifact: LibraryArtifact,
    pub toolchain: ToolchainDescriptor,
}

/// Detect the toolchain a build with `opts` would use.
pub fn detect(opts: &BuildOptions, env: &BuildEnv<'_>) -> Result<ToolchainDescriptor> {
    let req = DetectRequest::new(env.host, opts.compiler.as_deref());
    Ok(detect_toolchain(&req, env.lookup)?)
}

/// Compute the build plan without running anything or touching the disk.
pub fn plan(opts: &BuildOptions, env: &BuildEnv<'_>) -> Result<BuildPlan> {
    let sources = discover_sources(&opts.inputs)?;
    tracing::debug!("discovered {} source file(s)", sources.len());

    let toolchain = detect(opts, env)?;

    if opts.fpic && toolchain.is_msvc() {
        tracing::warn!("--fpic has no MSVC equivalent and is ignored");
    }

    let flags = assemble_flags(opts, toolchain.style);
    let tools = HelperTools::resolve(env.lookup, env.ar_override.as_deref());

    let ctx = PlanContext {
        opts,
        host: env.host,
        toolchain: &toolchain,
        flags: &flags,
        tools: &tools,
    };
    Ok(BuildPlan::new(&sources, &ctx))
}

/// Build the library described by `opts`.
///
/// Stops at the first failing command with
/// [`BuildError::CommandFailed`](crate::util::errors::BuildError::CommandFailed).
pub fn build(
    opts: &BuildOptions,
    env: &BuildEnv<'_>,
    runner: &mut dyn CommandRunner,
) -> Result<BuildResult> {
    let plan = plan(opts, env)?;

    if opts.emit_compile_commands {
        let path = opts.build_dir.join(COMPILE_COMMANDS_FILE);
        plan.emit_compile_commands(&env.cwd, &path)?;
        tracing::info!("wrote {}", path.display());
    }

    let artifact = BuildExecutor::new(runner)
        .verbose(opts.verbose)
        .execute(&plan)?;

    Ok(BuildResult {
        artifact,
        toolchain: plan.toolchain,
    })
}
