//! Build plan generation.
//!
//! A BuildPlan lists every external command a build runs, fully rendered,
//! in execution order. Planning is pure: it never touches the filesystem
//! or spawns anything, so `--plan` can print it and tests can inspect it.
//!
//! The pipeline is selected by library kind and toolchain style:
//!
//! | Kind | Style | Pipeline |
//! |---|---|---|
//! | static | unix | compile each source, then `ar rcs` |
//! | any | msvc | `cl /c` each source, then `link /DLL` or `lib` |
//! | shared | unix | one driver call compiling and linking every source |

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::flags::{pic_flags, FlagSet};
use crate::builder::toolchain::{
    resolve_tool, CommandSpec, CompileInput, FlagStyle, GccToolchain, LinkInput, MsvcToolchain,
    SharedBuildInput, Toolchain, ToolchainDescriptor,
};
use crate::core::artifact::{library_file_name, object_path, LibraryArtifact};
use crate::core::language::Language;
use crate::core::options::{BuildOptions, HostPlatform, LibraryKind};
use crate::core::source::SourceSet;
use crate::util::fs::write_string;
use crate::util::process::ExecutableLookup;

/// Which of the three build pipelines a plan follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pipeline {
    /// Compile objects, then archive them
    UnixStatic,
    /// Compile and link in one driver invocation
    UnixShared,
    /// `cl /c` per source, then `link` or `lib`
    Msvc,
}

impl Pipeline {
    pub fn select(kind: LibraryKind, style: FlagStyle) -> Self {
        match (kind, style) {
            (_, FlagStyle::Msvc) => Pipeline::Msvc,
            (LibraryKind::Static, FlagStyle::Unix) => Pipeline::UnixStatic,
            (LibraryKind::Shared, FlagStyle::Unix) => Pipeline::UnixShared,
        }
    }
}

/// Archiver and linker executables used next to the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelperTools {
    /// Unix archiver
    pub ar: PathBuf,
    /// MSVC librarian
    pub lib: PathBuf,
    /// MSVC linker
    pub link: PathBuf,
}

impl HelperTools {
    /// Resolve helper tools on the search path.
    ///
    /// `ar_override` (the `AR` environment variable) replaces the archiver.
    pub fn resolve(lookup: &dyn ExecutableLookup, ar_override: Option<&str>) -> Self {
        let ar = match ar_override {
            Some(ar) if !ar.is_empty() => PathBuf::from(ar),
            _ => resolve_tool(lookup, "ar"),
        };
        HelperTools {
            ar,
            lib: resolve_tool(lookup, "lib"),
            link: resolve_tool(lookup, "link"),
        }
    }
}

/// Everything a plan is computed from.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub opts: &'a BuildOptions,
    pub host: HostPlatform,
    pub toolchain: &'a ToolchainDescriptor,
    pub flags: &'a FlagSet,
    pub tools: &'a HelperTools,
}

/// A complete build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub pipeline: Pipeline,
    pub toolchain: ToolchainDescriptor,
    /// Directory receiving the artifact
    pub build_dir: PathBuf,
    /// Directory receiving objects, when the pipeline produces any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obj_dir: Option<PathBuf>,
    /// All build steps in execution order
    pub steps: Vec<BuildStep>,
    /// The library the plan produces
    pub artifact: LibraryArtifact,
    /// Compile-only commands per source, for compile_commands.json
    #[serde(skip)]
    index: Vec<CompileStep>,
}

/// A build step in the plan.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildStep {
    /// Compile a source file to an object file
    Compile(CompileStep),
    /// Bundle objects into a static library
    Archive(OutputStep),
    /// Produce a shared library
    Link(OutputStep),
}

impl BuildStep {
    pub fn command(&self) -> &CommandSpec {
        match self {
            BuildStep::Compile(s) => &s.command,
            BuildStep::Archive(s) | BuildStep::Link(s) => &s.command,
        }
    }

    /// Short verb for progress and log messages.
    pub fn verb(&self) -> &'static str {
        match self {
            BuildStep::Compile(_) => "Compiling",
            BuildStep::Archive(_) => "Archiving",
            BuildStep::Link(_) => "Linking",
        }
    }

    /// File this step works on (source for compiles, output otherwise).
    pub fn subject(&self) -> &Path {
        match self {
            BuildStep::Compile(s) => &s.source,
            BuildStep::Archive(s) | BuildStep::Link(s) => &s.output,
        }
    }
}

/// Compile one translation unit.
#[derive(Debug, Clone, Serialize)]
pub struct CompileStep {
    pub source: PathBuf,
    pub language: Language,
    pub object: PathBuf,
    pub command: CommandSpec,
}

/// Produce the library file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputStep {
    pub output: PathBuf,
    pub command: CommandSpec,
}

/// compile_commands.json entry.
#[derive(Debug, Clone, Serialize)]
struct CompileCommand {
    directory: String,
    file: String,
    arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
}

impl BuildPlan {
    /// Compute the plan for building `sources`.
    pub fn new(sources: &SourceSet, ctx: &PlanContext<'_>) -> Self {
        let opts = ctx.opts;
        let pipeline = Pipeline::select(opts.kind, ctx.toolchain.style);
        let artifact = LibraryArtifact {
            path: opts
                .build_dir
                .join(library_file_name(&opts.output, opts.kind, ctx.host)),
            kind: opts.kind,
        };
        let obj_dir = opts.obj_dir();

        let (steps, index, obj_dir) = match pipeline {
            Pipeline::UnixStatic => {
                let gcc = GccToolchain::from_descriptor(ctx.toolchain, ctx.tools.ar.clone());
                let compiles = compile_steps(&gcc, sources, ctx, &obj_dir);
                let input = link_input(&compiles, &artifact.path, ctx.flags);
                let archive = BuildStep::Archive(OutputStep {
                    output: artifact.path.clone(),
                    command: gcc.archive_command(&input),
                });
                let steps = finish(&compiles, archive);
                (steps, compiles, Some(obj_dir))
            }
            Pipeline::Msvc => {
                let msvc = MsvcToolchain::from_descriptor(
                    ctx.toolchain,
                    ctx.tools.lib.clone(),
                    ctx.tools.link.clone(),
                );
                let compiles = compile_steps(&msvc, sources, ctx, &obj_dir);
                let input = link_input(&compiles, &artifact.path, ctx.flags);
                let last = match opts.kind {
                    LibraryKind::Shared => BuildStep::Link(OutputStep {
                        output: artifact.path.clone(),
                        command: msvc.link_dll_command(&input),
                    }),
                    LibraryKind::Static => BuildStep::Archive(OutputStep {
                        output: artifact.path.clone(),
                        command: msvc.archive_command(&input),
                    }),
                };
                let steps = finish(&compiles, last);
                (steps, compiles, Some(obj_dir))
            }
            Pipeline::UnixShared => {
                let gcc = GccToolchain::from_descriptor(ctx.toolchain, ctx.tools.ar.clone());
                let driver = if sources.has_cxx() {
                    Language::Cxx
                } else {
                    Language::C
                };
                let input = SharedBuildInput {
                    sources: sources.paths().map(Path::to_path_buf).collect(),
                    output: artifact.path.clone(),
                    include_flags: ctx.flags.include.clone(),
                    pic_flags: pic_flags(FlagStyle::Unix, opts.fpic),
                    lib_dir_flags: ctx.flags.lib_dirs.clone(),
                    lib_flags: ctx.flags.libs.clone(),
                    cflags: ctx.flags.cflags.clone(),
                    ldflags: ctx.flags.ldflags.clone(),
                };
                let link = BuildStep::Link(OutputStep {
                    output: artifact.path.clone(),
                    command: gcc.shared_build_command(&input, driver),
                });
                // Nothing is compiled separately; the index still describes each unit
                let index = compile_steps(&gcc, sources, ctx, &obj_dir);
                (vec![link], index, None)
            }
        };

        tracing::debug!(
            "planned {:?} build of {} with {} step(s)",
            pipeline,
            artifact.path.display(),
            steps.len()
        );

        BuildPlan {
            pipeline,
            toolchain: ctx.toolchain.clone(),
            build_dir: opts.build_dir.clone(),
            obj_dir,
            steps,
            artifact,
            index,
        }
    }

    /// Number of compile steps.
    pub fn compile_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, BuildStep::Compile(_)))
            .count()
    }

    /// Write `compile_commands.json` describing every translation unit.
    ///
    /// `directory` is the working directory the commands run from.
    pub fn emit_compile_commands(&self, directory: &Path, path: &Path) -> Result<()> {
        let commands: Vec<CompileCommand> = self
            .index
            .iter()
            .map(|step| {
                let mut arguments = Vec::with_capacity(step.command.args.len() + 1);
                arguments.push(step.command.program.display().to_string());
                arguments.extend(step.command.args.iter().cloned());

                CompileCommand {
                    directory: directory.display().to_string(),
                    file: step.source.display().to_string(),
                    arguments,
                    output: Some(step.object.display().to_string()),
                }
            })
            .collect();

        let json = serde_json::to_string_pretty(&commands)?;
        write_string(path, &json)
    }
}

fn compile_steps(
    toolchain: &dyn Toolchain,
    sources: &SourceSet,
    ctx: &PlanContext<'_>,
    obj_dir: &Path,
) -> Vec<CompileStep> {
    let pic = pic_flags(toolchain.style(), ctx.opts.fpic);

    sources
        .files()
        .iter()
        .map(|src| {
            let object = object_path(obj_dir, &src.path, toolchain.object_extension());
            let input = CompileInput {
                source: src.path.clone(),
                output: object.clone(),
                include_flags: ctx.flags.include.clone(),
                pic_flags: pic.clone(),
                cflags: ctx.flags.cflags.clone(),
            };
            CompileStep {
                source: src.path.clone(),
                language: src.language,
                object,
                command: toolchain.compile_command(&input, src.language),
            }
        })
        .collect()
}

fn link_input(compiles: &[CompileStep], output: &Path, flags: &FlagSet) -> LinkInput {
    LinkInput {
        objects: compiles.iter().map(|c| c.object.clone()).collect(),
        output: output.to_path_buf(),
        lib_dir_flags: flags.lib_dirs.clone(),
        lib_flags: flags.libs.clone(),
        ldflags: flags.ldflags.clone(),
    }
}

fn finish(compiles: &[CompileStep], last: BuildStep) -> Vec<BuildStep> {
    compiles
        .iter()
        .cloned()
        .map(BuildStep::Compile)
        .chain(std::iter::once(last))
        .collect()
}
