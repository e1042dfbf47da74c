//! The `libsmith` build command

use anyhow::Result;

use crate::cli::Cli;
use libsmith::core::options::BuildOptions;
use libsmith::ops::build_lib::{build, detect, plan, BuildEnv};
use libsmith::util::config::{global_config_path, load_config, project_config_path, Config};
use libsmith::util::process::{PathLookup, ProcessRunner};

pub fn execute(args: Cli) -> Result<()> {
    let lookup = PathLookup;
    let env = BuildEnv::from_process(&lookup)?;

    // Load configuration (global + project, then the host's section)
    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&env.cwd),
        env.host,
    );
    let opts = build_options(&args, &config);

    if args.print_toolchain {
        let toolchain = detect(&opts, &env)?;
        println!("{}", toolchain);
        return Ok(());
    }

    if args.plan {
        let plan = plan(&opts, &env)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let mut runner = ProcessRunner;
    let result = build(&opts, &env, &mut runner)?;

    if result.toolchain.is_msvc() {
        println!(
            "Built (MSVC) {} library: {}",
            result.artifact.kind,
            result.artifact.path.display()
        );
    } else {
        println!(
            "Built {} library: {}",
            result.artifact.kind,
            result.artifact.path.display()
        );
    }

    Ok(())
}

/// Merge command-line flags over configuration over defaults.
fn build_options(args: &Cli, config: &Config) -> BuildOptions {
    let mut opts = BuildOptions::new(args.output.clone());
    let build = &config.build;

    // --files and --sources are exclusive; neither means the default `src`
    if !args.files.is_empty() {
        opts.inputs = args.files.clone();
    } else if !args.sources.is_empty() {
        opts.inputs = args.sources.clone();
    }
    if let Some(kind) = args.kind.or_else(|| config.kind()) {
        opts.kind = kind;
    }
    if let Some(dir) = args.build_dir.clone().or_else(|| build.build_dir.clone()) {
        opts.build_dir = dir;
    }

    opts.include_dirs = or_config(&args.include, &build.include);
    opts.lib_dirs = or_config(&args.libdirs, &build.libdirs);
    opts.libs = or_config(&args.libs, &build.libs);
    opts.cflags = or_config(&args.cflags, &build.cflags);
    opts.ldflags = or_config(&args.ldflags, &build.ldflags);

    opts.compiler = args.compiler.clone().or_else(|| build.compiler.clone());
    opts.fpic = args.fpic || build.fpic;
    opts.verbose = args.verbose;
    opts.emit_compile_commands = args.emit_compile_commands || build.emit_compile_commands;

    opts
}

fn or_config(cli: &[String], config: &[String]) -> Vec<String> {
    if cli.is_empty() {
        config.to_vec()
    } else {
        cli.to_vec()
    }
}
