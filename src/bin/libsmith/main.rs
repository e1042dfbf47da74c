//! libsmith CLI - build a C/C++ library with the host's compiler

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod build;
mod cli;

use cli::Cli;
use libsmith::util::errors::BuildError;

fn main() {
    if let Err(e) = run() {
        std::process::exit(report(&e));
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("libsmith=debug")
        } else {
            EnvFilter::new("libsmith=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    build::execute(cli)
}

/// Print a failed run and return the exit code for it.
fn report(e: &anyhow::Error) -> i32 {
    let Some(err) = e.downcast_ref::<BuildError>() else {
        eprintln!("error: {:#}", e);
        return 1;
    };

    if let BuildError::CommandFailed { stdout, stderr, .. } = err {
        eprintln!("Build failed.");
        if !stdout.is_empty() {
            println!("{}", stdout.trim_end());
        }
        if !stderr.is_empty() {
            eprintln!("{}", stderr.trim_end());
        }
    } else {
        eprintln!("error: {}", err);
    }

    err.exit_code()
}
