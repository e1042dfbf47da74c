//! Native C/C++ compiler driver.
//!
//! Runs the steps of a [`BuildPlan`] one at a time through a
//! [`CommandRunner`], stopping at the first command that fails.

use anyhow::Result;
use indicatif::ProgressBar;

use crate::builder::plan::{BuildPlan, BuildStep};
use crate::core::artifact::LibraryArtifact;
use crate::util::errors::BuildError;
use crate::util::fs::ensure_dir;
use crate::util::process::{CommandOutput, CommandRunner};

/// Native C/C++ builder.
pub struct NativeBuilder<'a> {
    runner: &'a mut dyn CommandRunner,
    verbose: bool,
    progress: Option<ProgressBar>,
}

impl<'a> NativeBuilder<'a> {
    /// Create a new native builder.
    pub fn new(runner: &'a mut dyn CommandRunner) -> Self {
        NativeBuilder {
            runner,
            verbose: false,
            progress: None,
        }
    }

    /// Echo each command and its captured output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Advance `pb` once per finished step.
    pub fn with_progress(mut self, pb: Option<ProgressBar>) -> Self {
        self.progress = pb;
        self
    }

    /// Execute the build plan.
    ///
    /// Creates the build and object directories, then runs every step in
    /// order. Nothing runs after a failing step.
    pub fn execute(&mut self, plan: &BuildPlan) -> Result<LibraryArtifact> {
        ensure_dir(&plan.build_dir)?;
        if let Some(obj_dir) = &plan.obj_dir {
            ensure_dir(obj_dir)?;
        }

        for step in &plan.steps {
            self.run_step(step)?;
        }

        Ok(plan.artifact.clone())
    }

    fn run_step(&mut self, step: &BuildStep) -> Result<()> {
        let command = step.command();
        let line = command.display_command();

        tracing::debug!("{} {}", step.verb(), step.subject().display());
        if let Some(pb) = &self.progress {
            pb.set_message(format!("{} {}", step.verb(), step.subject().display()));
        }
        if self.verbose {
            println!("+ {}", line);
        }

        let output = self.runner.run(command)?;

        if !output.success() {
            return Err(command_failed(line, output).into());
        }

        if self.verbose {
            echo_output(&output);
        }
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        Ok(())
    }
}

fn command_failed(command: String, output: CommandOutput) -> BuildError {
    BuildError::CommandFailed {
        command,
        code: output.code,
        stdout: output.stdout,
        stderr: output.stderr,
    }
}

fn echo_output(output: &CommandOutput) {
    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
}
