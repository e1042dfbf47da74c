//! Build executor with progress reporting.

use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::native::NativeBuilder;
use crate::builder::plan::BuildPlan;
use crate::core::artifact::LibraryArtifact;
use crate::util::process::CommandRunner;

/// Build executor with progress tracking.
pub struct BuildExecutor<'a> {
    runner: &'a mut dyn CommandRunner,
    verbose: bool,
}

impl<'a> BuildExecutor<'a> {
    /// Create a new build executor.
    pub fn new(runner: &'a mut dyn CommandRunner) -> Self {
        BuildExecutor {
            runner,
            verbose: false,
        }
    }

    /// Enable verbose output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute a build plan with progress reporting.
    pub fn execute(self, plan: &BuildPlan) -> Result<LibraryArtifact> {
        let start = Instant::now();

        if self.verbose {
            eprintln!(
                "    Building {} ({} step(s))",
                plan.artifact.path.display(),
                plan.steps.len()
            );
        }

        let pb = progress_bar(plan.steps.len(), self.verbose);

        let result = NativeBuilder::new(self.runner)
            .verbose(self.verbose)
            .with_progress(pb.clone())
            .execute(plan);

        if let Some(pb) = pb {
            if result.is_ok() {
                pb.finish_with_message("done");
            } else {
                pb.abandon();
            }
        }

        let artifact = result?;
        tracing::debug!(
            "finished {} in {:.2}s",
            artifact.path.display(),
            start.elapsed().as_secs_f64()
        );

        Ok(artifact)
    }
}

/// Progress bar for multi-step builds; verbose builds echo commands instead.
fn progress_bar(total: usize, verbose: bool) -> Option<ProgressBar> {
    if verbose || total <= 1 {
        return None;
    }

    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    let pb = ProgressBar::new(total as u64);
    pb.set_style(style);
    Some(pb)
}
