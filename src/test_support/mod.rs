//! Test utilities and mocks for libsmith unit tests.
//!
//! Provides stand-ins for the two seams through which a build touches the
//! host: running external commands and searching `PATH` for executables.
//! [`capture_logs`] records the tracing output of a closure.
//!
//! # Example
//!
//! ```rust,ignore
//! use libsmith::test_support::{MockExecutor, MockLookup, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let lookup = MockLookup::with(&["clang", "clang++"]);
//!
//!     let mut exec = MockExecutor::succeeding();
//!     exec.expect_contains("b.c", MockProcessOutput::failure(2, "b.c: error"));
//!
//!     // Use mocks in tests...
//! }
//! ```

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::builder::toolchain::CommandSpec;
use crate::util::process::{CommandOutput, CommandRunner, ExecutableLookup};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for CommandOutput {
    fn from(out: MockProcessOutput) -> Self {
        CommandOutput {
            code: Some(out.status),
            stdout: out.stdout,
            stderr: out.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
struct CommandExpectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
}

/// Mock command runner.
///
/// Records every command it is asked to run and answers with the output of
/// the first matching expectation, falling back to the default output.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: Vec<CommandSpec>,
    default_output: Option<MockProcessOutput>,
}

impl MockExecutor {
    /// Create a mock executor that rejects unexpected commands.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Create a mock executor where every command succeeds silently.
    pub fn succeeding() -> Self {
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::default());
        exec
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.push(CommandPattern::Contains(substring.to_string()), output)
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    fn push(&mut self, pattern: CommandPattern, output: MockProcessOutput) -> &mut Self {
        self.expectations.push(CommandExpectation { pattern, output });
        self
    }

    /// All commands that were run, in order.
    pub fn calls(&self) -> &[CommandSpec] {
        &self.calls
    }

    /// Rendered command lines of all calls.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.iter().map(CommandSpec::display_command).collect()
    }
}

impl CommandRunner for MockExecutor {
    fn run(&mut self, spec: &CommandSpec) -> Result<CommandOutput> {
        let full_cmd = spec.display_command();
        self.calls.push(spec.clone());

        if let Some(exp) = self
            .expectations
            .iter()
            .find(|exp| exp.pattern.matches(&full_cmd))
        {
            return Ok(exp.output.clone().into());
        }

        match &self.default_output {
            Some(default) => Ok(default.clone().into()),
            None => bail!("unexpected command: {}", full_cmd),
        }
    }
}

/// Mock executable search path.
///
/// Names given to [`MockLookup::with`] resolve to `/mock/bin/<name>`;
/// everything else is missing.
#[derive(Debug, Clone, Default)]
pub struct MockLookup {
    names: BTreeSet<String>,
}

impl MockLookup {
    /// Lookup where exactly `names` can be found.
    pub fn with(names: &[&str]) -> Self {
        MockLookup {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Path `name` resolves to.
    pub fn path_of(&self, name: &str) -> PathBuf {
        Path::new("/mock/bin").join(name)
    }

    /// Whether `path` is one this lookup hands out.
    pub fn resolves(&self, path: &Path) -> bool {
        self.names.iter().any(|name| self.path_of(name) == path)
    }
}

impl ExecutableLookup for MockLookup {
    fn find(&self, name: &str) -> Option<PathBuf> {
        self.names.contains(name).then(|| self.path_of(name))
    }
}

/// Shared in-memory sink for formatted log lines.
#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (value, logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_logs() {
        let (value, logs) = capture_logs(|| {
            tracing::warn!("archiver missing");
            7
        });
        assert_eq!(value, 7);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("archiver missing"));
    }

    #[test]
    fn test_mock_executor_basic() {
        let mut exec = MockExecutor::new();

        exec.expect("gcc --version", MockProcessOutput::success("gcc 12.0.0"));
        exec.expect_prefix("ar", MockProcessOutput::failure(1, "ar: bad archive"));

        let result = exec.run(&CommandSpec::new("gcc").arg("--version")).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "gcc 12.0.0");

        let result = exec.run(&CommandSpec::new("ar").args(["rcs", "x.a"])).unwrap();
        assert_eq!(result.code, Some(1));
        assert_eq!(result.stderr, "ar: bad archive");

        assert_eq!(exec.call_lines(), vec!["gcc --version", "ar rcs x.a"]);
    }

    #[test]
    fn test_mock_executor_unexpected() {
        let mut exec = MockExecutor::new();
        assert!(exec.run(&CommandSpec::new("unknown")).is_err());
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn test_mock_executor_succeeding() {
        let mut exec = MockExecutor::succeeding();
        let result = exec.run(&CommandSpec::new("cc").arg("-c")).unwrap();
        assert!(result.success());
    }

    #[test]
    fn test_mock_lookup() {
        let lookup = MockLookup::with(&["clang"]);
        assert_eq!(lookup.find("clang"), Some(PathBuf::from("/mock/bin/clang")));
        assert_eq!(lookup.find("gcc"), None);
        assert!(lookup.resolves(Path::new("/mock/bin/clang")));
        assert!(!lookup.resolves(Path::new("/mock/bin/gcc")));
    }
}
