//! Installer compiler invocation.
//!
//! The compiler (NSIS `makensis`) is run once, synchronously, with the
//! definition file's base name as its only argument and the staging directory
//! as its working directory so that relative asset paths in the definition
//! resolve against the staged files.

use crate::error::{PackagerError, Result};
use crate::output::{echo_captured, write_line};
use camino::Utf8Path;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::process::{Command, ExitStatus, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Compiler used when nothing else is configured; resolved through `PATH`.
pub const DEFAULT_MAKENSIS: &str = "makensis";

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `program` with `args` in `cwd` and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command, or [`PackagerError::BuildTool`] if the command times out.
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> Result<Output>;
}

/// Executes commands on the host system, optionally bounded by a timeout.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use camino::Utf8Path;
/// use blast_win_packager::compiler::{CommandExecutor, SystemCommandExecutor};
///
/// let executor = SystemCommandExecutor::with_timeout(Duration::from_secs(600));
/// let output = executor.run("makensis", &["-VERSION".to_owned()], Utf8Path::new("."))?;
/// assert!(output.status.success());
/// # Ok::<(), blast_win_packager::error::PackagerError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor {
    timeout: Option<Duration>,
}

impl SystemCommandExecutor {
    /// Executor that waits for as long as the command runs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that kills the command once `timeout` elapses.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// The configured timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> Result<Output> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd.as_std_path());
        log::debug!("running {program} {} in {cwd}", args.join(" "));

        match self.timeout {
            None => Ok(cmd.output()?),
            Some(timeout) => run_with_timeout(cmd, program, timeout),
        }
    }
}

/// Runs a command with a timeout.
///
/// Output is captured in anonymous temporary files rather than pipes, so a
/// command that writes more than a pipe buffer cannot stall the wait.
fn run_with_timeout(mut cmd: Command, program: &str, timeout: Duration) -> Result<Output> {
    let mut stdout = tempfile::tempfile()?;
    let mut stderr = tempfile::tempfile()?;
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(stdout.try_clone()?))
        .stderr(Stdio::from(stderr.try_clone()?));

    let mut child = cmd.spawn()?;
    // Drop the parent's copies of the handles held by `cmd`.
    drop(cmd);

    match child.wait_timeout(timeout)? {
        Some(status) => Ok(Output {
            status,
            stdout: read_captured(&mut stdout)?,
            stderr: read_captured(&mut stderr)?,
        }),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(PackagerError::BuildTool {
                tool: program.to_owned(),
                reason: format!("timed out after {} seconds", timeout.as_secs()),
            })
        }
    }
}

fn read_captured(file: &mut File) -> Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Runs the installer compiler against a staged definition file.
pub struct InstallerCompiler<'a> {
    program: String,
    executor: &'a dyn CommandExecutor,
    verbose: bool,
}

impl<'a> InstallerCompiler<'a> {
    /// Create a compiler invoking `program` through `executor`.
    #[must_use]
    pub fn new(program: impl Into<String>, executor: &'a dyn CommandExecutor, verbose: bool) -> Self {
        Self {
            program: program.into(),
            executor,
            verbose,
        }
    }

    /// The compiler executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compile `definition`, blocking until the compiler exits.
    ///
    /// When verbose, the compiler's stdout and stderr are echoed to `stderr`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::BuildTool`] if the compiler cannot be started,
    /// times out, or exits unsuccessfully.
    pub fn compile(&self, definition: &Utf8Path, stderr: &mut dyn Write) -> Result<ExitStatus> {
        let file_name = definition.file_name().ok_or_else(|| PackagerError::BuildTool {
            tool: self.program.clone(),
            reason: format!("definition path {definition} has no file name"),
        })?;
        let cwd = definition.parent().unwrap_or_else(|| Utf8Path::new("."));
        let cwd = if cwd.as_str().is_empty() {
            Utf8Path::new(".")
        } else {
            cwd
        };

        if self.verbose {
            write_line(stderr, format!("Running {} {file_name} in {cwd}", self.program));
        }

        let output = self
            .executor
            .run(&self.program, &[file_name.to_owned()], cwd)
            .map_err(|err| match err {
                PackagerError::Io(source) => PackagerError::BuildTool {
                    tool: self.program.clone(),
                    reason: format!("could not be started: {source}"),
                },
                other => other,
            })?;

        if self.verbose {
            echo_captured(stderr, &self.program, &output.stdout);
            echo_captured(stderr, &self.program, &output.stderr);
        }

        if !output.status.success() {
            return Err(PackagerError::BuildTool {
                tool: self.program.clone(),
                reason: failure_reason(&output),
            });
        }

        Ok(output.status)
    }
}

/// Describe a failed run, preferring stderr and falling back to stdout.
fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = [stderr.trim(), stdout.trim()]
        .into_iter()
        .find(|text| !text.is_empty());
    match detail {
        Some(text) => format!("{}: {text}", output.status),
        None => output.status.to_string(),
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
