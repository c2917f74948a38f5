//! Shared test utilities for the packager crate.

use crate::compiler::CommandExecutor;
use crate::config::PackagerConfig;
use crate::definition::DEFAULT_VERSION_MARKER;
use crate::error::{PackagerError, Result};
use crate::manifest::Manifest;
use crate::stager::{AUXILIARY_ASSETS, DEFINITION_FILE, LICENSE_FILE, PRIVACY_FILE, Resources};
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute (e.g. "makensis").
    pub program: &'static str,
    /// The arguments to pass to the program.
    pub args: Vec<&'static str>,
    /// File written into the working directory before returning, mimicking
    /// the installer the real compiler would produce.
    pub produces: Option<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// A successful compiler run that writes `produces` into its cwd.
    #[must_use]
    pub fn compiles(program: &'static str, definition: &'static str, produces: &'static str) -> Self {
        Self {
            program,
            args: vec![definition],
            produces: Some(produces),
            result: Ok(success_output()),
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to exercise the packaging pipeline without an installer
/// compiler on the host.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path) -> Result<Output> {
        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Err(PackagerError::StubMismatch {
                message: format!("unexpected invocation of {program}"),
            });
        };

        if call.program != program || call.args.as_slice() != args {
            return Err(PackagerError::StubMismatch {
                message: format!(
                    "expected {} {:?}, got {program} {args:?}",
                    call.program, call.args
                ),
            });
        }

        if let Some(name) = call.produces {
            fs::write(cwd.join(name), b"installer")?;
        }

        call.result
    }
}

/// Definition file used by test trees: a version marker line and an
/// `OutFile` naming `blast-<version>-win64.exe`.
#[must_use]
pub fn sample_definition(out_file: &str) -> String {
    format!(
        concat!(
            "; NCBI BLAST installer\n",
            "!define PRODUCT_NAME \"NCBI BLAST\"\n",
            "!define PRODUCT_VERSION \"BLAST_VERSION\"\n",
            "Name \"${{PRODUCT_NAME}} ${{PRODUCT_VERSION}}\"\n",
            "OutFile \"{}\"\n",
            "!include \"EnvVarUpdate.nsh\"\n",
            "Icon \"ncbilogo.ico\"\n",
        ),
        out_file
    )
}

/// A scratch release tree: an installation directory with `bin/`, a resource
/// directory with every packaging asset, and an empty working directory.
#[derive(Debug)]
pub struct PackagingTree {
    _temp: tempfile::TempDir,
    /// Installation directory; binaries live in its `bin` subdirectory.
    pub install_dir: Utf8PathBuf,
    /// Staging directory.
    pub work_dir: Utf8PathBuf,
    /// Directory holding the definition file, licence texts and assets.
    pub resource_dir: Utf8PathBuf,
}

impl PackagingTree {
    /// Create the tree with every entry of `manifest` present and a
    /// definition file declaring `out_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directories cannot be created.
    pub fn new(manifest: &Manifest, out_file: &str) -> Result<Self> {
        let temp = tempfile::TempDir::new()?;
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).map_err(|e| {
            PackagerError::NonUtf8Path {
                what: "temporary directory",
                path: e.into_path_buf().display().to_string(),
            }
        })?;
        let tree = Self {
            _temp: temp,
            install_dir: root.join("install"),
            work_dir: root.join("work"),
            resource_dir: root.join("resources"),
        };
        fs::create_dir_all(tree.install_dir.join("bin"))?;
        fs::create_dir_all(&tree.work_dir)?;
        fs::create_dir_all(&tree.resource_dir)?;

        for name in manifest.iter() {
            tree.write_binary(name)?;
        }
        fs::write(
            tree.resource_dir.join(DEFINITION_FILE),
            sample_definition(out_file),
        )?;
        fs::write(tree.resource_dir.join(LICENSE_FILE), "PUBLIC DOMAIN NOTICE\n")?;
        fs::write(tree.resource_dir.join(PRIVACY_FILE), "Privacy statement\n")?;
        for name in AUXILIARY_ASSETS {
            fs::write(tree.resource_dir.join(name), name.as_bytes())?;
        }
        Ok(tree)
    }

    /// Write a placeholder binary into `<install_dir>/bin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_binary(&self, name: &str) -> Result<()> {
        fs::write(self.install_dir.join("bin").join(name), format!("binary:{name}"))?;
        Ok(())
    }

    /// Remove a binary from `<install_dir>/bin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub fn remove_binary(&self, name: &str) -> Result<()> {
        fs::remove_file(self.install_dir.join("bin").join(name))?;
        Ok(())
    }

    /// Resources rooted at the tree's resource directory.
    #[must_use]
    pub fn resources(&self) -> Resources {
        Resources::new(self.resource_dir.clone(), self.resource_dir.clone())
    }

    /// Configuration pointing at this tree with the given compiler name.
    #[must_use]
    pub fn config(&self, makensis: &str) -> PackagerConfig {
        PackagerConfig {
            makensis: makensis.to_owned(),
            timeout: None,
            resources: self.resources(),
            version_marker: DEFAULT_VERSION_MARKER.to_owned(),
        }
    }
}
