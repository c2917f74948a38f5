//! Packaging pipeline orchestration.
//!
//! This module runs the stages in order (stage, set version, compile,
//! relocate) and stops at the first failure. Partially staged files are left
//! in the working directory.

use crate::compiler::{CommandExecutor, InstallerCompiler};
use crate::config::PackagerConfig;
use crate::definition::inject_version;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::output::write_line;
use crate::relocator::relocate;
use crate::stager::{DEFINITION_FILE, Stager};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Context for a packaging run.
pub struct PipelineContext<'a> {
    /// Version string injected into the definition file.
    pub version: &'a str,
    /// Installation directory holding `bin/`.
    pub install_dir: &'a Utf8Path,
    /// Staging directory, also the compiler's working directory.
    pub work_dir: &'a Utf8Path,
    /// Files to take from `<install_dir>/bin`.
    pub manifest: &'a Manifest,
    /// Resolved configuration.
    pub config: &'a PackagerConfig,
    /// Report each step and echo compiler output.
    pub verbose: bool,
}

impl PipelineContext<'_> {
    /// Path of the definition file once staged.
    #[must_use]
    pub fn staged_definition(&self) -> Utf8PathBuf {
        self.work_dir.join(DEFINITION_FILE)
    }

    fn progress(&self, stderr: &mut dyn Write, message: impl std::fmt::Display) {
        if self.verbose {
            write_line(stderr, message);
        }
    }
}

/// Copies the manifest, the fixed assets and the README into the working
/// directory, returning the staged definition file.
///
/// # Errors
///
/// Returns an error if any source is missing or a copy fails.
pub fn stage_inputs(context: &PipelineContext<'_>, stderr: &mut dyn Write) -> Result<Utf8PathBuf> {
    let stager = Stager::new(context.work_dir.to_owned(), context.verbose);

    context.progress(
        stderr,
        format!(
            "Staging {} file(s) from {} to {}...",
            context.manifest.len(),
            context.install_dir.join("bin"),
            context.work_dir
        ),
    );
    stager.stage_manifest(context.install_dir, context.manifest, stderr)?;
    stager.stage_assets(&context.config.resources, stderr)?;
    stager.write_readme()?;

    Ok(context.staged_definition())
}

/// Writes the version into the staged definition file.
///
/// # Errors
///
/// Returns an error if the version marker is absent.
pub fn set_version(
    context: &PipelineContext<'_>,
    definition: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<()> {
    context.progress(
        stderr,
        format!("Setting version {} in {definition}...", context.version),
    );
    inject_version(definition, &context.config.version_marker, context.version)
}

/// Runs the installer compiler on the staged definition file.
///
/// # Errors
///
/// Returns an error if the compiler cannot run or fails.
pub fn compile_installer(
    context: &PipelineContext<'_>,
    executor: &dyn CommandExecutor,
    definition: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<()> {
    let compiler = InstallerCompiler::new(context.config.makensis.as_str(), executor, context.verbose);
    context.progress(stderr, format!("Compiling installer with {}...", compiler.program()));
    compiler.compile(definition, stderr)?;
    Ok(())
}

/// Runs every stage and returns the relocated installer path.
///
/// # Errors
///
/// Returns the first stage failure.
pub fn run_pipeline(
    context: &PipelineContext<'_>,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    let definition = stage_inputs(context, stderr)?;
    set_version(context, &definition, stderr)?;
    compile_installer(context, executor, &definition, stderr)?;

    context.progress(stderr, "Relocating installer...");
    relocate(context.install_dir, context.work_dir, &definition)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
