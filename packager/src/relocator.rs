//! Relocation of the compiled installer.
//!
//! The compiler leaves the installer next to the definition file; the
//! relocator copies it into `<install_dir>/installer`, where release tooling
//! picks it up.

use crate::definition::extract_output_name;
use crate::error::{PackagerError, Result};
use crate::stager::copy_file;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of the directory under the installation root receiving installers.
pub const INSTALLER_DIR: &str = "installer";

/// Return `<install_dir>/installer`.
#[must_use]
pub fn installer_dir(install_dir: &Utf8Path) -> Utf8PathBuf {
    install_dir.join(INSTALLER_DIR)
}

/// Copy the installer named by `definition` from `work_dir` into
/// `<install_dir>/installer`, creating that directory when needed.
///
/// Repeating the call overwrites the destination with the same bytes.
///
/// # Errors
///
/// Returns [`PackagerError::ConfigFormat`] if the definition names no output,
/// [`PackagerError::MissingArtifact`] if the compiled installer is absent,
/// [`PackagerError::SameFile`] if the working directory is the installer
/// directory, or a copy error if the destination cannot be written.
pub fn relocate(
    install_dir: &Utf8Path,
    work_dir: &Utf8Path,
    definition: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let dest_dir = installer_dir(install_dir);
    fs::create_dir_all(&dest_dir)?;

    let name = extract_output_name(definition)?;
    let artifact = work_dir.join(&name);
    if !artifact.is_file() {
        return Err(PackagerError::MissingArtifact { path: artifact });
    }

    let dest = dest_dir.join(&name);
    copy_file(&artifact, &dest)?;

    log::info!("relocated {artifact} to {dest}");
    Ok(dest)
}
