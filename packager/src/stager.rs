//! File staging for the installer compiler.
//!
//! This module copies the manifest binaries and the fixed packaging assets
//! into the working directory, where the installer compiler resolves every
//! relative path named by the definition file.

use crate::error::{PackagerError, Result};
use crate::manifest::Manifest;
use crate::output::{copy_message, write_line};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;

/// File name of the NSIS installer definition.
pub const DEFINITION_FILE: &str = "ncbi-blast.nsi";

/// Licence text shipped with the installer.
pub const LICENSE_FILE: &str = "LICENSE";

/// Privacy notice shipped with the installer.
pub const PRIVACY_FILE: &str = "BLAST_PRIVACY";

/// Helper script and icon referenced by the definition file.
pub const AUXILIARY_ASSETS: &[&str] = &["EnvVarUpdate.nsh", "ncbilogo.ico"];

/// Generated documentation pointer.
pub const README_FILE: &str = "README.txt";

/// BLAST user manual.
pub const USER_MANUAL_URL: &str = "http://www.ncbi.nlm.nih.gov/books/NBK279690";

/// BLAST release notes.
pub const RELEASE_NOTES_URL: &str = "http://www.ncbi.nlm.nih.gov/books/NBK131777";

/// Locations of the fixed packaging assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    resource_dir: Utf8PathBuf,
    licence_dir: Utf8PathBuf,
}

impl Resources {
    /// Create resources from explicit directories.
    #[must_use]
    pub fn new(resource_dir: Utf8PathBuf, licence_dir: Utf8PathBuf) -> Self {
        Self {
            resource_dir,
            licence_dir,
        }
    }

    /// Create resources whose licence directory follows the release tree.
    ///
    /// The definition file lives in `<blast>/post_build/win`, while the
    /// licence and privacy notice sit two levels up in `<blast>`. When the
    /// resource directory is too shallow, it doubles as the licence directory.
    ///
    /// # Example
    ///
    /// ```
    /// use camino::{Utf8Path, Utf8PathBuf};
    /// use blast_win_packager::stager::Resources;
    ///
    /// let resources = Resources::from_resource_dir(Utf8PathBuf::from("/src/blast/post_build/win"));
    /// assert_eq!(resources.licence_dir(), Utf8Path::new("/src/blast"));
    /// ```
    #[must_use]
    pub fn from_resource_dir(resource_dir: Utf8PathBuf) -> Self {
        let licence_dir = resource_dir
            .parent()
            .and_then(Utf8Path::parent)
            .filter(|p| !p.as_str().is_empty())
            .map_or_else(|| resource_dir.clone(), Utf8Path::to_owned);
        Self {
            resource_dir,
            licence_dir,
        }
    }

    /// Directory holding the definition file and auxiliary assets.
    #[must_use]
    pub fn resource_dir(&self) -> &Utf8Path {
        &self.resource_dir
    }

    /// Directory holding the licence and privacy notice.
    #[must_use]
    pub fn licence_dir(&self) -> &Utf8Path {
        &self.licence_dir
    }

    /// Source path of the installer definition file.
    #[must_use]
    pub fn definition_file(&self) -> Utf8PathBuf {
        self.resource_dir.join(DEFINITION_FILE)
    }

    /// Every asset to stage, definition file first.
    #[must_use]
    pub fn asset_paths(&self) -> Vec<Utf8PathBuf> {
        let mut paths = vec![
            self.definition_file(),
            self.licence_dir.join(LICENSE_FILE),
            self.licence_dir.join(PRIVACY_FILE),
        ];
        paths.extend(AUXILIARY_ASSETS.iter().map(|name| self.resource_dir.join(name)));
        paths
    }
}

/// Copies packaging inputs into the working directory.
pub struct Stager {
    work_dir: Utf8PathBuf,
    verbose: bool,
}

impl Stager {
    /// Create a stager targeting `work_dir`.
    #[must_use]
    pub fn new(work_dir: Utf8PathBuf, verbose: bool) -> Self {
        Self { work_dir, verbose }
    }

    /// Copy each manifest entry from `<install_dir>/bin` into the working directory.
    ///
    /// Stops at the first failure; files already copied are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingBinary`] if an entry is absent,
    /// [`PackagerError::SameFile`] if the working directory is `<install_dir>/bin`,
    /// or [`PackagerError::CopyFailed`] if the copy itself fails.
    pub fn stage_manifest(
        &self,
        install_dir: &Utf8Path,
        manifest: &Manifest,
        stderr: &mut dyn Write,
    ) -> Result<Vec<Utf8PathBuf>> {
        let bin_dir = install_dir.join("bin");
        manifest
            .iter()
            .map(|name| {
                let source = bin_dir.join(name);
                if !source.is_file() {
                    return Err(PackagerError::MissingBinary {
                        name: name.to_owned(),
                        path: source,
                    });
                }
                self.copy_in(&source, name, stderr)
            })
            .collect()
    }

    /// Copy the definition file, licence texts and auxiliary assets.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingAsset`] if any asset is absent,
    /// [`PackagerError::SameFile`] if the working directory holds the assets
    /// themselves, or [`PackagerError::CopyFailed`] if a copy fails.
    pub fn stage_assets(
        &self,
        resources: &Resources,
        stderr: &mut dyn Write,
    ) -> Result<Vec<Utf8PathBuf>> {
        resources
            .asset_paths()
            .iter()
            .map(|source| {
                let Some(name) = source.file_name().filter(|_| source.is_file()) else {
                    return Err(PackagerError::MissingAsset {
                        path: source.clone(),
                    });
                };
                self.copy_in(source, name, stderr)
            })
            .collect()
    }

    /// Write the two-line documentation pointer, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_readme(&self) -> Result<Utf8PathBuf> {
        let path = self.work_dir.join(README_FILE);
        fs::write(&path, readme_contents())?;
        log::debug!("wrote {path}");
        Ok(path)
    }

    fn copy_in(
        &self,
        source: &Utf8Path,
        name: &str,
        stderr: &mut dyn Write,
    ) -> Result<Utf8PathBuf> {
        if self.verbose {
            write_line(stderr, copy_message(source, &self.work_dir));
        }
        let dest = self.work_dir.join(name);
        copy_file(source, &dest)?;
        log::trace!("staged {source} as {dest}");
        Ok(dest)
    }
}

/// Copy `source` to `dest`, overwriting `dest`.
///
/// Copying a file onto itself would truncate it, so a destination that
/// resolves to the source is rejected.
///
/// # Errors
///
/// Returns [`PackagerError::SameFile`] if both paths name one file, or
/// [`PackagerError::CopyFailed`] if the copy fails.
pub(crate) fn copy_file(source: &Utf8Path, dest: &Utf8Path) -> Result<()> {
    if is_same_file(source, dest) {
        return Err(PackagerError::SameFile {
            path: source.to_owned(),
        });
    }
    fs::copy(source, dest).map_err(|source_err| PackagerError::CopyFailed {
        from: source.to_owned(),
        to: dest.to_owned(),
        source: source_err,
    })?;
    Ok(())
}

fn is_same_file(a: &Utf8Path, b: &Utf8Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Contents of the generated `README.txt`.
#[must_use]
pub fn readme_contents() -> String {
    format!(
        "The user manual is available in {USER_MANUAL_URL}\n\
         Release notes are available in {RELEASE_NOTES_URL}\n"
    )
}

#[cfg(test)]
#[path = "stager_tests.rs"]
mod tests;
