//! The fixed list of files bundled into the BLAST installer.
//!
//! Order is the copy order; it carries no other meaning. Entries are plain
//! file names resolved against `<install_dir>/bin`.

use crate::error::{PackagerError, Result};
use std::collections::HashSet;

/// Binaries, scripts and support libraries shipped in the Windows installer.
pub const BLAST_BINARIES: &[&str] = &[
    "blastn.exe",
    "blastp.exe",
    "blastx.exe",
    "tblastx.exe",
    "tblastn.exe",
    "rpsblast.exe",
    "rpstblastn.exe",
    "psiblast.exe",
    "blastdbcmd.exe",
    "makeblastdb.exe",
    "makembindex.exe",
    "makeprofiledb.exe",
    "blastdb_aliastool.exe",
    "segmasker.exe",
    "dustmasker.exe",
    "windowmasker.exe",
    "convert2blastmask.exe",
    "blastdbcheck.exe",
    "blast_formatter.exe",
    "deltablast.exe",
    "legacy_blast.pl",
    "update_blastdb.pl",
    "cleanup-blastdb-volumes.py",
    "get_species_taxids.sh",
    "blastn_vdb.exe",
    "tblastn_vdb.exe",
    "blast_formatter_vdb.exe",
    "nghttp2.dll",
    "ncbi-vdb-md.dll",
];

/// An ordered, duplicate-free list of file names to stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    /// Build a manifest from arbitrary entries.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::DuplicateManifestEntry`] if a name repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use blast_win_packager::manifest::Manifest;
    ///
    /// let manifest = Manifest::new(["blastn.exe", "blastp.exe"])?;
    /// assert_eq!(manifest.len(), 2);
    /// assert!(Manifest::new(["a.exe", "a.exe"]).is_err());
    /// # Ok::<(), blast_win_packager::error::PackagerError>(())
    /// ```
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(entries.len());
        for name in &entries {
            if !seen.insert(name.as_str()) {
                return Err(PackagerError::DuplicateManifestEntry { name: name.clone() });
            }
        }
        Ok(Self { entries })
    }

    /// The manifest of the BLAST command-line suite.
    #[must_use]
    pub fn blast() -> Self {
        Self {
            entries: BLAST_BINARIES.iter().map(|&name| name.to_owned()).collect(),
        }
    }

    /// Iterate over entries in copy order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
