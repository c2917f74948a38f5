//! Optional working-directory listing.
//!
//! Release engineers occasionally need to see what the build agent left in
//! the staging directory before packaging starts. The listing is opt-in and
//! never part of the packaging result.

use crate::error::Result;
use crate::output::write_line;
use camino::Utf8Path;
use std::io::Write;
use walkdir::WalkDir;

/// Marker printed before the listing.
pub const LISTING_START: &str = "#DEBUG:START: DIRLIST";

/// Marker printed after the listing.
pub const LISTING_END: &str = "#DEBUG:END: DIRLIST";

/// Write the full path of every file below `dir`, sorted by file name.
///
/// Directories are descended into without being printed.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked.
pub fn list_tree(dir: &Utf8Path, out: &mut dyn Write) -> Result<()> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_dir() {
            write_line(out, entry.path().display());
        }
    }
    Ok(())
}

/// Write [`list_tree`] output bracketed by the start and end markers.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked.
pub fn write_listing(dir: &Utf8Path, out: &mut dyn Write) -> Result<()> {
    write_line(out, LISTING_START);
    list_tree(dir, out)?;
    write_line(out, LISTING_END);
    Ok(())
}
