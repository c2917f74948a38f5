//! Reading and patching the NSIS installer definition.
//!
//! The definition file is opaque to the packager except for two lines: the
//! version declaration, which is rewritten before compilation, and the
//! `OutFile` declaration, which names the installer the compiler produces.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use std::fs;

/// Token introducing the installer's output file name.
pub const OUTFILE_MARKER: &str = "OutFile";

/// Default prefix of the version declaration line.
pub const DEFAULT_VERSION_MARKER: &str = "!define PRODUCT_VERSION";

/// Rewrite the version declaration of the definition file at `path`.
///
/// Every line whose first non-blank text is `marker` (followed by whitespace
/// or the end of the line) becomes `marker "version"`, keeping its
/// indentation and line ending. All other bytes are preserved.
///
/// # Errors
///
/// Returns [`PackagerError::ConfigFormat`] if no line carries the marker, or
/// an I/O error if the file cannot be read or written.
pub fn inject_version(path: &Utf8Path, marker: &str, version: &str) -> Result<()> {
    let contents = fs::read_to_string(path)?;
    let (patched, replaced) = patch_version(&contents, marker, version);

    if replaced == 0 {
        return Err(PackagerError::ConfigFormat {
            path: path.to_owned(),
            reason: format!("no version line starting with `{marker}`"),
        });
    }

    log::debug!("set version {version} on {replaced} line(s) of {path}");
    fs::write(path, patched)?;
    Ok(())
}

/// Rewrite version lines in `contents`, returning the new text and the number
/// of lines changed.
///
/// # Examples
///
/// ```
/// use blast_win_packager::definition::patch_version;
///
/// let (text, count) = patch_version(
///     "Name \"BLAST\"\r\n  !define PRODUCT_VERSION \"BLAST_VERSION\"\r\n",
///     "!define PRODUCT_VERSION",
///     "2.15.0",
/// );
/// assert_eq!(count, 1);
/// assert_eq!(text, "Name \"BLAST\"\r\n  !define PRODUCT_VERSION \"2.15.0\"\r\n");
/// ```
#[must_use]
pub fn patch_version(contents: &str, marker: &str, version: &str) -> (String, usize) {
    let mut patched = String::with_capacity(contents.len() + version.len());
    let mut replaced = 0;

    for line in contents.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        let trimmed = body.trim_start();
        let is_version_line = trimmed
            .strip_prefix(marker)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace));

        if is_version_line {
            let indent = body.strip_suffix(trimmed).unwrap_or_default();
            patched.push_str(indent);
            patched.push_str(marker);
            patched.push_str(" \"");
            patched.push_str(version);
            patched.push('"');
            patched.push_str(ending);
            replaced += 1;
        } else {
            patched.push_str(line);
        }
    }

    (patched, replaced)
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Recover the installer file name declared by the definition file at `path`.
///
/// # Errors
///
/// Returns [`PackagerError::ConfigFormat`] if no usable `OutFile` line
/// exists, or an I/O error if the file cannot be read.
pub fn extract_output_name(path: &Utf8Path) -> Result<String> {
    let contents = fs::read_to_string(path)?;
    parse_output_name(&contents).ok_or_else(|| PackagerError::ConfigFormat {
        path: path.to_owned(),
        reason: format!("no `{OUTFILE_MARKER} \"<name>\"` line"),
    })
}

/// Extract the output name from definition text.
///
/// The first line mentioning `OutFile` wins; its second whitespace-separated
/// token, stripped of surrounding quotes, is the name.
///
/// # Examples
///
/// ```
/// use blast_win_packager::definition::parse_output_name;
///
/// let name = parse_output_name("OutFile \"blast-2.14.0-win64.exe\"\n");
/// assert_eq!(name.as_deref(), Some("blast-2.14.0-win64.exe"));
/// assert_eq!(parse_output_name("Name \"BLAST\"\n"), None);
/// ```
#[must_use]
pub fn parse_output_name(contents: &str) -> Option<String> {
    let line = contents.lines().find(|line| line.contains(OUTFILE_MARKER))?;
    let token = line.split_whitespace().nth(1)?;
    let name = token.trim_matches('"');
    (!name.is_empty()).then(|| name.to_owned())
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
