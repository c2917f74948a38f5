//! Output formatting for the packager CLI.
//!
//! Progress is written line by line to an injected writer (stderr in the
//! binary, a `Vec<u8>` in tests). Write failures are ignored: progress output
//! is best-effort and must never abort packaging.

use camino::Utf8Path;
use std::io::Write;

/// Write a single line to `out`, ignoring write failures.
///
/// Used for stderr progress and for the stdout directory listing alike.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the verbose line reported for each staged copy.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use blast_win_packager::output::copy_message;
///
/// let line = copy_message(Utf8Path::new("C:/blast/bin/blastn.exe"), Utf8Path::new("C:/work"));
/// assert_eq!(line, "Copying C:/blast/bin/blastn.exe to C:/work");
/// ```
#[must_use]
pub fn copy_message(source: &Utf8Path, work_dir: &Utf8Path) -> String {
    format!("Copying {source} to {work_dir}")
}

/// Format the final success line after the installer has been relocated.
#[must_use]
pub fn success_message(version: &str, installer: &Utf8Path) -> String {
    format!("Created BLAST {version} installer at {installer}")
}

/// Echo captured compiler output, one line at a time.
///
/// Empty streams produce no output.
pub fn echo_captured(stderr: &mut dyn Write, label: &str, captured: &[u8]) {
    let text = String::from_utf8_lossy(captured);
    for line in text.lines() {
        write_line(stderr, format!("[{label}] {line}"));
    }
}
