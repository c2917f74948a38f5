//! Error types for the BLAST Windows packager.
//!
//! Every stage of the packaging pipeline is fail-fast: nothing is retried and
//! nothing is rolled back, so each variant carries enough context to point at
//! the file or tool that stopped the run.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling the installer.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// A manifest entry is absent from the installation's `bin` directory.
    #[error("required binary {name} not found at {path}")]
    MissingBinary {
        /// Manifest entry that could not be found.
        name: String,
        /// Path where the binary was expected.
        path: Utf8PathBuf,
    },

    /// A fixed packaging asset (definition file, licence, icon...) is absent.
    #[error("required packaging asset not found at {path}")]
    MissingAsset {
        /// Path where the asset was expected.
        path: Utf8PathBuf,
    },

    /// The same file name appears twice in a manifest.
    #[error("manifest lists {name} more than once")]
    DuplicateManifestEntry {
        /// The repeated file name.
        name: String,
    },

    /// Copying a file into the staging area or the installer directory failed.
    #[error("failed to copy {from} to {to}")]
    CopyFailed {
        /// Source of the copy.
        from: Utf8PathBuf,
        /// Destination of the copy.
        to: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A copy's source and destination resolve to the same file.
    #[error("refusing to copy {path} onto itself")]
    SameFile {
        /// The file that would have been truncated.
        path: Utf8PathBuf,
    },

    /// The installer definition file lacks a line the packager depends on.
    #[error("invalid installer definition {path}: {reason}")]
    ConfigFormat {
        /// Path to the definition file.
        path: Utf8PathBuf,
        /// Which marker was missing or malformed.
        reason: String,
    },

    /// The installer compiler could not be run or reported failure.
    #[error("{tool} failed: {reason}")]
    BuildTool {
        /// The compiler executable that was invoked.
        tool: String,
        /// Description of the failure, including compiler stderr when present.
        reason: String,
    },

    /// The compiler exited successfully but the declared installer is absent.
    #[error("installer {path} was not produced by the compiler")]
    MissingArtifact {
        /// Path where the compiled installer was expected.
        path: Utf8PathBuf,
    },

    /// The packager configuration file could not be read or parsed.
    #[error("invalid packager configuration {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse or read error.
        reason: String,
    },

    /// An environment variable holds a value the packager cannot use.
    #[error("invalid value for {name}: {reason}")]
    InvalidEnv {
        /// Name of the environment variable.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// A path supplied by the environment is not valid UTF-8.
    #[error("{what} is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Which path was being resolved.
        what: &'static str,
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
