//! BLAST Windows packager library.
//!
//! This crate assembles the NCBI BLAST Windows installer from a finished
//! installation tree: it stages the shipped binaries and packaging assets
//! into a working directory, stamps the release version into the installer
//! definition, runs the NSIS compiler and moves the result into
//! `<install_dir>/installer`. It backs the `blast-win-packager` binary and
//! can be driven programmatically for testing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`compiler`] - Installer compiler invocation behind a command executor
//! - [`config`] - Layered configuration (flags, environment, TOML file)
//! - [`definition`] - Version injection and output-name extraction
//! - [`diagnostics`] - Optional working-directory listing
//! - [`error`] - Error types for every packaging stage
//! - [`manifest`] - The fixed list of shipped files
//! - [`output`] - Progress line formatting
//! - [`pipeline`] - Stage orchestration
//! - [`relocator`] - Moving the compiled installer into place
//! - [`stager`] - Copying inputs into the working directory

pub mod cli;
pub mod compiler;
pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod error;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod relocator;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
