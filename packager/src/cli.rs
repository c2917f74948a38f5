//! CLI argument definitions for the BLAST Windows packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;

/// Build the NSIS installer for the BLAST command-line applications.
#[derive(Parser, Debug, Clone)]
#[command(name = "blast-win-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build the NSIS installer for the BLAST command-line applications.\n\n",
    "Copies the BLAST binaries from <INSTALL_DIR>/bin into the working directory ",
    "together with the installer definition, licence, privacy notice and ",
    "auxiliary assets, sets the version in the definition, runs makensis, and ",
    "copies the resulting installer into <INSTALL_DIR>/installer.",
))]
#[command(after_help = concat!(
    "CONFIGURATION:\n",
    "  Settings are taken from, in order of precedence: command-line flags,\n",
    "  the BLAST_MAKENSIS and BLAST_PACKAGER_TIMEOUT environment variables,\n",
    "  the --config TOML file, and built-in defaults.\n\n",
    "EXAMPLES:\n",
    "  Package release 2.15.0 from the current build tree:\n",
    "    $ blast-win-packager 2.15.0 C:\\build\\blast\n\n",
    "  Use a specific NSIS installation and report each copy:\n",
    "    $ blast-win-packager -v --makensis \"C:\\NSIS\\makensis.exe\" 2.15.0 C:\\build\\blast",
))]
pub struct Cli {
    /// Version string written into the installer definition.
    #[arg(value_name = "VERSION")]
    pub release_version: String,

    /// Installation directory containing `bin/`; receives `installer/`.
    #[arg(value_name = "INSTALL_DIR")]
    pub install_dir: Utf8PathBuf,

    /// Show each copy operation and the compiler's output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Staging directory [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<Utf8PathBuf>,

    /// Directory holding the installer definition and auxiliary assets
    /// [default: directory of this executable].
    #[arg(long, value_name = "DIR")]
    pub resources: Option<Utf8PathBuf>,

    /// Directory holding LICENSE and `BLAST_PRIVACY` [default: two levels above
    /// the resource directory].
    #[arg(long, value_name = "DIR")]
    pub licence_dir: Option<Utf8PathBuf>,

    /// Installer compiler executable [default: makensis on PATH].
    #[arg(long, value_name = "PATH")]
    pub makensis: Option<String>,

    /// Abort the installer compiler after this many seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Print every file below the working directory before staging.
    #[arg(long)]
    pub list_work_dir: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
