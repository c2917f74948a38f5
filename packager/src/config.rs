//! Layered packager configuration.
//!
//! Settings resolve in order of precedence: command-line flags, environment
//! variables, the optional TOML file named by `--config`, then built-in
//! defaults. Nothing here touches the staging directory.

use crate::cli::Cli;
use crate::compiler::DEFAULT_MAKENSIS;
use crate::definition::DEFAULT_VERSION_MARKER;
use crate::error::{PackagerError, Result};
use crate::stager::Resources;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;

/// Environment variable naming the installer compiler.
pub const MAKENSIS_ENV: &str = "BLAST_MAKENSIS";

/// Environment variable holding the compiler timeout in seconds.
pub const TIMEOUT_ENV: &str = "BLAST_PACKAGER_TIMEOUT";

/// Settings accepted in the TOML configuration file.
///
/// # Example
///
/// ```toml
/// makensis = 'C:\Program Files (x86)\NSIS\makensis.exe'
/// timeout_secs = 900
/// resource_dir = 'C:\src\blast\post_build\win'
/// version_marker = "!define PRODUCT_VERSION"
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Installer compiler executable.
    pub makensis: Option<String>,
    /// Compiler timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Directory holding the definition file and auxiliary assets.
    pub resource_dir: Option<String>,
    /// Directory holding the licence and privacy notice.
    pub licence_dir: Option<String>,
    /// Prefix of the version line in the definition file.
    pub version_marker: Option<String>,
}

impl FileConfig {
    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfig`] if the file cannot be read or
    /// is not valid configuration TOML.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| PackagerError::InvalidConfig {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;
        parse_file_config(&contents).map_err(|reason| PackagerError::InvalidConfig {
            path: path.to_owned(),
            reason,
        })
    }
}

/// Parse configuration TOML.
///
/// # Errors
///
/// Returns the parser's message when `contents` is not valid configuration,
/// or when `timeout_secs` is zero.
pub fn parse_file_config(contents: &str) -> std::result::Result<FileConfig, String> {
    let config: FileConfig = toml::from_str(contents).map_err(|e| e.message().to_owned())?;
    if config.timeout_secs == Some(0) {
        return Err("timeout_secs must be at least 1".to_owned());
    }
    Ok(config)
}

/// Fully resolved settings for one packaging run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackagerConfig {
    /// Installer compiler executable.
    pub makensis: String,
    /// Compiler timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Locations of the fixed packaging assets.
    pub resources: Resources,
    /// Prefix of the version line in the definition file.
    pub version_marker: String,
}

impl PackagerConfig {
    /// Resolve configuration for `cli`, reading the process environment, the
    /// optional config file and the executable's location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is invalid, an environment value is
    /// unusable, or the executable's directory cannot be determined.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::from_layers(cli, file, executable_dir)
    }

    /// Combine the CLI, environment and file layers.
    ///
    /// `default_resource_dir` is only consulted when no layer names a
    /// resource directory.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidEnv`] for an unparsable timeout, or
    /// whatever `default_resource_dir` reports.
    pub fn from_layers(
        cli: &Cli,
        file: FileConfig,
        default_resource_dir: impl FnOnce() -> Result<Utf8PathBuf>,
    ) -> Result<Self> {
        let makensis = cli
            .makensis
            .clone()
            .or_else(|| env_value(MAKENSIS_ENV))
            .or(file.makensis)
            .unwrap_or_else(|| DEFAULT_MAKENSIS.to_owned());

        let timeout_secs = match cli.timeout {
            Some(secs) => Some(secs),
            None => env_timeout()?.or(file.timeout_secs),
        };

        let resource_dir = match cli
            .resources
            .clone()
            .or_else(|| file.resource_dir.map(Utf8PathBuf::from))
        {
            Some(dir) => dir,
            None => default_resource_dir()?,
        };
        let licence_dir = cli
            .licence_dir
            .clone()
            .or_else(|| file.licence_dir.map(Utf8PathBuf::from));
        let resources = match licence_dir {
            Some(dir) => Resources::new(resource_dir, dir),
            None => Resources::from_resource_dir(resource_dir),
        };

        Ok(Self {
            makensis,
            timeout: timeout_secs.map(Duration::from_secs),
            resources,
            version_marker: file
                .version_marker
                .unwrap_or_else(|| DEFAULT_VERSION_MARKER.to_owned()),
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn env_timeout() -> Result<Option<u64>> {
    env_value(TIMEOUT_ENV)
        .map(|raw| {
            let secs = raw.trim().parse::<u64>().map_err(|e| PackagerError::InvalidEnv {
                name: TIMEOUT_ENV,
                reason: format!("{raw:?} is not a number of seconds: {e}"),
            })?;
            if secs == 0 {
                return Err(PackagerError::InvalidEnv {
                    name: TIMEOUT_ENV,
                    reason: "timeout must be at least 1 second".to_owned(),
                });
            }
            Ok(secs)
        })
        .transpose()
}

/// Directory containing the running executable.
///
/// # Errors
///
/// Returns an error if the executable path cannot be determined or is not
/// valid UTF-8.
pub fn executable_dir() -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = Utf8PathBuf::try_from(exe).map_err(|e| PackagerError::NonUtf8Path {
        what: "executable path",
        path: e.into_path_buf().display().to_string(),
    })?;
    Ok(exe
        .parent()
        .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_owned))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
