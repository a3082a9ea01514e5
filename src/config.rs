//! Step configuration.
//!
//! Defaults mirror the stock bootstrap: probe `bzt`, provision into a
//! `taurus-venv` virtualenv under the working directory, run against a
//! generated `defaultReport.yml`. A TOML file can override any field.

use crate::error::StepError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Performance-test tool binary.
pub const TOOL_COMMAND: &str = "bzt";
/// Diagnostic flag used for availability probes.
pub const HELP_FLAG: &str = "--help";
/// Environment-isolation helper binary.
pub const VIRTUALENV_COMMAND: &str = "virtualenv";
/// Isolated-environment directory, relative to the working directory.
pub const VENV_DIR: &str = "taurus-venv";
/// Filename the bundled default configuration is copied to.
pub const DEFAULT_CONFIG_FILE: &str = "defaultReport.yml";

/// Resolved configuration for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepConfig {
    /// Tool binary probed globally and installed into the venv.
    pub command: String,
    /// Isolated-environment directory, relative to the working directory.
    pub venv_dir: String,
    /// Filename for the materialized default configuration.
    pub config_filename: String,
    /// Bound on each spawned command's wait. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            command: TOOL_COMMAND.to_owned(),
            venv_dir: VENV_DIR.to_owned(),
            config_filename: DEFAULT_CONFIG_FILE.to_owned(),
            timeout: None,
        }
    }
}

/// TOML shadow of [`StepConfig`]; absent fields keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepConfigToml {
    command: Option<String>,
    venv_dir: Option<String>,
    config_filename: Option<String>,
    timeout_secs: Option<u64>,
}

impl StepConfig {
    /// Load configuration from a TOML file, falling back to defaults
    /// for absent fields. Unknown keys are rejected.
    pub fn load(path: &Path) -> Result<Self, StepError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StepError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: StepConfigToml =
            toml::from_str(&raw).map_err(|source| StepError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_toml(parsed))
    }

    fn from_toml(t: StepConfigToml) -> Self {
        let defaults = Self::default();
        Self {
            command: t.command.unwrap_or(defaults.command),
            venv_dir: t.venv_dir.unwrap_or(defaults.venv_dir),
            config_filename: t.config_filename.unwrap_or(defaults.config_filename),
            timeout: t.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Path of the tool inside the isolated environment.
    pub fn local_command(&self) -> String {
        format!("{}/bin/{}", self.venv_dir, self.command)
    }

    /// Argv probing the machine-wide tool installation.
    pub fn probe_global(&self) -> Vec<String> {
        vec![self.command.clone(), HELP_FLAG.to_owned()]
    }

    /// Argv probing the environment-isolation helper.
    pub fn probe_virtualenv(&self) -> Vec<String> {
        vec![VIRTUALENV_COMMAND.to_owned(), HELP_FLAG.to_owned()]
    }

    /// Argv creating the isolated environment.
    pub fn create_venv(&self) -> Vec<String> {
        vec![
            VIRTUALENV_COMMAND.to_owned(),
            "--clear".to_owned(),
            "--system-site-packages".to_owned(),
            self.venv_dir.clone(),
        ]
    }

    /// Argv installing the tool into the isolated environment.
    pub fn install_tool(&self) -> Vec<String> {
        vec![
            format!("{}/bin/pip", self.venv_dir),
            "--no-cache-dir".to_owned(),
            "install".to_owned(),
            self.command.clone(),
        ]
    }

    /// Argv probing the freshly installed tool inside the environment.
    pub fn probe_local(&self) -> Vec<String> {
        vec![self.local_command(), HELP_FLAG.to_owned()]
    }
}
