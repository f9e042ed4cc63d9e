//! Daemon configuration
//!
//! Loaded from `~/.config/loadring/config.toml` (or the path given on the
//! command line). A missing file means defaults. Every key is optional:
//!
//! ```toml
//! device_path = "/proc/acpi/nuc_led"
//! loadavg_path = "/proc/loadavg"
//! interval_secs = 5
//! cores = 4
//! retry_failed_writes = false
//!
//! [[rules]]
//! threshold = 0.5
//! color = "green"
//! brightness = 80
//!
//! [[rules]]
//! threshold = 0
//! color = "red"
//! brightness = 100
//! blink = "fade_fast"
//! ```
//!
//! Rule thresholds are per core, like the built-in table; the last rule is
//! the fallback.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::device::NUC_LED_PATH;
use crate::error::ConfigError;
use crate::policy::{self, ColorPolicy, Rule, DEFAULT_RULES};
use crate::sampler::LOADAVG_PATH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ring control file
    pub device_path: PathBuf,
    /// Load average source
    pub loadavg_path: PathBuf,
    /// Seconds between samples
    pub interval_secs: u64,
    /// Core count override; detected when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<usize>,
    /// Keep writing a state until the device accepts it
    pub retry_failed_writes: bool,
    /// Per-core policy table, fallback last
    pub rules: Vec<Rule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(NUC_LED_PATH),
            loadavg_path: PathBuf::from(LOADAVG_PATH),
            interval_secs: 5,
            cores: None,
            retry_failed_writes: false,
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("loadring")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate config text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Interval);
        }
        // Catches table and core-count problems at load time
        self.policy().map(|_| ())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Configured core count, or the detected one.
    pub fn cores(&self) -> usize {
        self.cores.unwrap_or_else(policy::detect_cores)
    }

    /// Build the scaled policy table.
    pub fn policy(&self) -> Result<ColorPolicy, ConfigError> {
        ColorPolicy::build(&self.rules, self.cores())
    }
}
