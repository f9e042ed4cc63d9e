//! Error types for sampling, device writes and configuration

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading the load average source
#[derive(Error, Debug)]
pub enum SampleError {
    /// Load source could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// First field missing or not a number
    #[error("Malformed load data: {input:?}")]
    Parse { input: String },
}

/// Device control path could not be written
#[derive(Error, Debug)]
#[error("Failed to write {}: {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Errors from loading or validating the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Rule table is empty")]
    EmptyTable,

    /// A non-fallback rule has a lower threshold than the rule before it
    #[error("Rule {index} threshold is lower than the previous rule's")]
    Unsorted { index: usize },

    #[error("Rule {index} brightness {value} is out of range (0-100)")]
    Brightness { index: usize, value: u8 },

    #[error("Rule {index} threshold must be a finite number")]
    Threshold { index: usize },

    #[error("Interval must be at least one second")]
    Interval,

    #[error("Core count must be greater than zero")]
    Cores,
}
