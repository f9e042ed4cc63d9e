//! LED ring control through the nuc_led ACPI driver.
//!
//! The driver accepts one textual command per write:
//! `ring,<brightness>,<blink>,<color>`. Every write replaces the previous
//! ring state, so the file is always truncated rather than appended to.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::WriteError;
use crate::state::VisualState;

/// Default driver control file
pub const NUC_LED_PATH: &str = "/proc/acpi/nuc_led";

/// Something that can display a [`VisualState`]
pub trait RingDevice {
    /// Apply `state`. Failures are reported, never retried here.
    fn apply(&mut self, state: &VisualState) -> Result<(), WriteError>;
}

/// Format the driver command for `state`.
pub fn format_command(state: &VisualState) -> String {
    format!(
        "ring,{},{},{}",
        state.brightness,
        state.blink.as_str(),
        state.color.as_str()
    )
}

/// Ring LED behind a nuc_led-style control file
#[derive(Debug, Clone)]
pub struct NucLedDevice {
    path: PathBuf,
}

impl NucLedDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_command(&self, command: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(command.as_bytes())?;
        Ok(())
    }
}

impl Default for NucLedDevice {
    fn default() -> Self {
        Self::new(NUC_LED_PATH)
    }
}

impl RingDevice for NucLedDevice {
    fn apply(&mut self, state: &VisualState) -> Result<(), WriteError> {
        self.write_command(&format_command(state))
            .map_err(|source| WriteError {
                path: self.path.clone(),
                source,
            })
    }
}
