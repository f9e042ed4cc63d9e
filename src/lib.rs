// loadring - load average indicator for the Intel NUC LED ring
// Load sampling, color policy, ring device and the monitor loop

pub mod config;
pub mod device;
pub mod error;
pub mod monitor;
pub mod policy;
pub mod sampler;
pub mod shutdown;
pub mod state;

pub use config::Config;
pub use device::{format_command, NucLedDevice, RingDevice};
pub use error::{ConfigError, SampleError, WriteError};
pub use monitor::{Monitor, TickOutcome};
pub use policy::{ColorPolicy, Rule, DEFAULT_RULES};
pub use sampler::{parse_loadavg, LoadSampler, ProcLoadAvg};
pub use shutdown::Signal;
pub use state::{BlinkPattern, RingColor, VisualState};
