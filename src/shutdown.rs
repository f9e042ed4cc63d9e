//! Termination signal handling and the final "ring off" write.

use std::fmt;
use std::io;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use crate::device::RingDevice;
use crate::state::VisualState;

/// Signal that ended the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register SIGINT/SIGTERM handlers and return a future resolving on the first one.
///
/// Registration happens before the future is returned, so signals delivered
/// while the monitor loop starts up are not lost.
pub fn wait_for_signal() -> io::Result<impl std::future::Future<Output = Signal>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => Signal::Interrupt,
            _ = terminate.recv() => Signal::Terminate,
        }
    })
}

/// Switch the ring off. Best effort: a failed write is only logged.
pub fn teardown<D: RingDevice>(device: &mut D, signal: Signal) {
    info!(%signal, "Shutting down");
    if let Err(e) = device.apply(&VisualState::OFF) {
        warn!("Final ring write failed: {}", e);
    }
}
