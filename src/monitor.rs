//! Sampling loop: load -> policy -> ring, writing only on change.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::device::RingDevice;
use crate::policy::{ColorPolicy, Rule};
use crate::sampler::LoadSampler;
use crate::shutdown::{self, Signal};

/// Default time between samples
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Result of a single evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Load could not be read or parsed; nothing written
    SampleFailed,
    /// Resolved rule equals the previous one; nothing written
    Unchanged,
    Written,
    /// Device write failed
    WriteFailed,
}

/// Periodic load monitor driving a ring device
pub struct Monitor<S, D> {
    sampler: S,
    device: D,
    policy: ColorPolicy,
    interval: Duration,
    retry_failed_writes: bool,
    /// Last rule handed to the device; `None` until the first write.
    previous: Option<Rule>,
}

impl<S: LoadSampler, D: RingDevice> Monitor<S, D> {
    pub fn new(sampler: S, device: D, policy: ColorPolicy) -> Self {
        Self {
            sampler,
            device,
            policy,
            interval: DEFAULT_INTERVAL,
            retry_failed_writes: false,
            previous: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// When set, a failed write leaves the previous state untouched so the
    /// next tick writes again. Off by default: a failed write counts as applied.
    pub fn with_retry_failed_writes(mut self, retry: bool) -> Self {
        self.retry_failed_writes = retry;
        self
    }

    pub fn policy(&self) -> &ColorPolicy {
        &self.policy
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn previous(&self) -> Option<&Rule> {
        self.previous.as_ref()
    }

    /// Sample once, resolve, and write if the resolved rule changed.
    pub fn tick(&mut self) -> TickOutcome {
        let load = match self.sampler.sample() {
            Ok(load) => load,
            Err(e) => {
                warn!("Load sample failed: {}", e);
                return TickOutcome::SampleFailed;
            }
        };

        let rule = *self.policy.resolve(load);
        if self.previous == Some(rule) {
            debug!(load, "Ring state unchanged");
            return TickOutcome::Unchanged;
        }

        info!(load, state = %rule.state, "Ring state changed");
        match self.device.apply(&rule.state) {
            Ok(()) => {
                self.previous = Some(rule);
                TickOutcome::Written
            }
            Err(e) => {
                warn!("Ring write failed: {}", e);
                if !self.retry_failed_writes {
                    self.previous = Some(rule);
                }
                TickOutcome::WriteFailed
            }
        }
    }

    /// Tick every interval until `shutdown` resolves, then switch the ring off.
    ///
    /// The first tick runs immediately. Returns the signal that ended the loop.
    pub async fn run<F>(&mut self, shutdown: F) -> Signal
    where
        F: Future<Output = Signal>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                signal = &mut shutdown => {
                    shutdown::teardown(&mut self.device, signal);
                    return signal;
                }
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }
    }
}
