use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// Waiting for the runtime; the deadline is fixed at the first check.
    Probing { deadline: Option<Instant> },
    Ready,
    GaveUp,
}

/// Result of one readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The runtime just turned ready.
    BecameReady,
    /// Not ready yet; check again after this delay.
    StillWaiting(Duration),
    /// The deadline passed without the runtime turning ready.
    GaveUp,
    /// The probe already finished.
    Idle,
}

/// Readiness probe for the inspected runtime.
///
/// Checks at most every `interval` until `timeout` has elapsed since the
/// first check. A check landing exactly on the deadline is the last one.
#[derive(Debug, Clone)]
pub struct Probe {
    state: ProbeState,
    interval: Duration,
    timeout: Duration,
}

impl Probe {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            state: ProbeState::Probing { deadline: None },
            interval,
            timeout,
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProbeState::Ready
    }

    pub fn check(&mut self, initialized: bool) -> ProbeOutcome {
        let ProbeState::Probing { deadline } = self.state else {
            return ProbeOutcome::Idle;
        };
        if initialized {
            self.state = ProbeState::Ready;
            return ProbeOutcome::BecameReady;
        }
        let now = Instant::now();
        let deadline = deadline.unwrap_or(now + self.timeout);
        if now >= deadline {
            self.state = ProbeState::GaveUp;
            return ProbeOutcome::GaveUp;
        }
        self.state = ProbeState::Probing {
            deadline: Some(deadline),
        };
        ProbeOutcome::StillWaiting(self.interval.min(deadline - now))
    }
}
