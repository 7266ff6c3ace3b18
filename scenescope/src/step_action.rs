use std::time::Duration;

/// Returned by [`Component::step`](crate::Component::step) to schedule the
/// next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Step again as soon as pending input has been handled.
    Continue,
    /// Sleep before the next step. This is how fixed-interval timers (the
    /// handshake retry, the readiness probe) are expressed.
    Backoff(Duration),
    /// Pause stepping until the next input arrives.
    AwaitEvent,
    /// Cancel the timer; the component only reacts to input from now on.
    Never,
}
