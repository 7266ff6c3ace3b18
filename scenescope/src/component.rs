use std::future::Future;

use crate::{Error, Result, StepAction};

/// A state machine confined to one execution context.
///
/// The relay, the page bridge, the page agent and the panel are all
/// components. Each runs on its own task and owns its state; the only way to
/// reach it is its mailbox. The runtime driver feeds inputs to
/// [`handle`](Component::handle) one at a time and calls
/// [`step`](Component::step) whenever the timer the component asked for
/// expires.
///
/// Ergonomics:
/// - The trait methods return futures, so implement them as `async fn`.
/// - No `#[async_trait]` is required.
pub trait Component: Send + 'static {
    type Input: Send + 'static;

    /// Name used in envelopes and log lines.
    fn name(&self) -> &str;

    /// Handle a single input from the mailbox.
    fn handle(&mut self, input: Self::Input) -> impl Future<Output = Result<()>> + Send;

    /// Timer-driven work.
    ///
    /// Called once right after [`on_start`](Component::on_start) and then
    /// according to the returned [`StepAction`]. The default does nothing and
    /// cancels the timer.
    fn step(&mut self) -> impl Future<Output = Result<StepAction>> + Send {
        async { Ok(StepAction::Never) }
    }

    /// Lifecycle hook called once before the first input.
    fn on_start(&mut self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Lifecycle hook called once after the loop stops.
    fn on_shutdown(&mut self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Called when [`handle`](Component::handle) or [`step`](Component::step)
    /// fails.
    ///
    /// Return `Ok(())` to swallow the error and continue, or `Err(error)` to
    /// stop the component. By default all errors propagate.
    fn on_error(&self, error: Error) -> Result<()> {
        Err(error)
    }
}
