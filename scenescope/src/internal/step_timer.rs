use std::{pin::Pin, time::Duration};

use tokio::time::{Instant, Sleep, sleep_until};

use crate::StepAction;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Pause {
    #[default]
    None,
    AwaitEvent,
    Cancelled,
}

/// Schedules a component's `step` calls.
#[derive(Default)]
pub(crate) struct StepTimer {
    deadline: Option<Pin<Box<Sleep>>>,
    pause: Pause,
}

impl StepTimer {
    pub fn schedule(&mut self, action: StepAction) {
        match action {
            StepAction::Continue => self.arm(Duration::ZERO),
            StepAction::Backoff(delay) => self.arm(delay),
            StepAction::AwaitEvent => self.park(Pause::AwaitEvent),
            StepAction::Never => self.park(Pause::Cancelled),
        }
    }

    /// An input arrived; resume a timer waiting for one.
    pub fn on_event(&mut self) {
        if self.pause == Pause::AwaitEvent {
            self.arm(Duration::ZERO);
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves when the armed deadline passes; never resolves otherwise.
    pub async fn expired(&mut self) {
        match self.deadline.as_mut() {
            Some(deadline) => {
                deadline.as_mut().await;
                self.deadline = None;
            }
            None => std::future::pending().await,
        }
    }

    fn arm(&mut self, delay: Duration) {
        self.pause = Pause::None;
        self.deadline = Some(Box::pin(sleep_until(Instant::now() + delay)));
    }

    fn park(&mut self, pause: Pause) {
        self.pause = pause;
        self.deadline = None;
    }
}
