use tokio::{select, sync::mpsc::Receiver};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::StepTimer;
use crate::{Component, Result, StepAction};

/// Runs one component on its task: feeds it mailbox input, steps it on its
/// timer, and stops on cancellation or when every sender is gone.
pub(crate) struct Driver<C: Component> {
    component: C,
    mailbox: Receiver<C::Input>,
    cancel_token: CancellationToken,
    timer: StepTimer,
}

impl<C: Component> Driver<C> {
    pub fn new(component: C, mailbox: Receiver<C::Input>, cancel_token: CancellationToken) -> Self {
        Self {
            component,
            mailbox,
            cancel_token,
            timer: StepTimer::default(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.component.on_start().await?;
        self.timer.schedule(StepAction::Continue);

        loop {
            select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                input = self.mailbox.recv() => {
                    let Some(input) = input else {
                        break;
                    };
                    if let Err(e) = self.component.handle(input).await {
                        self.component.on_error(e)?;
                    }
                    self.timer.on_event();
                }
                _ = self.timer.expired() => {
                    let action = match self.component.step().await {
                        Ok(action) => action,
                        Err(e) => {
                            self.component.on_error(e)?;
                            StepAction::AwaitEvent
                        }
                    };
                    self.timer.schedule(action);
                }
            }
        }

        debug!(component = self.component.name(), "component stopping");
        self.component.on_shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::Error;

    struct Ticker {
        steps: u32,
        seen: Vec<u32>,
        done: Option<tokio::sync::oneshot::Sender<(u32, Vec<u32>)>>,
    }

    impl Component for Ticker {
        type Input = u32;

        fn name(&self) -> &str {
            "ticker"
        }

        async fn handle(&mut self, input: u32) -> Result<()> {
            if input == 0 {
                return Err(Error::External("zero".into()));
            }
            self.seen.push(input);
            Ok(())
        }

        async fn step(&mut self) -> Result<StepAction> {
            self.steps += 1;
            if self.steps < 3 {
                Ok(StepAction::Backoff(Duration::from_secs(1)))
            } else {
                Ok(StepAction::Never)
            }
        }

        async fn on_shutdown(&mut self) -> Result<()> {
            if let Some(done) = self.done.take() {
                let _ = done.send((self.steps, std::mem::take(&mut self.seen)));
            }
            Ok(())
        }

        fn on_error(&self, _error: Error) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_on_timer_and_handles_input() {
        let (tx, rx) = mpsc::channel(8);
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let token = CancellationToken::new();
        let ticker = Ticker {
            steps: 0,
            seen: vec![],
            done: Some(done_tx),
        };
        let task = tokio::spawn(Driver::new(ticker, rx, token.clone()).run());

        tx.send(1).await.unwrap();
        tx.send(0).await.unwrap();
        tx.send(2).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        token.cancel();
        task.await.unwrap().unwrap();

        let (steps, seen) = done_rx.await.unwrap();
        assert_eq!(steps, 3);
        assert_eq!(seen, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_stops_when_senders_are_gone() {
        let (tx, rx) = mpsc::channel::<u32>(1);
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let ticker = Ticker {
            steps: 3,
            seen: vec![],
            done: Some(done_tx),
        };
        drop(tx);
        Driver::new(ticker, rx, CancellationToken::new())
            .run()
            .await
            .unwrap();
        assert!(done_rx.await.is_ok());
    }
}
