use std::future::Future;

use tokio::{
    select,
    sync::{
        broadcast::{self, error::RecvError},
        mpsc::Sender,
    },
};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::{Envelope, Result};

/// An envelope as seen on the page window.
#[derive(Debug, Clone)]
pub struct WindowMessage(pub Envelope);

/// The page's shared message bus.
///
/// Every post reaches every listener, the poster included, and any script
/// on the page may post. Listeners tell traffic apart by source tag only.
#[derive(Debug, Clone)]
pub struct PageWindow {
    tx: broadcast::Sender<WindowMessage>,
}

impl PageWindow {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Post an envelope to everyone listening. Posting to an empty window
    /// is not an error.
    pub fn post(&self, envelope: Envelope) {
        if self.tx.send(WindowMessage(envelope)).is_err() {
            trace!("window has no listeners");
        }
    }

    /// Post raw JSON text, as a foreign script would.
    pub fn post_json(&self, json: &str) -> Result<()> {
        self.post(Envelope::from_json(json)?);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WindowMessage> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Pump window traffic into a component mailbox until cancelled.
    ///
    /// The subscription is taken when this is called, not when the returned
    /// future is first polled, so nothing posted in between is missed.
    pub fn listener<I>(
        &self,
        inbox: Sender<I>,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<()>> + Send + 'static
    where
        I: From<WindowMessage> + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        async move {
            loop {
                select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(message) => {
                            if inbox.send(I::from(message)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "window listener lagged behind");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            Ok(())
        }
    }
}
