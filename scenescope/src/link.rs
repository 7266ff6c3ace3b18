use std::{fmt, sync::Arc};

use tokio::sync::mpsc::Sender;

use crate::{Envelope, Error, PortId, Result};

type Deliver = dyn Fn(Envelope) -> Result<()> + Send + Sync;

/// Sending half of one hop, as held by the relay.
///
/// A link wraps a component's mailbox so the relay can post envelopes to a
/// panel or a page bridge without knowing their input types. Posting never
/// waits: a full mailbox fails with [`Error::ChannelIsFull`] and a closed one
/// with [`Error::ChannelClosed`], so one stuck endpoint cannot stall the
/// relay.
#[derive(Clone)]
pub struct Link {
    port: PortId,
    deliver: Arc<Deliver>,
}

impl Link {
    pub fn new<I>(port: PortId, sender: Sender<I>) -> Self
    where
        I: From<Envelope> + Send + 'static,
    {
        Self {
            port,
            deliver: Arc::new(move |envelope| {
                sender.try_send(I::from(envelope)).map_err(Error::from)
            }),
        }
    }

    #[inline]
    pub fn port(&self) -> &PortId {
        &self.port
    }

    pub fn post(&self, envelope: Envelope) -> Result<()> {
        (self.deliver)(envelope)
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link").field("port", &self.port).finish()
    }
}
