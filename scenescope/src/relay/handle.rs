use std::sync::Arc;

use tokio::sync::mpsc::Sender;

use crate::{Envelope, Link, Message, PortId, Result, Source, TabId};

/// Everything the relay reacts to.
#[derive(Debug)]
pub enum RelayInput {
    /// A panel opened a channel; it is pending until it names its tab.
    PanelConnected(Link),
    PanelMessage { port: PortId, envelope: Envelope },
    PanelDisconnected(PortId),
    /// A page bridge announced itself for a tab.
    PageAttached { tab_id: TabId, link: Link },
    PageMessage { tab_id: TabId, envelope: Envelope },
    /// The bridge attached through `port` shut down.
    PageDetached { tab_id: TabId, port: PortId },
    TabClosed(TabId),
}

/// Cloneable entry point into the relay's mailbox.
///
/// Sends await mailbox capacity (backpressure) rather than dropping.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    sender: Sender<RelayInput>,
}

impl RelayHandle {
    pub(crate) fn new(sender: Sender<RelayInput>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, input: RelayInput) -> Result<()> {
        self.sender.send(input).await?;
        Ok(())
    }

    /// Open a panel channel delivering into `inbox`.
    pub async fn connect_panel<I>(&self, port: PortId, inbox: Sender<I>) -> Result<()>
    where
        I: From<Envelope> + Send + 'static,
    {
        self.send(RelayInput::PanelConnected(Link::new(port, inbox)))
            .await
    }

    /// Send a message from a panel, tagged as devtool-originated.
    pub async fn panel_message(&self, port: &PortId, message: Message) -> Result<()> {
        let sender: Arc<str> = Arc::from(port.name());
        self.send(RelayInput::PanelMessage {
            port: port.clone(),
            envelope: Envelope::new(message, Source::Devtool, sender),
        })
        .await
    }

    pub async fn disconnect_panel(&self, port: PortId) -> Result<()> {
        self.send(RelayInput::PanelDisconnected(port)).await
    }

    pub async fn attach_page<I>(&self, tab_id: TabId, port: PortId, inbox: Sender<I>) -> Result<()>
    where
        I: From<Envelope> + Send + 'static,
    {
        self.send(RelayInput::PageAttached {
            tab_id,
            link: Link::new(port, inbox),
        })
        .await
    }

    pub async fn page_message(&self, tab_id: TabId, envelope: Envelope) -> Result<()> {
        self.send(RelayInput::PageMessage { tab_id, envelope })
            .await
    }

    pub async fn detach_page(&self, tab_id: TabId, port: PortId) -> Result<()> {
        self.send(RelayInput::PageDetached { tab_id, port }).await
    }

    pub async fn close_tab(&self, tab_id: TabId) -> Result<()> {
        self.send(RelayInput::TabClosed(tab_id)).await
    }
}
