use std::sync::Arc;

use tokio::sync::mpsc::Sender;
use tracing::{debug, trace, warn};

use super::{PageWindow, WindowMessage};
use crate::{Component, Envelope, Error, PortId, Result, Source, TabId, relay::RelayHandle};

#[derive(Debug)]
pub enum BridgeInput {
    /// Traffic seen on the page window.
    Window(Envelope),
    /// An envelope delivered by the relay.
    Relay(Envelope),
}

impl From<WindowMessage> for BridgeInput {
    fn from(WindowMessage(envelope): WindowMessage) -> Self {
        BridgeInput::Window(envelope)
    }
}

impl From<Envelope> for BridgeInput {
    fn from(envelope: Envelope) -> Self {
        BridgeInput::Relay(envelope)
    }
}

/// Per-page forwarder between the window and the relay.
///
/// Only window traffic tagged by the page agent goes up to the relay;
/// everything from the relay is re-posted into the window under the
/// bridge's own tag.
pub struct PageBridge {
    name: Arc<str>,
    tab_id: TabId,
    port: PortId,
    relay: RelayHandle,
    window: PageWindow,
    inbox: Option<Sender<BridgeInput>>,
}

impl PageBridge {
    pub fn new(
        tab_id: TabId,
        relay: RelayHandle,
        window: PageWindow,
        inbox: Sender<BridgeInput>,
    ) -> Self {
        Self {
            name: Arc::from("content"),
            tab_id,
            port: PortId::new("content"),
            relay,
            window,
            inbox: Some(inbox),
        }
    }

    async fn from_window(&self, envelope: Envelope) -> Result<()> {
        if envelope.source != Source::InjectedToContent {
            trace!(tab_id = %self.tab_id, source = %envelope.source, "not forwarding window message");
            return Ok(());
        }
        self.relay.page_message(self.tab_id, envelope).await
    }

    fn from_relay(&self, envelope: Envelope) {
        trace!(tab_id = %self.tab_id, action = ?envelope.message.action(), "posting relay message to window");
        self.window
            .post(envelope.forward(Source::ContentToInjected, self.name.clone()));
    }
}

impl Component for PageBridge {
    type Input = BridgeInput;

    fn name(&self) -> &str {
        &self.name
    }

    async fn on_start(&mut self) -> Result<()> {
        if let Some(inbox) = self.inbox.take() {
            self.relay
                .attach_page(self.tab_id, self.port.clone(), inbox)
                .await?;
            debug!(tab_id = %self.tab_id, "bridge attached");
        }
        Ok(())
    }

    async fn handle(&mut self, input: BridgeInput) -> Result<()> {
        match input {
            BridgeInput::Window(envelope) => self.from_window(envelope).await,
            BridgeInput::Relay(envelope) => {
                self.from_relay(envelope);
                Ok(())
            }
        }
    }

    async fn on_shutdown(&mut self) -> Result<()> {
        if let Err(e) = self.relay.detach_page(self.tab_id, self.port.clone()).await {
            debug!(tab_id = %self.tab_id, error = %e, "relay gone before bridge detach");
        }
        Ok(())
    }

    fn on_error(&self, error: Error) -> Result<()> {
        warn!(tab_id = %self.tab_id, error = %error, "bridge error");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::{Message, relay::RelayInput};

    fn bridge(tab: TabId) -> (PageBridge, PageWindow, mpsc::Receiver<RelayInput>) {
        let (relay_tx, relay_rx) = mpsc::channel(8);
        let (tx, _rx) = mpsc::channel(8);
        let window = PageWindow::new(8);
        let bridge = PageBridge::new(tab, RelayHandle::new(relay_tx), window.clone(), tx);
        (bridge, window, relay_rx)
    }

    #[tokio::test]
    async fn test_attaches_on_start_and_detaches_on_shutdown() {
        let tab = TabId::new(3);
        let (mut bridge, _window, mut relay_rx) = bridge(tab);
        bridge.on_start().await.unwrap();
        let attached = match relay_rx.recv().await {
            Some(RelayInput::PageAttached { tab_id, link }) if tab_id == tab => link,
            other => panic!("expected PageAttached, got {other:?}"),
        };
        bridge.on_shutdown().await.unwrap();
        assert!(matches!(
            relay_rx.recv().await,
            Some(RelayInput::PageDetached { tab_id, port })
                if tab_id == tab && &port == attached.port()
        ));
    }

    #[tokio::test]
    async fn test_forwards_only_agent_traffic() {
        let tab = TabId::new(4);
        let (mut bridge, _window, mut relay_rx) = bridge(tab);

        for source in [
            Source::ContentToInjected,
            Source::Devtool,
            Source::Unrecognized("ad-script".into()),
        ] {
            let envelope = Envelope::new(Message::ContentInit, source, "page");
            bridge.handle(BridgeInput::Window(envelope)).await.unwrap();
        }
        assert!(relay_rx.try_recv().is_err());

        let envelope = Envelope::new(Message::ContentInit, Source::InjectedToContent, "agent");
        bridge.handle(BridgeInput::Window(envelope)).await.unwrap();
        match relay_rx.try_recv() {
            Ok(RelayInput::PageMessage { tab_id, envelope }) => {
                assert_eq!(tab_id, tab);
                assert_eq!(envelope.message, Message::ContentInit);
            }
            other => panic!("expected PageMessage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_relay_traffic_is_retagged_into_window() {
        let tab = TabId::new(5);
        let (mut bridge, window, _relay_rx) = bridge(tab);
        let mut rx = window.subscribe();

        let request = Envelope::new(Message::get_root(tab), Source::Background, "background");
        let request_id = request.meta.id();
        bridge.handle(BridgeInput::Relay(request)).await.unwrap();

        let WindowMessage(posted) = rx.recv().await.unwrap();
        assert_eq!(posted.source, Source::ContentToInjected);
        assert_eq!(posted.message, Message::get_root(tab));
        assert_eq!(posted.meta.correlation_id(), Some(request_id));
    }
}
