//! The inspector panel: handshake retry and tree rendering.

mod renderer;

pub use renderer::{Renderer, WatchRenderer};

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::Sender;
use tracing::{debug, info, trace, warn};

use crate::{
    Component, Envelope, Error, Label, Message, PortId, Result, StepAction, TabId,
    relay::RelayHandle,
};

/// Panel mailbox input.
#[derive(Debug)]
pub enum PanelInput {
    /// The panel became visible.
    Shown,
    /// An envelope delivered by the relay.
    Relay(Envelope),
}

impl From<Envelope> for PanelInput {
    fn from(envelope: Envelope) -> Self {
        PanelInput::Relay(envelope)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Inspector panel bound to one tab.
///
/// Once shown it keeps sending `DevtoolInit` every handshake interval until
/// the relay reports the tab ready, then asks for the root tree. The retry
/// never gives up.
pub struct Panel<V: Renderer> {
    name: Arc<str>,
    tab_id: TabId,
    port: PortId,
    relay: RelayHandle,
    inbox: Option<Sender<PanelInput>>,
    renderer: V,
    state: PanelState,
    interval: Duration,
    shown: bool,
}

impl<V: Renderer> Panel<V> {
    /// `inbox` is the sending half of this panel's own mailbox; it is handed
    /// to the relay on start.
    pub fn new(
        tab_id: TabId,
        relay: RelayHandle,
        inbox: Sender<PanelInput>,
        renderer: V,
        interval: Duration,
    ) -> Self {
        Self {
            name: Arc::from("devtool"),
            tab_id,
            port: PortId::new("devtool"),
            relay,
            inbox: Some(inbox),
            renderer,
            state: PanelState::Disconnected,
            interval,
            shown: false,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn port(&self) -> &PortId {
        &self.port
    }

    async fn on_shown(&mut self) -> Result<()> {
        self.shown = true;
        match self.state {
            PanelState::Disconnected => {
                debug!(tab_id = %self.tab_id, "panel shown; starting handshake");
                self.state = PanelState::Connecting;
            }
            PanelState::Connecting => trace!(tab_id = %self.tab_id, "handshake already running"),
            PanelState::Connected if !self.renderer.has_root() => self.request_root().await?,
            PanelState::Connected => {}
        }
        Ok(())
    }

    async fn on_relay(&mut self, envelope: Envelope) -> Result<()> {
        match envelope.message {
            Message::DevtoolContentReady => self.on_ready().await,
            Message::GetRoot {
                content: Some(root),
                ..
            } => {
                debug!(tab_id = %self.tab_id, nodes = root.count(), "received tree");
                self.renderer.set_root(root);
                Ok(())
            }
            Message::Unknown => {
                trace!(tab_id = %self.tab_id, "ignoring unrecognized action");
                Ok(())
            }
            other => {
                trace!(tab_id = %self.tab_id, action = %other.label(), "ignoring relay message");
                Ok(())
            }
        }
    }

    async fn on_ready(&mut self) -> Result<()> {
        if self.state == PanelState::Connected {
            trace!(tab_id = %self.tab_id, "duplicate readiness");
            return Ok(());
        }
        info!(tab_id = %self.tab_id, "connected");
        self.state = PanelState::Connected;
        if self.shown {
            self.request_root().await?;
        }
        Ok(())
    }

    async fn request_root(&mut self) -> Result<()> {
        debug!(tab_id = %self.tab_id, "requesting root");
        self.relay
            .panel_message(&self.port, Message::get_root(self.tab_id))
            .await
    }
}

impl<V: Renderer> Component for Panel<V> {
    type Input = PanelInput;

    fn name(&self) -> &str {
        &self.name
    }

    async fn on_start(&mut self) -> Result<()> {
        if let Some(inbox) = self.inbox.take() {
            self.relay.connect_panel(self.port.clone(), inbox).await?;
        }
        Ok(())
    }

    async fn handle(&mut self, input: PanelInput) -> Result<()> {
        match input {
            PanelInput::Shown => self.on_shown().await,
            PanelInput::Relay(envelope) => self.on_relay(envelope).await,
        }
    }

    async fn step(&mut self) -> Result<StepAction> {
        match self.state {
            PanelState::Disconnected => Ok(StepAction::AwaitEvent),
            PanelState::Connecting => {
                trace!(tab_id = %self.tab_id, "sending DevtoolInit");
                self.relay
                    .panel_message(&self.port, Message::devtool_init(self.tab_id))
                    .await?;
                Ok(StepAction::Backoff(self.interval))
            }
            PanelState::Connected => Ok(StepAction::Never),
        }
    }

    async fn on_shutdown(&mut self) -> Result<()> {
        if let Err(e) = self.relay.disconnect_panel(self.port.clone()).await {
            debug!(tab_id = %self.tab_id, error = %e, "relay gone before panel close");
        }
        Ok(())
    }

    fn on_error(&self, error: Error) -> Result<()> {
        warn!(tab_id = %self.tab_id, error = %error, "panel error");
        Ok(())
    }
}
