//! The privileged broker between inspector panels and pages.
//!
//! The relay is the only component with multi-tab state. It binds panel
//! channels to tabs, tracks each page's readiness, gates the handshake and
//! forwards requests and replies between the two sides.

mod handle;
mod session;

pub use handle::{RelayHandle, RelayInput};
pub use session::{Session, SessionRegistry};

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, trace, warn};

use crate::{Component, Envelope, Error, Label, Link, Message, PortId, Result, Source, TabId};

pub struct Relay {
    name: Arc<str>,
    pending: HashMap<PortId, Link>,
    sessions: SessionRegistry,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

impl Relay {
    pub fn new() -> Self {
        Self {
            name: Arc::from("background"),
            pending: HashMap::new(),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Number of connected panel channels, bound or not.
    pub fn connected_panels(&self) -> usize {
        self.pending.len()
    }

    fn on_panel_connect(&mut self, link: Link) {
        debug!(port = %link.port(), "panel connected");
        self.pending.insert(link.port().clone(), link);
    }

    fn on_panel_message(&mut self, port: PortId, envelope: Envelope) {
        match envelope.message {
            Message::DevtoolInit { tab_id } => {
                let Some(link) = self.pending.get(&port).cloned() else {
                    warn!(%port, %tab_id, "DevtoolInit from a port that is not connected");
                    return;
                };
                debug!(%port, %tab_id, "devtool trying to init");
                if let Some(previous) = self.sessions.bind_panel(tab_id, link) {
                    if previous.port() != &port {
                        info!(%tab_id, old = %previous.port(), new = %port, "panel binding replaced");
                    }
                }
                self.notify_ready(tab_id);
            }
            Message::GetRoot {
                tab_id: Some(tab_id),
                ..
            } => {
                let Some(page) = self.sessions.page(tab_id) else {
                    warn!(%port, %tab_id, "no page session for tab; dropping GetRoot");
                    return;
                };
                let request = envelope.forward(Source::Background, self.name.clone());
                if let Err(e) = page.post(request) {
                    warn!(%tab_id, error = %e, "couldn't forward GetRoot to page");
                }
            }
            Message::GetRoot { tab_id: None, .. } => {
                warn!(%port, "GetRoot without a tab id; dropping");
            }
            Message::ContentInit | Message::DevtoolContentReady => {
                debug!(%port, action = %envelope.message.label(), "ignoring page-only action from panel");
            }
            Message::Unknown => trace!(%port, "ignoring unrecognized action"),
        }
    }

    fn on_panel_disconnect(&mut self, port: PortId) {
        self.pending.remove(&port);
        let tabs = self.sessions.unbind_port(&port);
        debug!(%port, ?tabs, "panel disconnected");
    }

    fn on_page_message(&mut self, tab_id: TabId, envelope: Envelope) {
        if envelope.source != Source::InjectedToContent {
            trace!(%tab_id, source = %envelope.source, "dropping page message of foreign origin");
            return;
        }
        match envelope.message {
            Message::ContentInit => {
                debug!(%tab_id, "content trying to init");
                self.sessions.mark_page_ready(tab_id);
                self.notify_ready(tab_id);
            }
            Message::Unknown => trace!(%tab_id, "ignoring unrecognized action"),
            _ => {
                let Some(panel) = self.sessions.panel(tab_id) else {
                    debug!(%tab_id, action = %envelope.message.label(), "tab not found in connection list");
                    return;
                };
                if let Err(e) = panel.post(envelope) {
                    self.drop_panel(tab_id, e);
                }
            }
        }
    }

    /// Readiness rule: a bound panel and a ready page get told about each
    /// other. Fires again on every redundant trigger.
    fn notify_ready(&mut self, tab_id: TabId) {
        let Some(session) = self.sessions.get(tab_id).filter(|s| s.is_ready()) else {
            return;
        };
        info!(%tab_id, "devtool and content ready");
        let ready = Envelope::new(
            Message::DevtoolContentReady,
            Source::Background,
            self.name.clone(),
        );
        if let Some(page) = session.page() {
            if let Err(e) = page.post(ready.clone()) {
                warn!(%tab_id, error = %e, "couldn't notify page of readiness");
            }
        }
        let panel_result = session.panel().map(|panel| panel.post(ready));
        if let Some(Err(e)) = panel_result {
            self.drop_panel(tab_id, e);
        }
    }

    fn drop_panel(&mut self, tab_id: TabId, error: Error) {
        match error {
            Error::ChannelClosed => {
                warn!(%tab_id, "panel channel closed; unbinding");
                if let Some(link) = self.sessions.unbind_panel(tab_id) {
                    self.pending.remove(link.port());
                }
            }
            e => warn!(%tab_id, error = %e, "couldn't deliver to panel"),
        }
    }
}

impl Component for Relay {
    type Input = RelayInput;

    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&mut self, input: RelayInput) -> Result<()> {
        match input {
            RelayInput::PanelConnected(link) => self.on_panel_connect(link),
            RelayInput::PanelMessage { port, envelope } => self.on_panel_message(port, envelope),
            RelayInput::PanelDisconnected(port) => self.on_panel_disconnect(port),
            RelayInput::PageAttached { tab_id, link } => {
                debug!(%tab_id, port = %link.port(), "page attached");
                self.sessions.attach_page(tab_id, link);
            }
            RelayInput::PageMessage { tab_id, envelope } => self.on_page_message(tab_id, envelope),
            RelayInput::PageDetached { tab_id, port } => {
                if self.sessions.detach_page(tab_id, &port) {
                    debug!(%tab_id, %port, "page detached");
                } else {
                    debug!(%tab_id, %port, "ignoring detach of a replaced page");
                }
            }
            RelayInput::TabClosed(tab_id) => {
                debug!(%tab_id, "tab closed");
                self.sessions.remove(tab_id);
            }
        }
        Ok(())
    }

    fn on_error(&self, error: Error) -> Result<()> {
        warn!(error = %error, "relay error");
        Ok(())
    }
}
