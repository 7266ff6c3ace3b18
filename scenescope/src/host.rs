use std::{collections::HashMap, sync::Arc};

use tokio::{
    sync::mpsc::{Receiver, Sender, channel},
    task::{JoinHandle, JoinSet},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    Config, Error, Result, TabId,
    internal::Driver,
    page::{PageAgent, PageBridge, PageWindow},
    panel::{Panel, PanelInput, Renderer},
    relay::{Relay, RelayHandle, RelayInput},
    scene::InspectedRuntime,
};

/// Owns the relay and every panel and page component, and their shutdown.
///
/// - `start()` spawns the relay and returns immediately.
/// - `open_page(tab, runtime)` spawns the bridge and agent of one page.
/// - `open_panel(tab, renderer)` spawns an inspector panel for a tab.
/// - `stop()` cancels panels and pages, lets them say goodbye to the relay,
///   then stops the relay.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use scenescope::{Host, TabId, panel::WatchRenderer, scene::SceneArena};
///
/// # async fn demo() -> scenescope::Result<()> {
/// let mut host = Host::default();
/// host.start()?;
/// let tab = TabId::new(1);
/// host.open_page(tab, Arc::new(SceneArena::new()))?;
/// let (renderer, mut tree) = WatchRenderer::new();
/// host.open_panel(tab, renderer)?.show().await?;
/// tree.changed().await.ok();
/// host.stop().await
/// # }
/// ```
pub struct Host {
    config: Arc<Config>,
    relay: RelayHandle,
    pending_relay: Option<(Relay, Receiver<RelayInput>)>,
    relay_task: Option<JoinHandle<Result<()>>>,
    tasks: JoinSet<Result<()>>,
    cancel_token: CancellationToken,
    relay_cancel_token: CancellationToken,
    pages: HashMap<TabId, CancellationToken>,
}

impl Host {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let (tx, rx) = channel(config.channel_size);
        Self {
            relay: RelayHandle::new(tx),
            pending_relay: Some((Relay::new(), rx)),
            relay_task: None,
            config,
            tasks: JoinSet::new(),
            cancel_token: CancellationToken::new(),
            relay_cancel_token: CancellationToken::new(),
            pages: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    /// Handle to the relay's mailbox, for custom endpoints.
    pub fn relay(&self) -> &RelayHandle {
        &self.relay
    }

    pub fn is_started(&self) -> bool {
        self.relay_task.is_some()
    }

    /// Spawn the relay. This returns immediately.
    pub fn start(&mut self) -> Result<()> {
        let (relay, mailbox) = self.pending_relay.take().ok_or(Error::HostAlreadyStarted)?;
        let driver = Driver::new(relay, mailbox, self.relay_cancel_token.clone());
        self.relay_task = Some(tokio::spawn(driver.run()));
        info!("host started");
        Ok(())
    }

    /// Load a page into `tab_id`: a window bus, its bridge and its agent.
    pub fn open_page<R: InspectedRuntime>(
        &mut self,
        tab_id: TabId,
        runtime: Arc<R>,
    ) -> Result<PageHandle> {
        self.ensure_started()?;
        if self.pages.get(&tab_id).is_some_and(|t| !t.is_cancelled()) {
            return Err(Error::PageAlreadyOpen(tab_id));
        }

        let token = self.cancel_token.child_token();
        let window = PageWindow::new(self.config.window_capacity);

        let (bridge_tx, bridge_rx) = channel(self.config.channel_size);
        let (agent_tx, agent_rx) = channel(self.config.channel_size);
        // Subscribe both listeners before the agent can post anything.
        let bridge_listener = window.listener(bridge_tx.clone(), token.clone());
        let agent_listener = window.listener(agent_tx, token.clone());

        let bridge = PageBridge::new(tab_id, self.relay.clone(), window.clone(), bridge_tx);
        let agent = PageAgent::new(
            tab_id,
            runtime,
            window.clone(),
            self.config.probe_interval,
            self.config.probe_timeout,
        );

        self.tasks.spawn(bridge_listener);
        self.tasks.spawn(agent_listener);
        self.tasks
            .spawn(Driver::new(bridge, bridge_rx, token.clone()).run());
        self.tasks
            .spawn(Driver::new(agent, agent_rx, token.clone()).run());

        self.pages.insert(tab_id, token.clone());
        debug!(%tab_id, "page opened");
        Ok(PageHandle {
            tab_id,
            window,
            cancel_token: token,
        })
    }

    /// Open an inspector panel for `tab_id`. It stays idle until shown.
    pub fn open_panel<V: Renderer>(&mut self, tab_id: TabId, renderer: V) -> Result<PanelHandle> {
        self.ensure_started()?;
        let token = self.cancel_token.child_token();
        let (tx, rx) = channel(self.config.channel_size);
        let panel = Panel::new(
            tab_id,
            self.relay.clone(),
            tx.clone(),
            renderer,
            self.config.handshake_interval,
        );
        self.tasks.spawn(Driver::new(panel, rx, token.clone()).run());
        debug!(%tab_id, "panel opened");
        Ok(PanelHandle {
            tab_id,
            sender: tx,
            cancel_token: token,
        })
    }

    /// Unload the page of `tab_id`, if any. The relay forgets its readiness.
    pub fn close_page(&mut self, tab_id: TabId) {
        if let Some(token) = self.pages.remove(&tab_id) {
            token.cancel();
            debug!(%tab_id, "page closed");
        }
    }

    /// Close the tab: unload its page and drop its relay session.
    pub async fn close_tab(&mut self, tab_id: TabId) -> Result<()> {
        self.close_page(tab_id);
        self.relay.close_tab(tab_id).await
    }

    /// Graceful shutdown.
    ///
    /// 1. Cancels every panel and page and awaits their tasks, so their
    ///    disconnects reach the relay.
    /// 2. Stops the relay and awaits it.
    pub async fn stop(&mut self) -> Result<()> {
        self.cancel_token.cancel();
        while let Some(res) = self.tasks.join_next().await {
            res??;
        }
        self.pages.clear();

        self.relay_cancel_token.cancel();
        if let Some(task) = self.relay_task.take() {
            task.await??;
        }
        info!("host stopped");
        Ok(())
    }

    fn ensure_started(&self) -> Result<()> {
        if self.is_started() {
            Ok(())
        } else {
            Err(Error::HostNotStarted)
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// A loaded page.
#[derive(Debug, Clone)]
pub struct PageHandle {
    tab_id: TabId,
    window: PageWindow,
    cancel_token: CancellationToken,
}

impl PageHandle {
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    /// The page's window bus, shared with every script on the page.
    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn is_closed(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// An open inspector panel.
#[derive(Debug, Clone)]
pub struct PanelHandle {
    tab_id: TabId,
    sender: Sender<PanelInput>,
    cancel_token: CancellationToken,
}

impl PanelHandle {
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    /// Make the panel visible; starts the handshake on first show.
    pub async fn show(&self) -> Result<()> {
        self.sender.send(PanelInput::Shown).await?;
        Ok(())
    }

    /// Close the panel; the relay unbinds it.
    pub fn close(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
