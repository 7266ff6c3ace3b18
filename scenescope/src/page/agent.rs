use std::{sync::Arc, time::Duration};

use tracing::{debug, error, info, trace, warn};

use super::{PageWindow, Probe, ProbeOutcome, WindowMessage};
use crate::{
    Component, Envelope, Label, Message, Meta, Result, Source, StepAction, TabId,
    scene::InspectedRuntime, snapshot_root,
};

/// The agent living inside the inspected page.
///
/// Probes the runtime until it is initialized, announces itself with
/// `ContentInit` and then answers `GetRoot` requests with a fresh snapshot.
pub struct PageAgent<R: InspectedRuntime> {
    name: Arc<str>,
    tab_id: TabId,
    runtime: Arc<R>,
    window: PageWindow,
    probe: Probe,
    connected: bool,
}

impl<R: InspectedRuntime> PageAgent<R> {
    pub fn new(
        tab_id: TabId,
        runtime: Arc<R>,
        window: PageWindow,
        probe_interval: Duration,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            name: Arc::from("injected"),
            tab_id,
            runtime,
            window,
            probe: Probe::new(probe_interval, probe_timeout),
            connected: false,
        }
    }

    /// Set once the relay reported both sides ready.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_ready(&self) -> bool {
        self.probe.is_ready()
    }

    fn post(&self, message: Message, correlation_id: Option<u128>) {
        self.window.post(Envelope {
            message,
            source: Source::InjectedToContent,
            meta: Meta::new(self.name.clone(), correlation_id),
        });
    }

    fn serve_root(&self, request: &Envelope) {
        if !self.probe.is_ready() {
            warn!(tab_id = %self.tab_id, "GetRoot before the runtime is ready; dropping");
            return;
        }
        match snapshot_root(self.runtime.as_ref()) {
            Some(root) => {
                debug!(tab_id = %self.tab_id, nodes = root.count(), "serving snapshot");
                self.post(Message::snapshot(root), Some(request.meta.id()));
            }
            None => warn!(tab_id = %self.tab_id, "runtime has no root object"),
        }
    }
}

impl<R: InspectedRuntime> Component for PageAgent<R> {
    type Input = WindowMessage;

    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&mut self, WindowMessage(envelope): WindowMessage) -> Result<()> {
        if envelope.source != Source::ContentToInjected {
            trace!(tab_id = %self.tab_id, source = %envelope.source, "ignoring window message");
            return Ok(());
        }
        match &envelope.message {
            Message::GetRoot { .. } => self.serve_root(&envelope),
            Message::DevtoolContentReady => {
                if !self.connected {
                    info!(tab_id = %self.tab_id, "devtool connected");
                }
                self.connected = true;
            }
            Message::Unknown => trace!(tab_id = %self.tab_id, "ignoring unrecognized action"),
            other => trace!(tab_id = %self.tab_id, action = %other.label(), "ignoring"),
        }
        Ok(())
    }

    async fn step(&mut self) -> Result<StepAction> {
        match self.probe.check(self.runtime.is_initialized()) {
            ProbeOutcome::BecameReady => {
                info!(tab_id = %self.tab_id, "runtime ready");
                self.post(Message::ContentInit, None);
                Ok(StepAction::Never)
            }
            ProbeOutcome::StillWaiting(delay) => {
                trace!(tab_id = %self.tab_id, ?delay, "runtime not ready yet");
                Ok(StepAction::Backoff(delay))
            }
            ProbeOutcome::GaveUp => {
                error!(tab_id = %self.tab_id, "runtime never became ready; giving up");
                Ok(StepAction::Never)
            }
            ProbeOutcome::Idle => Ok(StepAction::Never),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        sync::{broadcast, mpsc},
        time::sleep,
    };
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::{
        internal::Driver,
        scene::{SceneArena, SceneObject, Slot},
    };

    const INTERVAL: Duration = Duration::from_secs(2);
    const TIMEOUT: Duration = Duration::from_secs(30);

    fn scene() -> Arc<SceneArena> {
        let mut arena = SceneArena::new();
        let child = arena.insert(SceneObject::new("Text").with_id("label"));
        let root = arena.insert(
            SceneObject::new("Rectangle")
                .with_id("root")
                .with_field("children", Slot::list([child])),
        );
        arena.set_root(root);
        Arc::new(arena)
    }

    fn drain(rx: &mut broadcast::Receiver<WindowMessage>) -> Vec<Envelope> {
        let mut out = Vec::new();
        while let Ok(WindowMessage(envelope)) = rx.try_recv() {
            out.push(envelope);
        }
        out
    }

    fn from_bridge(message: Message) -> WindowMessage {
        WindowMessage(Envelope::new(message, Source::ContentToInjected, "content"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_init_once_runtime_is_ready() {
        let window = PageWindow::new(16);
        let mut rx = window.subscribe();
        let runtime = scene();
        let agent = PageAgent::new(TabId::new(1), runtime.clone(), window, INTERVAL, TIMEOUT);
        let (_tx, mailbox) = mpsc::channel(8);
        let token = CancellationToken::new();
        tokio::spawn(Driver::new(agent, mailbox, token.clone()).run());

        sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());

        runtime.mark_initialized();
        sleep(Duration::from_secs(10)).await;
        let posted = drain(&mut rx);
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].message, Message::ContentInit);
        assert_eq!(posted[0].source, Source::InjectedToContent);
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_and_never_serves() {
        let window = PageWindow::new(16);
        let mut rx = window.subscribe();
        let runtime = scene();
        let agent = PageAgent::new(TabId::new(2), runtime.clone(), window, INTERVAL, TIMEOUT);
        let (tx, mailbox) = mpsc::channel(8);
        tokio::spawn(Driver::new(agent, mailbox, CancellationToken::new()).run());

        sleep(Duration::from_secs(31)).await;
        runtime.mark_initialized();
        sleep(Duration::from_secs(10)).await;
        tx.send(from_bridge(Message::get_root(TabId::new(2)))).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_serves_snapshot_when_ready() {
        let window = PageWindow::new(16);
        let mut rx = window.subscribe();
        let runtime = scene();
        runtime.mark_initialized();
        let mut agent = PageAgent::new(TabId::new(3), runtime, window, INTERVAL, TIMEOUT);

        assert_eq!(agent.step().await.unwrap(), StepAction::Never);
        assert!(agent.is_ready());
        drain(&mut rx);

        let request = from_bridge(Message::get_root(TabId::new(3)));
        let request_id = request.0.meta.id();
        agent.handle(request).await.unwrap();
        let posted = drain(&mut rx);
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].meta.correlation_id(), Some(request_id));
        let Message::GetRoot {
            tab_id: None,
            content: Some(root),
        } = &posted[0].message
        else {
            panic!("expected a snapshot reply, got {:?}", posted[0].message);
        };
        assert_eq!(root.component_name, "Rectangle");
        assert_eq!(root.count(), 2);
    }

    #[tokio::test]
    async fn test_ignores_foreign_sources() {
        let window = PageWindow::new(16);
        let mut rx = window.subscribe();
        let runtime = scene();
        runtime.mark_initialized();
        let mut agent = PageAgent::new(TabId::new(4), runtime, window, INTERVAL, TIMEOUT);
        agent.step().await.unwrap();
        drain(&mut rx);

        let forged = Envelope::new(
            Message::get_root(TabId::new(4)),
            Source::InjectedToContent,
            "agent",
        );
        agent.handle(WindowMessage(forged)).await.unwrap();
        let ready = Envelope::new(Message::DevtoolContentReady, Source::Devtool, "devtool");
        agent.handle(WindowMessage(ready)).await.unwrap();
        assert!(drain(&mut rx).is_empty());
        assert!(!agent.is_connected());

        agent
            .handle(from_bridge(Message::DevtoolContentReady))
            .await
            .unwrap();
        assert!(agent.is_connected());
    }
}
