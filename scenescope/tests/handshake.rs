//! End-to-end tests driving panels and pages through a running host.

use std::{sync::Arc, time::Duration};

use scenescope::{
    Config, Envelope, Host, Message, PortId, Source, TabId,
    panel::WatchRenderer,
    scene::{SceneArena, SceneObject, Slot},
};
use tokio::{
    sync::mpsc,
    time::{sleep, timeout},
};

fn scene(initialized: bool) -> Arc<SceneArena> {
    let mut arena = SceneArena::new();
    let label = arena.insert(
        SceneObject::new("Text")
            .with_id("title")
            .with_property("text", "Orders"),
    );
    let button = arena.insert(SceneObject::new("Button").with_id("submit"));
    let root = arena.insert(
        SceneObject::new("Rectangle")
            .with_id("root")
            .with_field("children", Slot::list([label, button])),
    );
    arena.set_root(root);
    if initialized {
        arena.mark_initialized();
    }
    Arc::new(arena)
}

#[tokio::test(start_paused = true)]
async fn test_panel_receives_tree_after_handshake() {
    let mut host = Host::default();
    host.start().unwrap();
    let tab = TabId::new(7);

    host.open_page(tab, scene(true)).unwrap();
    let (renderer, mut tree) = WatchRenderer::new();
    host.open_panel(tab, renderer).unwrap().show().await.unwrap();

    timeout(Duration::from_secs(10), tree.changed())
        .await
        .expect("tree within the handshake window")
        .unwrap();
    let root = tree.borrow().clone().unwrap();
    assert_eq!(root.component_name, "Rectangle");
    assert_eq!(root.count(), 3);
    assert!(root.find_by_id("submit").is_some());

    host.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_late_runtime_is_picked_up_by_probe() {
    let mut host = Host::default();
    host.start().unwrap();
    let tab = TabId::new(8);

    let runtime = scene(false);
    host.open_page(tab, runtime.clone()).unwrap();
    let (renderer, mut tree) = WatchRenderer::new();
    host.open_panel(tab, renderer).unwrap().show().await.unwrap();

    sleep(Duration::from_secs(9)).await;
    assert!(tree.borrow().is_none());

    runtime.mark_initialized();
    timeout(Duration::from_secs(5), tree.changed())
        .await
        .expect("tree after the next probe")
        .unwrap();
    assert!(tree.borrow().is_some());

    host.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_panel_without_page_keeps_retrying() {
    let mut host = Host::new(Config::default().with_handshake_interval(Duration::from_millis(500)));
    host.start().unwrap();
    let (renderer, tree) = WatchRenderer::new();
    host.open_panel(TabId::new(9), renderer)
        .unwrap()
        .show()
        .await
        .unwrap();

    sleep(Duration::from_secs(120)).await;
    assert!(tree.borrow().is_none());

    // A page loaded much later still completes the handshake.
    let mut tree = tree;
    host.open_page(TabId::new(9), scene(true)).unwrap();
    timeout(Duration::from_secs(2), tree.changed())
        .await
        .expect("tree once the page shows up")
        .unwrap();

    host.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_tabs_are_isolated() {
    let mut host = Host::default();
    host.start().unwrap();
    let (a, b) = (TabId::new(1), TabId::new(2));

    host.open_page(a, scene(true)).unwrap();
    let (renderer_a, mut tree_a) = WatchRenderer::new();
    let (renderer_b, tree_b) = WatchRenderer::new();
    host.open_panel(a, renderer_a).unwrap().show().await.unwrap();
    host.open_panel(b, renderer_b).unwrap().show().await.unwrap();

    timeout(Duration::from_secs(10), tree_a.changed())
        .await
        .unwrap()
        .unwrap();
    sleep(Duration::from_secs(10)).await;
    assert!(tree_b.borrow().is_none());

    host.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_foreign_window_traffic_is_ignored() {
    let mut host = Host::default();
    host.start().unwrap();
    let tab = TabId::new(3);

    // The runtime never initializes; a forged ContentInit must not ready the tab.
    let page = host.open_page(tab, scene(false)).unwrap();
    page.window()
        .post_json(r#"{"message":{"action":"ContentInit"},"source":"ad-script"}"#)
        .unwrap();
    page.window().post(Envelope::new(
        Message::ContentInit,
        Source::ContentToInjected,
        "forged",
    ));
    page.window()
        .post_json(r#"{"message":{"action":"Resize","width":3},"source":"injected-to-content"}"#)
        .unwrap();

    let (tx, mut rx) = mpsc::channel::<Envelope>(16);
    let port = PortId::new("devtool");
    host.relay().connect_panel(port.clone(), tx).await.unwrap();
    for _ in 0..5 {
        host.relay()
            .panel_message(&port, Message::devtool_init(tab))
            .await
            .unwrap();
        sleep(Duration::from_secs(1)).await;
    }
    assert!(rx.try_recv().is_err());

    host.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_reopened_panel_handshakes_again() {
    let mut host = Host::default();
    host.start().unwrap();
    let tab = TabId::new(4);
    host.open_page(tab, scene(true)).unwrap();

    let (renderer, mut first) = WatchRenderer::new();
    let panel = host.open_panel(tab, renderer).unwrap();
    panel.show().await.unwrap();
    timeout(Duration::from_secs(10), first.changed())
        .await
        .unwrap()
        .unwrap();
    panel.close();
    sleep(Duration::from_secs(1)).await;

    let (renderer, mut second) = WatchRenderer::new();
    host.open_panel(tab, renderer).unwrap().show().await.unwrap();
    timeout(Duration::from_secs(10), second.changed())
        .await
        .unwrap()
        .unwrap();

    host.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_closed_tab_forgets_readiness() {
    let mut host = Host::default();
    host.start().unwrap();
    let tab = TabId::new(5);
    host.open_page(tab, scene(true)).unwrap();
    sleep(Duration::from_secs(1)).await;

    host.close_tab(tab).await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let (renderer, tree) = WatchRenderer::new();
    host.open_panel(tab, renderer).unwrap().show().await.unwrap();
    sleep(Duration::from_secs(10)).await;
    assert!(tree.borrow().is_none());

    host.stop().await.unwrap();
}
