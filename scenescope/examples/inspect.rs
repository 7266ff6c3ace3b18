//! Inspect Example
//!
//! Loads a small scene, opens it as a page in tab 1 and attaches an
//! inspector panel to the same tab. The page's runtime only turns ready a
//! few seconds in, so the panel's handshake retries and the agent's
//! readiness probe are both visible in the log.
//!
//! Run with `RUST_LOG=scenescope=debug` for the full message flow.

use std::{sync::Arc, time::Duration};

use scenescope::{
    Config, Host, Result, SnapshotNode, TabId,
    panel::WatchRenderer,
    scene::{SceneArena, TypePath},
};
use tracing_subscriber::EnvFilter;

const SCENE: &str = r#"{
    "root": 0,
    "types": [{"namespace": "QmlWeb", "version": "1.0", "name": "RestModel"}],
    "objects": [
        {"class": "Rectangle", "id": "window",
         "properties": [["width", 800], ["height", 600], ["color", "white"], ["style", {"margin": 2}]],
         "fields": {"children": [1, 2]}, "teardown": [6]},
        {"class": "Text", "id": "title",
         "properties": [["text", "Orders"], ["font", {"bold": true}], ["onClicked", {"$function": "open"}]]},
        {"class": "Common.CardLayout", "id": "cards", "fields": {"children": [3, 4]}},
        {"class": "Repeater", "id": "rows", "delegate": [[5]]},
        {"class": "AccordionContent", "id": "hidden"},
        {"class": "Text", "id": "row0", "properties": [["text", null]]},
        {"class": "RestModel", "id": "orders", "instanceOf": [0],
         "properties": [["source", "/api/orders"]]}
    ]
}"#;

fn print_tree(node: &SnapshotNode, depth: usize) {
    let id = node.id().map(ToString::to_string).unwrap_or_default();
    let from = node.from.as_ref().map(ToString::to_string).unwrap_or_default();
    println!(
        "{:indent$}{} #{id} [{from}] {} properties",
        "",
        node.component_name,
        node.properties.len(),
        indent = depth * 2
    );
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

#[tokio::main]
async fn main() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scenescope=info")),
        )
        .init();

    let runtime = Arc::new(SceneArena::from_json(SCENE)?);
    let rest_model = TypePath::new("QmlWeb", "1.0", "RestModel");
    println!("Scene has {} objects; REST model type is {rest_model}", runtime.len());

    let config = Config::default().with_probe_interval(Duration::from_millis(500));
    let mut host = Host::new(config);
    host.start()?;

    let tab = TabId::new(1);
    host.open_page(tab, runtime.clone())?;

    let (renderer, mut tree) = WatchRenderer::new();
    host.open_panel(tab, renderer)?.show().await?;

    tokio::time::sleep(Duration::from_secs(3)).await;
    runtime.mark_initialized();

    if tree.changed().await.is_ok() {
        if let Some(root) = tree.borrow().clone() {
            print_tree(&root, 0);
            println!("{}", serde_json::to_string_pretty(root.as_ref())?);
        }
    }

    host.stop().await
}
