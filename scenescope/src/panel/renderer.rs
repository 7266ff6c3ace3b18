use std::sync::Arc;

use tokio::sync::watch;

use crate::SnapshotNode;

/// The panel's view of the inspected tree.
pub trait Renderer: Send + 'static {
    /// Replace the displayed tree.
    fn set_root(&mut self, root: SnapshotNode);

    /// Whether a tree has been displayed yet.
    fn has_root(&self) -> bool;
}

/// A [`Renderer`] publishing every received tree on a watch channel.
///
/// ```rust
/// use scenescope::{SnapshotNode, panel::{Renderer, WatchRenderer}};
///
/// let (mut renderer, rx) = WatchRenderer::new();
/// assert!(!renderer.has_root());
/// renderer.set_root(SnapshotNode::new("Item"));
/// assert_eq!(rx.borrow().as_ref().map(|n| n.component_name.as_str()), Some("Item"));
/// ```
#[derive(Debug)]
pub struct WatchRenderer {
    tx: watch::Sender<Option<Arc<SnapshotNode>>>,
}

impl WatchRenderer {
    pub fn new() -> (Self, watch::Receiver<Option<Arc<SnapshotNode>>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }
}

impl Renderer for WatchRenderer {
    fn set_root(&mut self, root: SnapshotNode) {
        self.tx.send_replace(Some(Arc::new(root)));
    }

    fn has_root(&self) -> bool {
        self.tx.borrow().is_some()
    }
}
