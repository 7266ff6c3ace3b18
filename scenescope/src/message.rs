use serde::{Deserialize, Serialize};

use crate::{Action, Label, SnapshotNode, TabId};

/// A protocol message: `{action, tabId?, content?}` on the wire.
///
/// Every component dispatches on this enum with an exhaustive `match`.
/// Unrecognized actions decode to [`Message::Unknown`], which every
/// component ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Label)]
#[serde(tag = "action")]
pub enum Message {
    GetRoot {
        #[serde(rename = "tabId", default, skip_serializing_if = "Option::is_none")]
        tab_id: Option<TabId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<SnapshotNode>,
    },
    DevtoolInit {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    ContentInit,
    DevtoolContentReady,
    #[serde(other)]
    Unknown,
}

impl Message {
    /// Panel-side snapshot request for a tab.
    pub fn get_root(tab_id: TabId) -> Self {
        Message::GetRoot {
            tab_id: Some(tab_id),
            content: None,
        }
    }

    /// Page-side snapshot reply.
    pub fn snapshot(root: SnapshotNode) -> Self {
        Message::GetRoot {
            tab_id: None,
            content: Some(root),
        }
    }

    pub fn devtool_init(tab_id: TabId) -> Self {
        Message::DevtoolInit { tab_id }
    }

    /// The action of this message, or `None` for an unrecognized one.
    pub fn action(&self) -> Option<Action> {
        match self {
            Message::GetRoot { .. } => Some(Action::GetRoot),
            Message::DevtoolInit { .. } => Some(Action::DevtoolInit),
            Message::ContentInit => Some(Action::ContentInit),
            Message::DevtoolContentReady => Some(Action::DevtoolContentReady),
            Message::Unknown => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.action().is_some()
    }
}
