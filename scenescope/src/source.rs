use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Label;

/// Provenance tag carried by every envelope.
///
/// Tags are used only to accept or drop a message at a boundary, never for
/// routing. Strings outside the known set decode to [`Source::Unrecognized`]
/// so foreign traffic on a page's window can be filtered instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Label)]
#[serde(from = "String", into = "String")]
pub enum Source {
    /// Posted by the page agent inside the page realm.
    InjectedToContent,
    /// Posted into the page realm by the bridge on behalf of the relay.
    ContentToInjected,
    /// Emitted by the relay.
    Background,
    /// Emitted by an inspector panel.
    Devtool,
    Unrecognized(String),
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::InjectedToContent => "injected-to-content",
            Source::ContentToInjected => "content-to-injected",
            Source::Background => "background",
            Source::Devtool => "devtool",
            Source::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for Source {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "injected-to-content" => Source::InjectedToContent,
            "content-to-injected" => Source::ContentToInjected,
            "background" => Source::Background,
            "devtool" => Source::Devtool,
            _ => Source::Unrecognized(tag),
        }
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        match source {
            Source::Unrecognized(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
