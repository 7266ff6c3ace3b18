use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Meta, Message, Result, Source};

/// A message plus its provenance tag: `{message, source}` on the wire.
///
/// - `message`: the protocol payload.
/// - `source`: provenance tag used by boundary filters.
/// - `meta`: hop-local [`Meta`]; not serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub message: Message,
    pub source: Source,
    #[serde(skip)]
    pub meta: Meta,
}

impl Envelope {
    /// Create a new envelope sent by the named component.
    pub fn new<N>(message: Message, source: Source, sender: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            message,
            source,
            meta: Meta::new(sender, None),
        }
    }

    /// Re-tag this envelope for the next hop, keeping the message.
    ///
    /// The new envelope is correlated with this one so a request can be
    /// followed across the bridge in logs.
    pub fn forward<N>(&self, source: Source, sender: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            message: self.message.clone(),
            source,
            meta: Meta::new(sender, Some(self.meta.id())),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
