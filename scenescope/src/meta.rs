use std::{sync::Arc, time::SystemTime};

use uuid::Uuid;

/// Hop-local metadata attached to every envelope.
///
/// - `id`: unique identifier for the envelope.
/// - `timestamp`: creation time in nanoseconds since Unix epoch (truncated to `u64`).
/// - `sender`: name of the component that produced the envelope.
/// - `correlation_id`: id of the envelope this one was derived from, if any.
///
/// Metadata never crosses the wire; a decoded envelope gets fresh metadata.
#[derive(Debug, Clone)]
pub struct Meta {
    id: u128,
    timestamp: u64,
    sender: Arc<str>,
    correlation_id: Option<u128>,
}

impl Meta {
    pub fn new(sender: impl Into<Arc<str>>, correlation_id: Option<u128>) -> Self {
        Self {
            id: Uuid::new_v4().as_u128(),
            timestamp: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default(),
            sender: sender.into(),
            correlation_id,
        }
    }

    /// Unique identifier for this envelope.
    pub fn id(&self) -> u128 {
        self.id
    }

    /// Timestamp in nanoseconds since Unix epoch (u64 truncation).
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Name of the component that sent the envelope.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Id of the envelope this one was forwarded from.
    pub fn correlation_id(&self) -> Option<u128> {
        self.correlation_id
    }
}

impl Default for Meta {
    fn default() -> Self {
        Meta::new("wire", None)
    }
}
