use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Runtime configuration for the host and its components.
///
/// Controls channel buffer sizes and the two timers of the protocol: the
/// panel's handshake retry and the page agent's readiness probe. Use the
/// builder methods to customize, or [`Default`] for the protocol defaults.
///
/// The config can also be deserialized; durations are given in milliseconds
/// and missing fields fall back to the defaults.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use scenescope::Config;
///
/// let config = Config::default()
///     .with_channel_size(256)
///     .with_handshake_interval(Duration::from_millis(500));
/// assert_eq!(config.probe_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Size of each component's mailbox and of the relay inbox.
    /// Default: 128
    pub channel_size: usize,

    /// Capacity of a page's window bus. Slow listeners lag behind and skip
    /// messages once this many are pending.
    /// Default: 64
    pub window_capacity: usize,

    /// Interval between the panel's `DevtoolInit` attempts.
    /// Default: 1 s
    #[serde(rename = "handshakeIntervalMs", deserialize_with = "millis")]
    pub handshake_interval: Duration,

    /// Interval between the page agent's runtime readiness checks.
    /// Default: 2 s
    #[serde(rename = "probeIntervalMs", deserialize_with = "millis")]
    pub probe_interval: Duration,

    /// How long the page agent keeps probing before giving up for good.
    /// Default: 30 s
    #[serde(rename = "probeTimeoutMs", deserialize_with = "millis")]
    pub probe_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            channel_size: 128,
            window_capacity: 64,
            handshake_interval: Duration::from_secs(1),
            probe_interval: Duration::from_secs(2),
            probe_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Set the mailbox size for components and the relay.
    ///
    /// When a mailbox is full, senders wait (backpressure); the relay's
    /// outgoing links fail fast instead and log the drop.
    pub fn with_channel_size(mut self, size: usize) -> Self {
        self.channel_size = size;
        self
    }

    /// Set the capacity of each page's window bus.
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }

    /// Set the panel's handshake retry interval.
    pub fn with_handshake_interval(mut self, interval: Duration) -> Self {
        self.handshake_interval = interval;
        self
    }

    /// Set the page agent's readiness probe interval.
    pub fn with_probe_interval(mut self, interval: Duration) -> Self {
        self.probe_interval = interval;
        self
    }

    /// Set how long the page agent probes before giving up.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_protocol_timers() {
        let config = Config::default();
        assert_eq!(config.handshake_interval, Duration::from_secs(1));
        assert_eq!(config.probe_interval, Duration::from_secs(2));
        assert_eq!(config.probe_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{"channelSize": 16, "probeTimeoutMs": 5000}"#).unwrap();
        assert_eq!(config.channel_size, 16);
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.handshake_interval, Duration::from_secs(1));
        assert_eq!(config.window_capacity, 64);
    }
}
