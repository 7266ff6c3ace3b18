//! The inspected page: its window bus, the bridge forwarding between the
//! window and the relay, and the agent that snapshots the runtime.

mod agent;
mod bridge;
mod probe;
mod window;

pub use agent::PageAgent;
pub use bridge::{BridgeInput, PageBridge};
pub use probe::{Probe, ProbeOutcome, ProbeState};
pub use window::{PageWindow, WindowMessage};
