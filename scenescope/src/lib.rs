//! scenescope - live scene-graph inspection for web applications.
//!
//! An inspector panel, a privileged relay and a per-page bridge and agent
//! pass messages over typed channels so the panel can display a snapshot of
//! the inspected page's live object graph.
//!
//! - [`relay`]: session registry, handshake readiness and forwarding.
//! - [`panel`]: the inspector panel's handshake retry and rendering.
//! - [`page`]: the page window bus, the bridge and the snapshotting agent.
//! - [`snapshot`]: the object-graph walk producing [`SnapshotNode`] trees.
//! - [`scene`]: the capability traits of the inspected runtime and an
//!   in-memory implementation.
//!
//! [`Host`] wires all of them together. See `examples/inspect.rs`.

extern crate self as scenescope;

mod action;
mod component;
mod config;
mod envelope;
mod error;
mod host;
mod label;
mod link;
mod message;
mod meta;
mod port_id;
mod source;
mod step_action;
mod tab_id;

mod internal;

pub mod page;
pub mod panel;
pub mod relay;
pub mod scene;
pub mod snapshot;

pub use action::Action;
pub use component::Component;
pub use config::Config;
pub use envelope::Envelope;
pub use error::Error;
pub use host::{Host, PageHandle, PanelHandle};
pub use label::Label;
pub use link::Link;
pub use message::Message;
pub use meta::Meta;
pub use port_id::PortId;
pub use snapshot::{Scalar, SnapshotNode, build_snapshot, snapshot_root};
pub use source::Source;
pub use step_action::StepAction;
pub use tab_id::TabId;

pub use scenescope_macros::Label;

pub type Result<T = ()> = std::result::Result<T, Error>;
