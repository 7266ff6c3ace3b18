//! Live object-graph snapshots.
//!
//! [`build_snapshot`] walks an [`InspectedRuntime`](crate::scene::InspectedRuntime)
//! from a root object and produces a plain [`SnapshotNode`] tree that can be
//! serialized and shipped to the panel.

mod node;
mod property;
mod provenance;
pub mod rules;
mod scalar;
mod walker;

pub use node::SnapshotNode;
pub use property::Property;
pub use provenance::{ChildField, Provenance};
pub use scalar::Scalar;
pub use walker::{build_snapshot, snapshot_root};
