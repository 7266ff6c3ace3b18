use std::collections::HashSet;

use tracing::{debug, trace};

use super::{ChildField, Property, Provenance, SnapshotNode, rules};
use crate::{
    Scalar,
    scene::{InspectedRuntime, LiveObject, ObjectRef, Slot, TypeHandle},
};

/// Snapshot the runtime's root object.
///
/// Returns `None` when the runtime exposes no root or the root reference
/// does not resolve.
pub fn snapshot_root<R: InspectedRuntime + ?Sized>(runtime: &R) -> Option<SnapshotNode> {
    let root = runtime.root()?;
    build_snapshot(runtime, root)
}

/// Serialize the object graph reachable from `root` into a tree.
///
/// Depth-first. The set of objects on the current path is threaded through
/// the walk, so an edge leading back to an ancestor is skipped and the walk
/// always terminates. Objects reachable through several distinct paths are
/// emitted once per path.
pub fn build_snapshot<R: InspectedRuntime + ?Sized>(
    runtime: &R,
    root: ObjectRef,
) -> Option<SnapshotNode> {
    let Some(object) = runtime.object(root) else {
        debug!(%root, "snapshot root does not resolve");
        return None;
    };
    let mut walker = Walker {
        runtime,
        rest_model: runtime.resolve_type(rules::REST_MODEL),
        path: HashSet::from([root]),
    };
    let mut node = walker.visit(object);
    node.tree_id = Some(object.tree_id());
    Some(node)
}

struct Walker<'r, R: ?Sized> {
    runtime: &'r R,
    rest_model: Option<TypeHandle>,
    path: HashSet<ObjectRef>,
}

impl<'r, R: InspectedRuntime + ?Sized> Walker<'r, R> {
    fn visit(&mut self, object: &'r dyn LiveObject) -> SnapshotNode {
        let mut node = SnapshotNode::new(object.type_tag());
        node.properties = properties(object);

        if object.type_tag() == rules::REPEATER {
            let children: Vec<ObjectRef> = object
                .delegate_children()
                .unwrap_or_default()
                .iter()
                .flat_map(Slot::flatten)
                .collect();
            for child in children {
                self.descend(&mut node, child, Provenance::Repeater);
            }
            return node;
        }

        let hides_accordions = object.type_tag() == rules::CARD_LAYOUT;
        for field in ChildField::ALL {
            let Some(slot) = object.structural_field(field.as_str()) else {
                continue;
            };
            for child in slot.flatten() {
                if hides_accordions && self.type_tag(child) == Some(rules::ACCORDION_CONTENT) {
                    trace!(%child, "hiding accordion content of card layout");
                    continue;
                }
                self.descend(&mut node, child, Provenance::Field(field));
            }
        }

        if let Some(rest_model) = self.rest_model {
            let runtime = self.runtime;
            for &entry in object.teardown_registry() {
                if runtime
                    .object(entry)
                    .is_some_and(|o| o.is_instance_of(rest_model))
                {
                    self.descend(&mut node, entry, Provenance::RestModel);
                }
            }
        }

        node
    }

    fn descend(&mut self, parent: &mut SnapshotNode, child: ObjectRef, from: Provenance) {
        let runtime = self.runtime;
        let Some(object) = runtime.object(child) else {
            debug!(parent = %parent.component_name, %child, %from, "skipping dangling reference");
            return;
        };
        if !self.path.insert(child) {
            debug!(
                parent = %parent.component_name,
                %child,
                %from,
                "skipping reference back to an ancestor"
            );
            return;
        }
        let mut node = self.visit(object);
        node.from = Some(from);
        parent.children.push(node);
        self.path.remove(&child);
    }

    fn type_tag(&self, handle: ObjectRef) -> Option<&'r str> {
        let runtime = self.runtime;
        runtime.object(handle).map(|o| o.type_tag())
    }
}

fn properties(object: &dyn LiveObject) -> Vec<Property> {
    let mut properties = vec![Property::new(rules::ID_PROPERTY, object.identifier())];
    for name in object.property_names() {
        if name == rules::ID_PROPERTY || rules::is_excluded(name) {
            continue;
        }
        match object.property(name) {
            None => properties.push(Property::new(name, Scalar::Undefined)),
            Some(value) => match value.as_scalar() {
                Some(scalar) => properties.push(Property::new(name, scalar.clone())),
                None => debug!(
                    component = object.type_tag(),
                    property = name,
                    kind = value.type_name(),
                    "skipping property of unsupported type"
                ),
            },
        }
    }
    properties
}
