use serde::{Deserialize, Serialize};

use super::{Property, Provenance, Scalar};

/// Serialized form of one live object.
///
/// A value type: it has no identity beyond its position in the tree. The
/// renderer reads `children` as an ordered, lazily expandable sequence and
/// never mutates a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    /// Relation that produced this node; absent on the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Provenance>,
    pub component_name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
    /// Stable id of the originating object; set on the root only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<u64>,
}

impl SnapshotNode {
    pub fn new(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            ..Default::default()
        }
    }

    /// Value of the named property, if the snapshot kept it.
    pub fn property(&self, name: &str) -> Option<&Scalar> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// The node's own identifier (always the first property).
    pub fn id(&self) -> Option<&Scalar> {
        self.properties.first().map(|p| &p.value)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SnapshotNode::count).sum::<usize>()
    }

    /// Depth-first search by id.
    pub fn find_by_id(&self, id: &str) -> Option<&SnapshotNode> {
        if self.id().and_then(Scalar::as_str) == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Envelope, Message, Source, snapshot::ChildField};
    use serde_json::json;

    fn sample() -> SnapshotNode {
        let mut root = SnapshotNode::new("Item");
        root.tree_id = Some(9);
        root.properties.push(Property::new("id", "root"));
        let mut child = SnapshotNode::new("Text");
        child.from = Some(Provenance::Field(ChildField::Children));
        child.properties.push(Property::new("id", "label"));
        child.properties.push(Property::new("text", "hello"));
        root.children.push(child);
        root
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "componentName": "Item",
                "properties": [{"id": "root"}],
                "children": [{
                    "from": "children",
                    "componentName": "Text",
                    "properties": [{"id": "label"}, {"text": "hello"}],
                    "children": []
                }],
                "treeId": 9
            })
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let root = sample();
        assert_eq!(root.count(), 2);
        assert_eq!(root.id(), Some(&Scalar::from("root")));
        let label = root.find_by_id("label").unwrap();
        assert_eq!(label.property("text"), Some(&Scalar::from("hello")));
        assert!(label.is_leaf());
        assert!(root.find_by_id("missing").is_none());
    }

    #[test]
    fn test_property_order_survives_the_wire() {
        let mut root = SnapshotNode::new("Rectangle");
        root.tree_id = Some(3);
        root.properties = vec![
            Property::new("id", "panel"),
            Property::new("width", 640),
            Property::new("visible", true),
            Property::new("title", "Orders"),
            Property::new("model", Scalar::Null),
            Property::new("opacity", 0.5),
        ];
        let mut child = SnapshotNode::new("Text");
        child.from = Some(Provenance::Field(ChildField::Content));
        child.properties = vec![Property::new("id", "caption"), Property::new("text", "Total")];
        root.children.push(child);

        let reply = Envelope::new(Message::snapshot(root.clone()), Source::InjectedToContent, "agent");
        let decoded = Envelope::from_json(&reply.to_json().unwrap()).unwrap();
        let Message::GetRoot {
            content: Some(received),
            ..
        } = decoded.message
        else {
            panic!("expected a snapshot reply");
        };

        assert_eq!(received, root);
        assert_eq!(received.id(), Some(&Scalar::from("panel")));
        assert_eq!(
            received.property_names().collect::<Vec<_>>(),
            vec!["id", "width", "visible", "title", "model", "opacity"]
        );
        assert_eq!(received.children[0].property_names().next(), Some("id"));
    }
}
