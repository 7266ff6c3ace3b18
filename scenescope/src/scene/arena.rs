use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicBool, Ordering},
};

use serde::Deserialize;

use super::{InspectedRuntime, LiveObject, ObjectRef, PropertyValue, Slot, TypeHandle, TypePath};
use crate::{Error, Result, Scalar};

/// A registered constructor of a [`SceneArena`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeEntry {
    pub namespace: String,
    pub version: String,
    pub name: String,
}

impl TypeEntry {
    fn matches(&self, path: &TypePath<'_>) -> bool {
        self.namespace == path.namespace && self.version == path.version && self.name == path.name
    }
}

impl From<TypePath<'_>> for TypeEntry {
    fn from(path: TypePath<'_>) -> Self {
        Self {
            namespace: path.namespace.to_owned(),
            version: path.version.to_owned(),
            name: path.name.to_owned(),
        }
    }
}

/// One object stored in a [`SceneArena`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub class: String,
    #[serde(default)]
    pub id: Scalar,
    /// Defaults to the arena index on insert.
    #[serde(default)]
    pub tree_id: Option<u64>,
    /// Declared properties as `[name, value]` pairs, in declaration order.
    #[serde(default)]
    pub properties: Vec<(String, PropertyValue)>,
    #[serde(default)]
    pub fields: BTreeMap<String, Slot>,
    #[serde(default)]
    pub delegate: Option<Vec<Slot>>,
    #[serde(default)]
    pub teardown: Vec<ObjectRef>,
    #[serde(default)]
    pub instance_of: Vec<TypeHandle>,
}

impl SceneObject {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<Scalar>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, slot: impl Into<Slot>) -> Self {
        self.set_field(name, slot);
        self
    }

    pub fn with_delegate(mut self, children: impl IntoIterator<Item = ObjectRef>) -> Self {
        self.delegate = Some(children.into_iter().map(Slot::Object).collect());
        self
    }

    pub fn with_teardown(mut self, entry: ObjectRef) -> Self {
        self.teardown.push(entry);
        self
    }

    pub fn instance_of(mut self, ty: TypeHandle) -> Self {
        self.instance_of.push(ty);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, slot: impl Into<Slot>) {
        self.fields.insert(name.into(), slot.into());
    }

    fn references(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        fn in_value(value: &PropertyValue, out: &mut Vec<ObjectRef>) {
            match value {
                PropertyValue::Object(r) => out.push(*r),
                PropertyValue::List(items) => items.iter().for_each(|v| in_value(v, out)),
                _ => {}
            }
        }
        let mut refs: Vec<ObjectRef> = self.fields.values().flat_map(Slot::flatten).collect();
        refs.extend(self.delegate.iter().flatten().flat_map(Slot::flatten));
        refs.extend(self.teardown.iter().copied());
        self.properties.iter().for_each(|(_, v)| in_value(v, &mut refs));
        refs.into_iter()
    }
}

impl LiveObject for SceneObject {
    fn type_tag(&self) -> &str {
        &self.class
    }

    fn identifier(&self) -> Scalar {
        self.id.clone()
    }

    fn tree_id(&self) -> u64 {
        self.tree_id.unwrap_or_default()
    }

    fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    fn structural_field(&self, name: &str) -> Option<&Slot> {
        self.fields.get(name)
    }

    fn delegate_children(&self) -> Option<&[Slot]> {
        self.delegate.as_deref()
    }

    fn teardown_registry(&self) -> &[ObjectRef] {
        &self.teardown
    }

    fn is_instance_of(&self, ty: TypeHandle) -> bool {
        self.instance_of.contains(&ty)
    }
}

/// JSON form of a [`SceneArena`].
///
/// ```json
/// {
///   "initialized": true,
///   "root": 0,
///   "types": [{"namespace": "QmlWeb", "version": "1.0", "name": "RestModel"}],
///   "objects": [
///     {"class": "Item", "id": "root", "fields": {"children": [1]}, "teardown": [2]},
///     {"class": "Text", "id": "title", "properties": [["text", "Hello"]]},
///     {"class": "RestModel", "id": "users", "instanceOf": [0]}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    #[serde(default)]
    pub initialized: bool,
    #[serde(default)]
    pub root: Option<ObjectRef>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    pub objects: Vec<SceneObject>,
}

/// In-memory object graph addressed by index.
///
/// Objects may reference each other freely, including in cycles. The
/// initialized marker is atomic so a shared arena can be flipped to ready
/// while a page agent is probing it.
#[derive(Debug, Default)]
pub struct SceneArena {
    initialized: AtomicBool,
    root: Option<ObjectRef>,
    types: Vec<TypeEntry>,
    objects: Vec<SceneObject>,
}

impl SceneArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena from a description, checking every reference.
    pub fn from_description(description: SceneDescription) -> Result<Self> {
        let SceneDescription {
            initialized,
            root,
            types,
            objects,
        } = description;

        let in_range = |r: ObjectRef| r.index() < objects.len();
        if let Some(root) = root.filter(|r| !in_range(*r)) {
            return Err(Error::InvalidScene(format!("root {root} is out of range")));
        }
        for (index, object) in objects.iter().enumerate() {
            if let Some(bad) = object.references().find(|r| !in_range(*r)) {
                return Err(Error::InvalidScene(format!(
                    "object @{index} ({}) references missing object {bad}",
                    object.class
                )));
            }
            if let Some(bad) = object.instance_of.iter().find(|t| t.get() >= types.len()) {
                return Err(Error::InvalidScene(format!(
                    "object @{index} ({}) is an instance of unknown type #{}",
                    object.class,
                    bad.get()
                )));
            }
        }

        let mut arena = SceneArena {
            initialized: AtomicBool::new(initialized),
            root,
            types,
            objects: Vec::with_capacity(objects.len()),
        };
        for object in objects {
            arena.insert(object);
        }
        Ok(arena)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        Self::from_description(description)
    }

    /// Add an object and return its reference.
    pub fn insert(&mut self, mut object: SceneObject) -> ObjectRef {
        let handle = ObjectRef::new(self.objects.len());
        object.tree_id.get_or_insert(handle.index() as u64);
        self.objects.push(object);
        handle
    }

    /// Register a constructor; registering the same path twice returns the
    /// same handle.
    pub fn register_type(&mut self, path: TypePath<'_>) -> TypeHandle {
        if let Some(handle) = self.resolve_type(path) {
            return handle;
        }
        self.types.push(path.into());
        TypeHandle::new(self.types.len() - 1)
    }

    pub fn set_root(&mut self, root: ObjectRef) {
        self.root = Some(root);
    }

    pub fn object_mut(&mut self, handle: ObjectRef) -> Option<&mut SceneObject> {
        self.objects.get_mut(handle.index())
    }

    /// Flip the readiness marker; visible to concurrent probes.
    pub fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl InspectedRuntime for SceneArena {
    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn root(&self) -> Option<ObjectRef> {
        self.root
    }

    fn object(&self, handle: ObjectRef) -> Option<&dyn LiveObject> {
        self.objects
            .get(handle.index())
            .map(|object| object as &dyn LiveObject)
    }

    fn resolve_type(&self, path: TypePath<'_>) -> Option<TypeHandle> {
        self.types
            .iter()
            .position(|entry| entry.matches(&path))
            .map(TypeHandle::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "initialized": true,
        "root": 0,
        "types": [{"namespace": "QmlWeb", "version": "1.0", "name": "RestModel"}],
        "objects": [
            {"class": "Item", "id": "root", "fields": {"children": [1]}, "teardown": [2]},
            {"class": "Text", "id": "title", "properties": [["text", "Hello"], ["font", {"pixelSize": 12}]]},
            {"class": "RestModel", "id": "users", "instanceOf": [0], "treeId": 77}
        ]
    }"#;

    #[test]
    fn test_load_description() {
        let arena = SceneArena::from_json(SCENE).unwrap();
        assert!(arena.is_initialized());
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.root(), Some(ObjectRef::new(0)));

        let title = arena.object(ObjectRef::new(1)).unwrap();
        assert_eq!(title.type_tag(), "Text");
        assert_eq!(title.property_names(), vec!["text", "font"]);
        assert_eq!(title.tree_id(), 1);

        let rest = arena
            .resolve_type(TypePath::new("QmlWeb", "1.0", "RestModel"))
            .unwrap();
        let users = arena.object(ObjectRef::new(2)).unwrap();
        assert!(users.is_instance_of(rest));
        assert_eq!(users.tree_id(), 77);
    }

    #[test]
    fn test_rejects_dangling_reference() {
        let json = r#"{"objects": [{"class": "Item", "fields": {"children": [4]}}]}"#;
        assert!(matches!(
            SceneArena::from_json(json),
            Err(Error::InvalidScene(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let json = r#"{"objects": [{"class": "RestModel", "instanceOf": [0]}]}"#;
        assert!(matches!(
            SceneArena::from_json(json),
            Err(Error::InvalidScene(_))
        ));
    }

    #[test]
    fn test_register_type_is_idempotent() {
        let mut arena = SceneArena::new();
        let path = TypePath::new("QmlWeb", "1.0", "RestModel");
        assert_eq!(arena.register_type(path), arena.register_type(path));
        assert!(arena.resolve_type(TypePath::new("QmlWeb", "2.0", "RestModel")).is_none());
    }

    #[test]
    fn test_initialized_marker_flips() {
        let arena = SceneArena::new();
        assert!(!arena.is_initialized());
        arena.mark_initialized();
        assert!(arena.is_initialized());
    }
}
