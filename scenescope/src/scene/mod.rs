//! Capability surface of the inspected runtime.
//!
//! The page agent only needs a handful of things from the application it
//! inspects: whether the runtime is up, its root object, per-object
//! introspection and a way to identify instances of a named type. Any
//! runtime exposing these through [`InspectedRuntime`] and [`LiveObject`]
//! can be snapshotted. [`SceneArena`] is an in-memory implementation.

mod arena;
mod value;

pub use arena::{SceneArena, SceneDescription, SceneObject, TypeEntry};
pub use value::{PropertyValue, Slot};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Scalar;

/// Reference to a live object, as handed out by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(usize);

impl ObjectRef {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Opaque handle to a resolved constructor/type of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle(usize);

impl TypeHandle {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Fully qualified type name: namespace, version and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypePath<'a> {
    pub namespace: &'a str,
    pub version: &'a str,
    pub name: &'a str,
}

impl<'a> TypePath<'a> {
    pub const fn new(namespace: &'a str, version: &'a str, name: &'a str) -> Self {
        Self {
            namespace,
            version,
            name,
        }
    }
}

impl fmt::Display for TypePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.namespace, self.version, self.name)
    }
}

/// Introspection of one live object.
pub trait LiveObject {
    /// Declared type tag, e.g. `"Rectangle"` or `"Common.CardLayout"`.
    fn type_tag(&self) -> &str;

    /// The object's own identifier.
    fn identifier(&self) -> Scalar;

    /// Stable id correlating snapshot nodes back to the object.
    fn tree_id(&self) -> u64;

    /// Declared property names, in declaration order.
    fn property_names(&self) -> Vec<&str>;

    /// Current value of a property; `None` reads as `undefined`.
    fn property(&self, name: &str) -> Option<&PropertyValue>;

    /// An own structural attribute (children or layout slot), if present.
    fn structural_field(&self, name: &str) -> Option<&Slot>;

    /// Children materialized by the object's delegate, for repeating
    /// containers.
    fn delegate_children(&self) -> Option<&[Slot]>;

    /// Objects registered for teardown together with this one.
    fn teardown_registry(&self) -> &[ObjectRef];

    fn is_instance_of(&self, ty: TypeHandle) -> bool;
}

/// The global registry of the inspected runtime.
pub trait InspectedRuntime: Send + Sync + 'static {
    /// Readiness marker; the page agent probes it until it turns true.
    fn is_initialized(&self) -> bool;

    fn root(&self) -> Option<ObjectRef>;

    fn object(&self, handle: ObjectRef) -> Option<&dyn LiveObject>;

    /// Resolves a named constructor, used only for instance checks.
    fn resolve_type(&self, path: TypePath<'_>) -> Option<TypeHandle>;
}
