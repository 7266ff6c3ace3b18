use std::{fmt, hash::Hash, sync::Arc};

use uuid::Uuid;

/// Identity of one end of a relay connection.
///
/// A panel gets a fresh `PortId` every time it connects to the relay, so a
/// reconnecting panel never inherits the binding of its predecessor. Cheap to
/// clone; equality is by the generated id, the name is for logs only.
#[derive(Debug, Clone)]
pub struct PortId {
    id: u128,
    name: Arc<str>,
}

impl PortId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4().as_u128(),
            name: name.into(),
        }
    }

    #[inline(always)]
    pub fn id(&self) -> u128 {
        self.id
    }

    /// Returns the name the port was opened with.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for PortId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PortId {}

impl Hash for PortId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.name, self.id as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_with_same_name_are_distinct() {
        let a = PortId::new("devtool");
        let b = PortId::new("devtool");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(a.to_string().starts_with("devtool#"));
    }
}
