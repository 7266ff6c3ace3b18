use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an inspected browser tab.
///
/// The relay keys its sessions by this value; panels learn it from the
/// devtools host and send it with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(u32);

impl TabId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for TabId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
