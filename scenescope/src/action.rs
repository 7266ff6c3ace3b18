use std::{fmt, str::FromStr};

use crate::Label;

/// The closed action vocabulary shared by every component.
///
/// Wire messages carrying any other action decode to
/// [`Message::Unknown`](crate::Message::Unknown) and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Label)]
pub enum Action {
    /// Panel asks for a snapshot; the page answers with the same action.
    GetRoot,
    /// Panel announces itself for a tab (repeated until ready).
    DevtoolInit,
    /// Page agent found the inspected runtime.
    ContentInit,
    /// Relay tells both sides the channel is usable.
    DevtoolContentReady,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::GetRoot,
        Action::DevtoolInit,
        Action::ContentInit,
        Action::DevtoolContentReady,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.label() == s)
            .ok_or(())
    }
}
