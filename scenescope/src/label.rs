use std::borrow::Cow;

/// Human-readable name of a protocol item.
///
/// Derive it with `#[derive(Label)]` to get the enum variant name. Used for
/// structured log fields and for matching the wire names of actions.
pub trait Label {
    /// Returns a human-readable label for this item.
    fn label(&self) -> Cow<'static, str>;
}
