//! Integration test for the Label derive macro.

use scenescope::{Action, Label, Message, Source};

#[derive(Label)]
#[allow(dead_code)]
enum Hop {
    PanelToRelay,
    RelayToPage(u32),
    Window { capacity: usize },
}

#[derive(Label)]
struct Probe;

#[test]
fn test_derived_label_unit() {
    assert_eq!(Hop::PanelToRelay.label(), "PanelToRelay");
}

#[test]
fn test_derived_label_tuple_and_struct_variants() {
    assert_eq!(Hop::RelayToPage(1).label(), "RelayToPage");
    assert_eq!(Hop::Window { capacity: 8 }.label(), "Window");
}

#[test]
fn test_derived_label_on_struct_is_type_name() {
    assert_eq!(Probe.label(), "Probe");
}

#[test]
fn test_protocol_labels_match_action_names() {
    for action in Action::ALL {
        assert_eq!(action.label(), action.to_string());
    }
    assert_eq!(Message::ContentInit.label(), "ContentInit");
    assert_eq!(Source::Background.label(), "Background");
}
