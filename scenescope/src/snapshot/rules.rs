//! Fixed filtering rules applied by the snapshot walker.

use crate::scene::TypePath;

/// Layout, style and bookkeeping fields never copied into a snapshot.
pub const EXCLUDED_PROPERTIES: [&str; 27] = [
    "style",
    "parent",
    "htmlID",
    "htmlAttr",
    "data",
    "tagName",
    "baseClassName",
    "suffixClassName",
    "className",
    "customClass",
    "doc_label",
    "doc_mandatory",
    "doc_auto_input",
    "doc_condition",
    "doc_remark",
    "doc_read_only",
    "doc_skip",
    "doc_type",
    "north",
    "west",
    "east",
    "middle",
    "$children",
    "children",
    "$opacity",
    "resources",
    "delegate",
];

/// Property carrying the node's own identifier; always emitted first.
pub const ID_PROPERTY: &str = "id";

/// Repeating-template container: children come from its delegate.
pub const REPEATER: &str = "Repeater";

/// Composite layout whose accordion-content children are hidden.
pub const CARD_LAYOUT: &str = "Common.CardLayout";

pub const ACCORDION_CONTENT: &str = "AccordionContent";

/// REST data model type; teardown entries of this type become children.
pub const REST_MODEL: TypePath<'static> = TypePath::new("QmlWeb", "1.0", "RestModel");

pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_PROPERTIES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_fields_are_excluded_properties() {
        for field in crate::snapshot::ChildField::ALL {
            if field.as_str() != "content" {
                assert!(is_excluded(field.as_str()), "{}", field.as_str());
            }
        }
        assert!(!is_excluded("content"));
        assert!(!is_excluded(ID_PROPERTY));
    }
}
