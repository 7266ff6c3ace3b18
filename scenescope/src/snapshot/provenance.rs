use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural fields that hold "layout slot" or "children" relations, in the
/// order they are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildField {
    Children,
    MetaChildren,
    North,
    East,
    West,
    Middle,
    Content,
}

impl ChildField {
    pub const ALL: [ChildField; 7] = [
        ChildField::Children,
        ChildField::MetaChildren,
        ChildField::North,
        ChildField::East,
        ChildField::West,
        ChildField::Middle,
        ChildField::Content,
    ];

    /// Attribute name on the live object.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChildField::Children => "children",
            ChildField::MetaChildren => "$children",
            ChildField::North => "north",
            ChildField::East => "east",
            ChildField::West => "west",
            ChildField::Middle => "middle",
            ChildField::Content => "content",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ChildField::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Which relation produced a child node: `from` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provenance {
    Field(ChildField),
    Repeater,
    RestModel,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Field(field) => field.as_str(),
            Provenance::Repeater => "Repeater",
            Provenance::RestModel => "RestModel",
        }
    }
}

impl TryFrom<String> for Provenance {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        match tag.as_str() {
            "Repeater" => Ok(Provenance::Repeater),
            "RestModel" => Ok(Provenance::RestModel),
            other => ChildField::from_name(other)
                .map(Provenance::Field)
                .ok_or_else(|| format!("unknown provenance tag '{tag}'")),
        }
    }
}

impl From<Provenance> for String {
    fn from(provenance: Provenance) -> Self {
        provenance.as_str().to_owned()
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        let tag = serde_json::to_string(&Provenance::Field(ChildField::MetaChildren)).unwrap();
        assert_eq!(tag, r#""$children""#);
        let parsed: Provenance = serde_json::from_str(r#""RestModel""#).unwrap();
        assert_eq!(parsed, Provenance::RestModel);
        assert!(serde_json::from_str::<Provenance>(r#""sidebar""#).is_err());
    }
}
