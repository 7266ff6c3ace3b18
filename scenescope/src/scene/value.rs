use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ObjectRef;
use crate::Scalar;

/// Runtime value of a declared property.
///
/// Only [`PropertyValue::Scalar`] values make it into a snapshot; the other
/// variants exist so the walker can tell what it skipped.
///
/// In scene descriptions values are plain JSON, with `{"$ref": n}` for an
/// object reference, `{"$function": name}` for a function and
/// `{"$undefined": true}` for an explicit `undefined`. Any other JSON object
/// is a plain record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum PropertyValue {
    Scalar(Scalar),
    Object(ObjectRef),
    Record,
    List(Vec<PropertyValue>),
    Function(String),
}

impl PropertyValue {
    /// The snapshot value, if this property may be included.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            PropertyValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Runtime type name, as reported in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Scalar(Scalar::Bool(_)) => "boolean",
            PropertyValue::Scalar(Scalar::Number(_)) => "number",
            PropertyValue::Scalar(Scalar::String(_)) => "string",
            PropertyValue::Scalar(Scalar::Undefined) => "undefined",
            PropertyValue::Scalar(Scalar::Null)
            | PropertyValue::Object(_)
            | PropertyValue::Record
            | PropertyValue::List(_) => "object",
            PropertyValue::Function(_) => "function",
        }
    }
}

impl TryFrom<Value> for PropertyValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => PropertyValue::Scalar(Scalar::Null),
            Value::Bool(b) => PropertyValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => PropertyValue::Scalar(Scalar::Number(
                n.as_f64().ok_or_else(|| format!("number {n} is out of range"))?,
            )),
            Value::String(s) => PropertyValue::Scalar(Scalar::String(s)),
            Value::Array(items) => PropertyValue::List(
                items
                    .into_iter()
                    .map(PropertyValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                if let Some(index) = map.get("$ref") {
                    let index = index
                        .as_u64()
                        .ok_or_else(|| format!("invalid object reference {index}"))?;
                    PropertyValue::Object(ObjectRef::new(index as usize))
                } else if let Some(name) = map.get("$function") {
                    PropertyValue::Function(name.as_str().unwrap_or_default().to_owned())
                } else if map.contains_key("$undefined") {
                    PropertyValue::Scalar(Scalar::Undefined)
                } else {
                    PropertyValue::Record
                }
            }
        })
    }
}

impl From<Scalar> for PropertyValue {
    fn from(value: Scalar) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

impl From<ObjectRef> for PropertyValue {
    fn from(value: ObjectRef) -> Self {
        PropertyValue::Object(value)
    }
}

/// Value of a structural field: a single child, a (possibly nested) list of
/// children, or nothing.
///
/// In scene descriptions a slot is an object index, an array of slots, or
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot {
    Object(ObjectRef),
    List(Vec<Slot>),
    Empty,
}

impl Slot {
    pub fn list(children: impl IntoIterator<Item = ObjectRef>) -> Self {
        Slot::List(children.into_iter().map(Slot::Object).collect())
    }

    /// All object references in this slot, nested lists flattened, in order.
    pub fn flatten(&self) -> Vec<ObjectRef> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<ObjectRef>) {
        match self {
            Slot::Object(r) => out.push(*r),
            Slot::List(items) => items.iter().for_each(|item| item.flatten_into(out)),
            Slot::Empty => {}
        }
    }
}

impl From<ObjectRef> for Slot {
    fn from(value: ObjectRef) -> Self {
        Slot::Object(value)
    }
}
