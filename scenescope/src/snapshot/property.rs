use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IgnoredAny, MapAccess, Visitor},
    ser::SerializeMap,
};

use super::Scalar;

/// One snapshot property, encoded as a single-entry map `{name: value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Scalar,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Serialize for Property {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertyVisitor;

        impl<'de> Visitor<'de> for PropertyVisitor {
            type Value = Property;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map with exactly one entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Property, A::Error> {
                let Some((name, value)) = map.next_entry::<String, Scalar>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                if map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(Property { name, value })
            }
        }

        deserializer.deserialize_map(PropertyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_entry_map() {
        let value = serde_json::to_value(Property::new("width", 120)).unwrap();
        assert_eq!(value, json!({"width": 120.0}));

        let property: Property = serde_json::from_value(json!({"visible": false})).unwrap();
        assert_eq!(property, Property::new("visible", false));
    }

    #[test]
    fn test_null_and_undefined_encode_as_null() {
        assert_eq!(
            serde_json::to_value(Property::new("model", Scalar::Null)).unwrap(),
            json!({"model": null})
        );
        assert_eq!(
            serde_json::to_value(Property::new("source", Scalar::Undefined)).unwrap(),
            json!({"source": null})
        );
    }

    #[test]
    fn test_rejects_multi_entry_map() {
        assert!(serde_json::from_value::<Property>(json!({"a": 1, "b": 2})).is_err());
        assert!(serde_json::from_value::<Property>(json!({})).is_err());
    }
}
