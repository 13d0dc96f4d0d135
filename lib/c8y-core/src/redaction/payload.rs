use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use super::{FieldPath, RedactionError};

/// Maximum nesting of objects and arrays accepted in a [`Payload`].
pub const MAX_DEPTH: usize = 128;

/// Library-neutral tree representation of a JSON document.
///
/// Objects keep their keys in insertion order, so a payload encoded from a
/// struct serializes its fields in declaration order after redaction.
///
/// Conversions with [`serde_json::Value`] live at this boundary only; the
/// redaction itself works on `Payload`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// JSON string.
    String(String),
    /// Ordered sequence of payloads.
    Array(Vec<Payload>),
    /// Ordered mapping of keys to payloads.
    Object(IndexMap<String, Payload>),
}

impl Payload {
    /// Encodes any serializable value into a payload tree.
    ///
    /// # Errors
    ///
    /// Returns [`RedactionError::InvalidPayload`] if the value cannot be encoded
    /// as JSON (e.g. a map with non-string keys) or nests deeper than
    /// [`MAX_DEPTH`].
    pub fn encode<T>(value: &T) -> Result<Self, RedactionError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(|err| RedactionError::InvalidPayload {
            message: err.to_string(),
        })?;
        Self::try_from(value)
    }

    /// Serializes the payload to JSON bytes.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying writer fails, which cannot happen for a `Vec`.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Returns `true` if the payload is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns the inner map if the payload is an object.
    pub fn as_object(&self) -> Option<&IndexMap<String, Payload>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the inner map mutably if the payload is an object.
    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Payload>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the inner elements if the payload is an array.
    pub fn as_array(&self) -> Option<&[Payload]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key, if the payload is an object.
    pub fn get(&self, key: &str) -> Option<&Payload> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Follows a field path through nested objects.
    ///
    /// Returns `None` as soon as a segment is missing or a non-object is met.
    pub fn resolve(&self, path: &FieldPath) -> Option<&Payload> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// Nesting depth: `0` for scalars, `1` for a flat object or array.
    pub fn depth(&self) -> usize {
        match self {
            Self::Array(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
            Self::Object(map) => 1 + map.values().map(Self::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    fn from_value(value: Value, depth: usize) -> Result<Self, RedactionError> {
        let result = match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(string) => Self::String(string),
            Value::Array(items) => {
                Self::check_depth(depth)?;
                let items = items
                    .into_iter()
                    .map(|item| Self::from_value(item, depth + 1))
                    .collect::<Result<_, _>>()?;
                Self::Array(items)
            }
            Value::Object(map) => {
                Self::check_depth(depth)?;
                let map = map
                    .into_iter()
                    .map(|(key, item)| Ok((key, Self::from_value(item, depth + 1)?)))
                    .collect::<Result<_, RedactionError>>()?;
                Self::Object(map)
            }
        };
        Ok(result)
    }

    fn check_depth(depth: usize) -> Result<(), RedactionError> {
        if depth >= MAX_DEPTH {
            return Err(RedactionError::InvalidPayload {
                message: format!("nesting exceeds the maximum depth of {MAX_DEPTH}"),
            });
        }
        Ok(())
    }
}

impl TryFrom<Value> for Payload {
    type Error = RedactionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value, 0)
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Null => Value::Null,
            Payload::Bool(flag) => Value::Bool(flag),
            Payload::Number(number) => Value::Number(number),
            Payload::String(string) => Value::String(string),
            Payload::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Payload::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<IndexMap<String, Payload>> for Payload {
    fn from(map: IndexMap<String, Payload>) -> Self {
        Self::Object(map)
    }
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(number) => number.serialize(serializer),
            Self::String(string) => serializer.serialize_str(string),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut ser = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    ser.serialize_entry(key, item)?;
                }
                ser.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Alarm {
        id: Option<String>,
        text: String,
        severity: String,
        source: Source,
    }

    #[derive(Serialize)]
    struct Source {
        id: String,
    }

    #[test]
    fn should_encode_struct_in_declaration_order() {
        let alarm = Alarm {
            id: Some("42".to_string()),
            text: "Door open".to_string(),
            severity: "MAJOR".to_string(),
            source: Source {
                id: "1001".to_string(),
            },
        };

        let payload = Payload::encode(&alarm).expect("should encode");

        let keys = payload
            .as_object()
            .expect("an object")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys, ["id", "text", "severity", "source"]);

        let json = String::from_utf8(payload.to_json_vec().expect("should serialize"))
            .expect("valid UTF-8");
        insta::assert_snapshot!(json, @r#"{"id":"42","text":"Door open","severity":"MAJOR","source":{"id":"1001"}}"#);
    }

    #[test]
    fn should_round_trip_through_serde_json_value() {
        let value = json!({"b": [1, true, null, "x"], "a": {"c": 1.5}});

        let payload = Payload::try_from(value.clone()).expect("should convert");
        let back = Value::from(payload);

        assert_eq!(back, value);
        assert_eq!(
            serde_json::to_string(&back).expect("serialize"),
            r#"{"b":[1,true,null,"x"],"a":{"c":1.5}}"#
        );
    }

    #[test]
    fn should_deserialize_payload() {
        let payload: Payload =
            serde_json::from_str(r#"{"z": 1, "a": [2]}"#).expect("should deserialize");

        insta::assert_debug_snapshot!(payload, @r#"
        Object(
            {
                "z": Number(1),
                "a": Array(
                    [
                        Number(2),
                    ],
                ),
            },
        )
        "#);
    }

    #[test]
    fn should_reject_too_deep_payload() {
        let mut value = json!(1);
        for _ in 0..=MAX_DEPTH {
            value = json!([value]);
        }

        let result = Payload::try_from(value);

        assert!(matches!(
            result,
            Err(RedactionError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn should_accept_payload_at_max_depth() {
        let mut value = json!(1);
        for _ in 0..MAX_DEPTH {
            value = json!({ "nested": value });
        }

        let payload = Payload::try_from(value).expect("should convert");

        assert_eq!(payload.depth(), MAX_DEPTH);
    }

    #[test]
    fn should_reject_unencodable_value() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1, 2), "tuple keys are not JSON");

        let result = Payload::encode(&map);

        assert!(matches!(
            result,
            Err(RedactionError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn should_resolve_nested_path() {
        let payload =
            Payload::try_from(json!({"source": {"id": "1", "tags": ["a"]}})).expect("convert");

        let id = FieldPath::parse("source.id").expect("valid path");
        let through_array = FieldPath::parse("source.tags.0").expect("valid path");

        assert_eq!(
            payload.resolve(&id),
            Some(&Payload::String("1".to_string()))
        );
        assert_eq!(payload.resolve(&through_array), None);
    }
}
