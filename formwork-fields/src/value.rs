//! Field values and the sentinels that distinguish "absent" from "empty".
//!
//! A form value can be in one of three states that must never be conflated:
//! the parameter was not supplied at all ([`FieldValue::Absent`]), the field
//! has no fallback and must be present ([`FieldValue::Required`]), or a real
//! value exists, including JSON `null` and the empty string.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use serde_json::Value as Json;

/// A value flowing through a field's bind/update/convert/validate lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Nothing was supplied (the `null` sentinel).
    #[default]
    Absent,

    /// No value and no fallback; validation reports the field as required.
    Required,

    /// A concrete value. `Json::Null` is an intentional empty value, not absence.
    Value(Json),

    /// A composite value keyed by child field name, in child order.
    Map(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// An empty composite value.
    pub fn empty_map() -> Self {
        FieldValue::Map(IndexMap::new())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn is_required(&self) -> bool {
        matches!(self, FieldValue::Required)
    }

    /// True for either sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, FieldValue::Absent | FieldValue::Required)
    }

    /// Absent, or the language-level empty value (`Json::Null`).
    pub fn is_none_like(&self) -> bool {
        matches!(self, FieldValue::Absent | FieldValue::Value(Json::Null))
    }

    /// Falsiness as used for submitted parameters.
    ///
    /// `Absent` is falsy; `Required` is a marker and never falsy.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Required => false,
            FieldValue::Value(v) => is_falsy(v),
            FieldValue::Map(m) => m.is_empty(),
        }
    }

    pub fn as_json(&self) -> Option<&Json> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Json::as_str)
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Whether this value is a mapping, either composite or JSON object.
    pub fn is_mapping(&self) -> bool {
        matches!(self, FieldValue::Map(_) | FieldValue::Value(Json::Object(_)))
    }

    /// Look up a child entry of a mapping value.
    ///
    /// Works on both `Map` and JSON-object values. Anything else, or a
    /// missing key, yields `Absent`.
    pub fn child(&self, name: &str) -> FieldValue {
        match self {
            FieldValue::Map(m) => m.get(name).cloned().unwrap_or_default(),
            FieldValue::Value(Json::Object(obj)) => obj
                .get(name)
                .map(|v| FieldValue::Value(v.clone()))
                .unwrap_or_default(),
            _ => FieldValue::Absent,
        }
    }

    /// The (name, value) pairs of a mapping value, or `None` if this is not one.
    pub fn entries(&self) -> Option<Vec<(String, FieldValue)>> {
        match self {
            FieldValue::Map(m) => Some(m.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            FieldValue::Value(Json::Object(obj)) => Some(
                obj.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::Value(v.clone())))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Plain JSON form. Sentinels become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            FieldValue::Absent | FieldValue::Required => Json::Null,
            FieldValue::Value(v) => v.clone(),
            FieldValue::Map(m) => Json::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Absent | FieldValue::Required => serializer.serialize_none(),
            FieldValue::Value(v) => v.serialize(serializer),
            FieldValue::Map(m) => serializer.collect_map(m.iter()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => f.write_str("<absent>"),
            FieldValue::Required => f.write_str("<required>"),
            FieldValue::Value(Json::String(s)) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<Json> for FieldValue {
    fn from(value: Json) -> Self {
        FieldValue::Value(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Value(Json::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Value(Json::String(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Value(Json::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Value(Json::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Value(Json::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Value(Json::Bool(value))
    }
}

impl From<IndexMap<String, FieldValue>> for FieldValue {
    fn from(value: IndexMap<String, FieldValue>) -> Self {
        FieldValue::Map(value)
    }
}

/// HTML-param falsiness: `null`, `false`, zero, `""`, `[]` and `{}`.
///
/// A submitted `"0"` is a non-empty string and therefore truthy; a numeric
/// zero is not.
pub fn is_falsy(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::Bool(b) => !b,
        Json::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Json::String(s) => s.is_empty(),
        Json::Array(a) => a.is_empty(),
        Json::Object(o) => o.is_empty(),
    }
}

/// Declared value type of a field (`typ`), checked by `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    String,
    Integer,
    Number,
    Boolean,
    List,
    Mapping,
}

impl ValueType {
    /// Whether `value` is an instance of this type. Sentinels never match.
    pub fn matches(self, value: &FieldValue) -> bool {
        match (self, value) {
            (ValueType::Mapping, FieldValue::Map(_)) => true,
            (_, FieldValue::Value(v)) => match self {
                ValueType::String => v.is_string(),
                ValueType::Integer => v.is_i64() || v.is_u64(),
                ValueType::Number => v.is_number(),
                ValueType::Boolean => v.is_boolean(),
                ValueType::List => v.is_array(),
                ValueType::Mapping => v.is_object(),
            },
            _ => false,
        }
    }
}
