//! Field types: the per-type conversion and validation behaviour.
//!
//! A [`FieldType`] is registered under a tag in the
//! [`FieldRegistry`](crate::FieldRegistry) and resolved by factory fields at
//! bind time. The built-in types cover the common HTML inputs.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::Result;
use crate::field::BoundField;
use crate::invalid::Invalid;
use crate::value::FieldValue;

/// Polymorphic behaviour of a field type.
///
/// All conversions default to identity. Sentinel values never reach
/// `to_form` or `to_field`; the bound field passes them through.
pub trait FieldType: Send + Sync + fmt::Debug {
    /// Registry tag of this type (e.g. `"text"`).
    fn tag(&self) -> &str;

    /// Field representation to display representation.
    fn to_form(&self, _field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        Ok(value.clone())
    }

    /// Submitted representation to field representation.
    fn to_field(&self, _field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        Ok(value.clone())
    }

    /// Type-specific checks, run after the declared type and required checks.
    fn validate(&self, _field: &BoundField, _value: &FieldValue) -> std::result::Result<(), Invalid> {
        Ok(())
    }

    /// Default template for INPUT mode.
    fn input_template(&self) -> Option<&str> {
        None
    }

    /// Default template for DISPLAY mode.
    fn display_template(&self) -> Option<&str> {
        None
    }
}

/// Which template a field renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Input,
    Display,
}

/// Callable template: renders a bound field directly.
pub type TemplateFn = Arc<dyn Fn(&BoundField) -> Result<String> + Send + Sync>;

/// A template reference: a name resolved by the renderer, or a callable.
#[derive(Clone)]
pub enum Template {
    Named(String),
    Callable(TemplateFn),
}

impl Template {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&BoundField) -> Result<String> + Send + Sync + 'static,
    {
        Template::Callable(Arc::new(f))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Template::Named(name) => Some(name),
            Template::Callable(_) => None,
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Template::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<&str> for Template {
    fn from(name: &str) -> Self {
        Template::Named(name.to_string())
    }
}

impl From<String> for Template {
    fn from(name: String) -> Self {
        Template::Named(name)
    }
}

/// Identity field, used by plain and composite fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicField;

impl FieldType for BasicField {
    fn tag(&self) -> &str {
        "field"
    }
}

/// Single-line text input.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextField;

impl FieldType for TextField {
    fn tag(&self) -> &str {
        "text"
    }

    fn to_form(&self, _field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        Ok(match value {
            FieldValue::Value(Json::Number(n)) => FieldValue::from(n.to_string()),
            FieldValue::Value(Json::Bool(b)) => FieldValue::from(b.to_string()),
            other => other.clone(),
        })
    }

    fn input_template(&self) -> Option<&str> {
        Some("fields:text")
    }

    fn display_template(&self) -> Option<&str> {
        Some("fields:text-display")
    }
}

/// Integer input, submitted as a decimal string.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerField;

impl FieldType for IntegerField {
    fn tag(&self) -> &str {
        "int"
    }

    fn to_form(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        match value {
            FieldValue::Value(Json::Number(n)) if n.is_i64() || n.is_u64() => {
                Ok(FieldValue::from(n.to_string()))
            }
            FieldValue::Value(Json::String(_)) => Ok(value.clone()),
            other => Err(Invalid::new(field, format!("\"{other}\" is not an integer"))),
        }
    }

    fn to_field(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        match value {
            FieldValue::Value(Json::Number(n)) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            FieldValue::Value(Json::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(FieldValue::from)
                .map_err(|_| Invalid::new(field, format!("\"{s}\" is not an integer"))),
            other => Err(Invalid::new(field, format!("\"{other}\" is not an integer"))),
        }
    }

    fn input_template(&self) -> Option<&str> {
        Some("fields:int")
    }

    fn display_template(&self) -> Option<&str> {
        Some("fields:text-display")
    }
}

/// Floating point input.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatField;

impl FieldType for FloatField {
    fn tag(&self) -> &str {
        "float"
    }

    fn to_form(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        match value {
            FieldValue::Value(Json::Number(n)) => Ok(FieldValue::from(n.to_string())),
            FieldValue::Value(Json::String(_)) => Ok(value.clone()),
            other => Err(Invalid::new(field, format!("\"{other}\" is not a number"))),
        }
    }

    fn to_field(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        let parsed = match value {
            FieldValue::Value(Json::Number(n)) => n.as_f64(),
            FieldValue::Value(Json::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|f| f.is_finite())
            .map(FieldValue::from)
            .ok_or_else(|| Invalid::new(field, format!("\"{value}\" is not a number")))
    }

    fn input_template(&self) -> Option<&str> {
        Some("fields:float")
    }

    fn display_template(&self) -> Option<&str> {
        Some("fields:text-display")
    }
}

/// Checkbox. An unchecked box submits nothing, so it is seen as absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolField;

impl FieldType for BoolField {
    fn tag(&self) -> &str {
        "bool"
    }

    fn to_form(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        self.to_field(field, value)
    }

    fn to_field(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        match value {
            FieldValue::Value(Json::Bool(_)) => Ok(value.clone()),
            FieldValue::Value(Json::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(FieldValue::from(true)),
                "false" | "off" | "no" | "0" => Ok(FieldValue::from(false)),
                _ => Err(Invalid::new(field, format!("\"{s}\" is not a boolean"))),
            },
            other => Err(Invalid::new(field, format!("\"{other}\" is not a boolean"))),
        }
    }

    fn input_template(&self) -> Option<&str> {
        Some("fields:bool")
    }

    fn display_template(&self) -> Option<&str> {
        Some("fields:text-display")
    }
}

/// Textarea holding one list item per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinesField;

impl FieldType for LinesField {
    fn tag(&self) -> &str {
        "lines"
    }

    fn to_form(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        match value {
            FieldValue::Value(Json::Array(items)) => {
                let lines: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        Json::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                Ok(FieldValue::from(lines.join("\n")))
            }
            FieldValue::Value(Json::String(_)) => Ok(value.clone()),
            other => Err(Invalid::new(field, format!("\"{other}\" is not a list"))),
        }
    }

    fn to_field(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        match value {
            FieldValue::Value(Json::String(s)) => Ok(FieldValue::Value(Json::Array(
                s.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(|line| Json::String(line.to_string()))
                    .collect(),
            ))),
            FieldValue::Value(Json::Array(_)) => Ok(value.clone()),
            other => Err(Invalid::new(field, format!("\"{other}\" is not a list"))),
        }
    }

    fn input_template(&self) -> Option<&str> {
        Some("fields:lines")
    }

    fn display_template(&self) -> Option<&str> {
        Some("fields:text-display")
    }
}

/// Every built-in type, in registration order.
pub fn builtin_types() -> Vec<Arc<dyn FieldType>> {
    vec![
        Arc::new(BasicField),
        Arc::new(TextField),
        Arc::new(IntegerField),
        Arc::new(FloatField),
        Arc::new(BoolField),
        Arc::new(LinesField),
    ]
}
