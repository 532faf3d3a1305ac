//! Validation and conversion failures caused by submitted data.
//!
//! A leaf failure is [`Invalid::Field`]. A composite that collected one or
//! more child failures reports [`Invalid::Composite`], whose children may be
//! composites themselves, so the error tree mirrors the field tree.

use serde::Serialize;
use thiserror::Error;

use crate::field::BoundField;

/// A single-field or aggregated validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Invalid {
    /// One field failed to convert or validate.
    #[error("{field}: {}", .message.as_deref().unwrap_or("invalid value"))]
    Field {
        /// Bound (dotted) name of the offending field
        field: String,
        message: Option<String>,
        /// Local name tag assigned by an aggregating parent
        name: Option<String>,
    },

    /// Several children of a composite failed in the same pass.
    #[error("{0}")]
    Composite(CompositeError),
}

/// Aggregate failure of a composite field.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{field}: {} invalid field(s)", .errors.len())]
pub struct CompositeError {
    pub field: String,
    pub message: Option<String>,
    pub name: Option<String>,
    /// Child failures in child order, each tagged with the child's local name
    pub errors: Vec<Invalid>,
}

impl Invalid {
    /// Failure of `field` with a message.
    pub fn new(field: &BoundField, message: impl Into<String>) -> Self {
        Invalid::Field {
            field: field.name().to_string(),
            message: Some(message.into()),
            name: None,
        }
    }

    /// Failure of `field` without a message.
    pub fn bare(field: &BoundField) -> Self {
        Invalid::Field {
            field: field.name().to_string(),
            message: None,
            name: None,
        }
    }

    /// Aggregate failure of a composite field.
    pub fn composite(field: &BoundField, errors: Vec<Invalid>) -> Self {
        Invalid::Composite(CompositeError {
            field: field.name().to_string(),
            message: None,
            name: None,
            errors,
        })
    }

    /// Bound name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            Invalid::Field { field, .. } => field,
            Invalid::Composite(c) => &c.field,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Invalid::Field { message, .. } => message.as_deref(),
            Invalid::Composite(c) => c.message.as_deref(),
        }
    }

    /// Local name tag, set by the composite that collected this error.
    pub fn name(&self) -> Option<&str> {
        match self {
            Invalid::Field { name, .. } => name.as_deref(),
            Invalid::Composite(c) => c.name.as_deref(),
        }
    }

    pub fn set_name(&mut self, tag: impl Into<String>) {
        let tag = Some(tag.into());
        match self {
            Invalid::Field { name, .. } => *name = tag,
            Invalid::Composite(c) => c.name = tag,
        }
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Invalid::Field { message, .. } => *message = text,
            Invalid::Composite(c) => c.message = text,
        }
        self
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Invalid::Composite(_))
    }

    /// Child errors of a composite failure; empty for a leaf.
    pub fn errors(&self) -> &[Invalid] {
        match self {
            Invalid::Field { .. } => &[],
            Invalid::Composite(c) => &c.errors,
        }
    }

    /// Child error by local name tag.
    pub fn get(&self, tag: &str) -> Option<&Invalid> {
        self.errors().iter().find(|e| e.name() == Some(tag))
    }

    /// Every leaf failure as `(bound name, message)`, depth first in child order.
    ///
    /// A composite that carries its own message (for example from its
    /// validator) contributes an entry as well.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<(String, String)>) {
        match self {
            Invalid::Field { field, message, .. } => out.push((
                field.clone(),
                message.clone().unwrap_or_else(|| "invalid value".to_string()),
            )),
            Invalid::Composite(c) => {
                if let Some(message) = &c.message {
                    out.push((c.field.clone(), message.clone()));
                }
                for child in &c.errors {
                    child.flatten_into(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::registry::{Binding, Request};
    use crate::value::FieldValue;

    fn leaf(field: &str, message: &str, tag: &str) -> Invalid {
        Invalid::Field {
            field: field.into(),
            message: Some(message.into()),
            name: Some(tag.into()),
        }
    }

    #[test]
    fn leaf_display() {
        let err = leaf("addr.zip", "Required", "zip");
        assert_eq!(err.to_string(), "addr.zip: Required");
        assert!(!err.is_composite());
        assert!(err.errors().is_empty());
    }

    #[test]
    fn composite_display_and_lookup() {
        let err = Invalid::Composite(CompositeError {
            field: "addr".into(),
            message: None,
            name: None,
            errors: vec![leaf("addr.zip", "Required", "zip"), leaf("addr.city", "Bad", "city")],
        });
        assert_eq!(err.to_string(), "addr: 2 invalid field(s)");
        assert_eq!(err.get("city").and_then(Invalid::message), Some("Bad"));
        assert!(err.get("street").is_none());
    }

    #[test]
    fn flatten_walks_nested_composites() {
        let inner = Invalid::Composite(CompositeError {
            field: "person.addr".into(),
            message: None,
            name: Some("addr".into()),
            errors: vec![leaf("person.addr.zip", "Required", "zip")],
        });
        let outer = Invalid::Composite(CompositeError {
            field: "person".into(),
            message: Some("Incomplete".into()),
            name: None,
            errors: vec![leaf("person.name", "Too short", "name"), inner],
        });
        assert_eq!(
            outer.flatten(),
            vec![
                ("person".to_string(), "Incomplete".to_string()),
                ("person.name".to_string(), "Too short".to_string()),
                ("person.addr.zip".to_string(), "Required".to_string()),
            ]
        );
    }

    #[test]
    fn bare_error_takes_message_later() {
        let binding = Binding::new(Request::default());
        let bound = Field::new("zip")
            .bind(&binding, "addr.", FieldValue::Absent)
            .unwrap();

        let err = Invalid::bare(&bound);
        assert_eq!(err.field(), "addr.zip");
        assert_eq!(err.message(), None);
        assert_eq!(
            err.flatten(),
            vec![("addr.zip".to_string(), "invalid value".to_string())]
        );

        let err = err.with_message("Too long");
        assert_eq!(err.message(), Some("Too long"));
        assert_eq!(err.to_string(), "addr.zip: Too long");
    }

    #[test]
    fn set_name_tags_either_variant() {
        let mut err = Invalid::Field {
            field: "x".into(),
            message: None,
            name: None,
        };
        err.set_name("x");
        assert_eq!(err.name(), Some("x"));
        assert_eq!(err.to_string(), "x: invalid value");
    }
}
