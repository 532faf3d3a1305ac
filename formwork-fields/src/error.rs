//! Error types for field configuration and rendering.
//!
//! These are programmer or configuration errors and propagate with `?`.
//! Failures caused by submitted data are [`Invalid`](crate::Invalid) and are
//! aggregated instead.

use thiserror::Error;

/// Result type for field operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while building, binding or rendering fields
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A factory field names a type tag nobody registered
    #[error("can't find field implementation for '{tag}'")]
    UnknownFieldType { tag: String },

    /// Composite field constructed without children
    #[error("fields are required for composite field '{name}'")]
    EmptyComposite { name: String },

    /// Two fields with the same name in one fieldset
    #[error("duplicate field name: {name}")]
    DuplicateField { name: String },

    /// No template configured or defaulted for the requested slot
    #[error("no {slot} template for field '{field}'")]
    MissingTemplate { field: String, slot: &'static str },

    /// The request carries no renderer
    #[error("no renderer available to render field '{field}'")]
    NoRenderer { field: String },

    /// The renderer failed
    #[error("failed to render template '{template}': {message}")]
    Render { template: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::UnknownFieldType {
            tag: "customfield".into(),
        };
        assert_eq!(
            err.to_string(),
            "can't find field implementation for 'customfield'"
        );
    }

    #[test]
    fn test_render_error() {
        let err = FieldsError::Render {
            template: "fields:text".into(),
            message: "unexpected end".into(),
        };
        assert!(err.to_string().contains("fields:text"));
        assert!(err.to_string().contains("unexpected end"));
    }
}
