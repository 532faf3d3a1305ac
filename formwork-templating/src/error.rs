//! Error types for template loading and rendering

use std::path::PathBuf;

use thiserror::Error;

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;

/// Errors that can occur while loading or rendering templates
#[derive(Debug, Error)]
pub enum TemplatingError {
    /// No template registered under the requested name
    #[error("template not found: {0}")]
    NotFound(String),

    /// Template source failed to parse
    #[error("template parsing failed: {0}")]
    Parse(String),

    /// Template parsed but failed to render
    #[error("template rendering failed: {0}")]
    Render(String),

    /// Configuration could not be loaded
    #[error("failed to load templating configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration file with an extension we cannot read
    #[error("unsupported configuration file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Template directory could not be read
    #[error("failed to read templates from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<figment::Error> for TemplatingError {
    fn from(error: figment::Error) -> Self {
        TemplatingError::Config(Box::new(error))
    }
}

impl From<TemplatingError> for formwork_fields::FieldsError {
    fn from(error: TemplatingError) -> Self {
        let template = match &error {
            TemplatingError::NotFound(name) => name.clone(),
            _ => String::new(),
        };
        formwork_fields::FieldsError::Render {
            template,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TemplatingError::NotFound("fields:text".into()).to_string(),
            "template not found: fields:text"
        );
        assert_eq!(
            TemplatingError::UnsupportedFormat(PathBuf::from("forms.ini")).to_string(),
            "unsupported configuration file format: forms.ini"
        );
    }

    #[test]
    fn test_into_fields_error() {
        let err: formwork_fields::FieldsError = TemplatingError::NotFound("x".into()).into();
        assert!(matches!(
            err,
            formwork_fields::FieldsError::Render { ref template, .. } if template == "x"
        ));
    }
}
