//! Liquid implementation of the field render boundary.

use std::sync::Arc;

use formwork_fields::{FieldView, FieldsError, Renderer};
use liquid::model::{to_value, Object, Value};

use crate::engine::TemplateEngine;
use crate::error::Result;

/// Renders fields with a shared [`TemplateEngine`].
///
/// The view is available to templates both as `field` and as top-level
/// variables, so `{{ field.title }}` and `{{ title }}` are equivalent.
#[derive(Debug, Clone)]
pub struct LiquidRenderer {
    engine: Arc<TemplateEngine>,
}

impl LiquidRenderer {
    pub fn new(engine: Arc<TemplateEngine>) -> Self {
        Self { engine }
    }

    /// Renderer over the bundled templates.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(TemplateEngine::builtin()?)))
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }
}

impl Renderer for LiquidRenderer {
    fn render(&self, template: &str, view: &FieldView) -> formwork_fields::Result<String> {
        let globals = view_globals(view).map_err(|message| FieldsError::Render {
            template: template.to_string(),
            message,
        })?;

        self.engine
            .render(template, &globals)
            .map_err(|e| FieldsError::Render {
                template: template.to_string(),
                message: e.to_string(),
            })
    }
}

/// Template globals for a view: its keys at the top level plus `field`.
pub fn view_globals(view: &FieldView) -> std::result::Result<Object, String> {
    let value = to_value(view).map_err(|e| e.to_string())?;
    let mut globals = match &value {
        Value::Object(object) => object.clone(),
        _ => Object::new(),
    };
    globals.insert("field".into(), value);
    Ok(globals)
}
