//! The render boundary.
//!
//! Fields never render themselves. They pick a template and hand a
//! serialisable [`FieldView`] to the [`Renderer`] carried by the request.

use std::fmt;

use serde::Serialize;
use serde_json::Value as Json;

use crate::error::Result;
use crate::types::Mode;

/// Default widget wrapper for leaf fields.
pub const WIDGET_TEMPLATE: &str = "fields:widget";

/// Default input template for composite fields.
pub const COMPOSITE_TEMPLATE: &str = "form:composite";

/// Default widget wrapper for composites rendered with the default input template.
pub const COMPOSITE_WIDGET_TEMPLATE: &str = "form:widget-composite";

/// Widget wrapper for composites that supply their own input template.
pub const FORM_WIDGET_TEMPLATE: &str = "form:widget";

/// Template engine collaborator.
pub trait Renderer: Send + Sync + fmt::Debug {
    /// Render the named template with the field view as context.
    fn render(&self, template: &str, view: &FieldView) -> Result<String>;
}

/// Everything a template may read about a bound field.
///
/// Every key is always present so strict template engines can test for
/// `null` instead of failing on a missing variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub id: String,
    pub title: String,
    pub description: String,
    pub required: bool,
    pub readonly: bool,
    pub mode: Mode,
    pub css_class: Option<String>,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: Json,
    pub form_value: Json,
    pub error: Option<String>,
    /// Pre-rendered markup: the input inside a widget, or a child widget
    /// inside a composite.
    pub html: Option<String>,
    /// Child views of a composite, in child order.
    pub fields: Vec<FieldView>,
}
