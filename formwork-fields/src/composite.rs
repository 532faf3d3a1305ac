//! Composite fields: a named group of child fields with a mapping value.
//!
//! A composite binds its children recursively, extracts a mapping of their
//! submitted values, and converts and validates every child in one pass.
//! When several children fail, all of them are reported in a single
//! [`Invalid::Composite`] in child order and each failing child keeps its
//! own error for display.

use std::sync::Arc;

use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::field::{BoundField, Field, FieldKind};
use crate::fieldset::Fieldset;
use crate::invalid::Invalid;
use crate::registry::Binding;
use crate::render::{COMPOSITE_TEMPLATE, COMPOSITE_WIDGET_TEMPLATE, FORM_WIDGET_TEMPLATE};
use crate::types::{BasicField, Mode, Template};
use crate::value::FieldValue;

impl Field {
    /// Composite of `fields`, which bind under `name.`.
    ///
    /// ```
    /// use formwork_fields::{Field, IntegerField};
    ///
    /// let addr = Field::composite(
    ///     "addr",
    ///     vec![Field::new("street"), Field::typed("zip", IntegerField)],
    /// )
    /// .unwrap();
    /// assert_eq!(addr.fields().unwrap().prefix(), "addr.");
    /// ```
    pub fn composite(name: impl Into<String>, fields: Vec<Field>) -> Result<Self> {
        Self::composite_from(name, Fieldset::from_fields(fields)?)
    }

    /// Composite over an existing fieldset. The fieldset's prefix is replaced.
    pub fn composite_from(name: impl Into<String>, mut fields: Fieldset) -> Result<Self> {
        let name = name.into();
        if fields.is_empty() {
            return Err(FieldsError::EmptyComposite { name });
        }
        fields.set_prefix(format!("{name}."));
        Ok(Self::from_kind(name, FieldKind::Composite(fields)))
    }
}

/// Bind a composite prototype and, through its fieldset, every child.
///
/// An absent or `null` value binds as an empty mapping. Children bind
/// relative to the composite: only the fieldset prefix names them, and the
/// outer `prefix` applies to the composite itself.
pub(crate) fn bind_composite(
    prototype: &Field,
    fields: &Fieldset,
    binding: &Binding,
    prefix: &str,
    value: FieldValue,
) -> Result<BoundField> {
    let value = if value.is_none_like() {
        FieldValue::empty_map()
    } else {
        value
    };

    let mut bound = BoundField::from_prototype(prototype, Arc::new(BasicField), binding, prefix, value);
    let children = fields.bind(binding, bound.value(), "")?;
    debug!(field = %bound.name(), children = children.len(), "bound composite");
    bound.children = Some(children);
    Ok(bound)
}

impl BoundField {
    pub(crate) fn composite_to_field(
        &mut self,
        value: &FieldValue,
    ) -> std::result::Result<FieldValue, Invalid> {
        if !value.is_mapping() {
            return Err(Invalid::new(self, "Wrong type"));
        }

        let outcome = match self.children.as_mut() {
            Some(children) => children.to_field(value),
            None => Ok(value.clone()),
        };

        outcome.map_err(|errors| {
            debug!(field = %self.name, errors = errors.len(), "composite conversion failed");
            Invalid::composite(self, errors)
        })
    }

    pub(crate) fn composite_validate(&mut self, value: &FieldValue) -> std::result::Result<(), Invalid> {
        if !value.is_mapping() {
            return Err(Invalid::new(self, "Wrong type"));
        }

        let outcome = match self.children.as_mut() {
            Some(children) => children.validate(value),
            None => Ok(()),
        };

        if let Err(errors) = outcome {
            debug!(field = %self.name, errors = errors.len(), "composite validation failed");
            return Err(Invalid::composite(self, errors));
        }

        if let Some(validator) = self.config.validator() {
            validator.call(self, value)?;
        }
        Ok(())
    }

    /// The composite template wraps the rendered widget of every child.
    pub(crate) fn render_composite(&self) -> Result<String> {
        let display = match self.mode() {
            Mode::Display => self.config.display_template().cloned(),
            Mode::Input => None,
        };
        let template = display
            .or_else(|| self.config.input_template().cloned())
            .unwrap_or_else(|| Template::from(COMPOSITE_TEMPLATE));

        let mut view = self.view();
        if let Some(children) = self.children.as_ref() {
            view.fields = children
                .iter()
                .map(|(_, child)| {
                    let mut child_view = child.view();
                    child_view.html = Some(child.render_widget()?);
                    Ok(child_view)
                })
                .collect::<Result<Vec<_>>>()?;
        }

        self.render_template(&template, &view)
    }

    /// A composite using the default layout gets the composite widget;
    /// one with its own input template gets the plain form widget.
    pub(crate) fn composite_widget_template(&self) -> Template {
        if let Some(widget) = self.config.widget_template() {
            return widget.clone();
        }
        if self.config.input_template().is_none() {
            Template::from(COMPOSITE_WIDGET_TEMPLATE)
        } else {
            Template::from(FORM_WIDGET_TEMPLATE)
        }
    }
}
