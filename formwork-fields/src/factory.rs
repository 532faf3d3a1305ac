//! Factory fields: the concrete type is chosen by the request's registry.

use tracing::debug;

use crate::error::Result;
use crate::field::{BoundField, Field, FieldKind};
use crate::registry::Binding;
use crate::value::FieldValue;

impl Field {
    /// Field whose type is looked up by `tag` when it is bound.
    ///
    /// Binding fails with [`FieldsError::UnknownFieldType`](crate::FieldsError::UnknownFieldType)
    /// when nothing is registered for the tag.
    pub fn factory(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from_kind(name.into(), FieldKind::Factory(tag.into()))
    }

    /// Registry tag of a factory field.
    pub fn factory_tag(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Factory(tag) => Some(tag),
            _ => None,
        }
    }
}

pub(crate) fn bind_factory(
    prototype: &Field,
    tag: &str,
    binding: &Binding,
    prefix: &str,
    value: FieldValue,
) -> Result<BoundField> {
    let ty = binding.request().registry().resolve(tag)?;
    debug!(%tag, field = %prototype.name(), "resolved factory field");
    Ok(BoundField::from_prototype(prototype, ty, binding, prefix, value))
}
