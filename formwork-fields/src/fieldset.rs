//! Ordered, name-keyed collections of fields.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::field::{BoundField, Field};
use crate::invalid::Invalid;
use crate::registry::Binding;
use crate::value::FieldValue;

/// Ordered collection of field prototypes with unique names.
#[derive(Debug, Clone, Default)]
pub struct Fieldset {
    name: String,
    title: String,
    prefix: String,
    fields: IndexMap<String, Field>,
}

impl Fieldset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Named fieldset; its children bind under `name.`.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = if name.is_empty() {
            String::new()
        } else {
            format!("{name}.")
        };
        Self {
            name,
            prefix,
            ..Self::default()
        }
    }

    /// Build from fields in order, rejecting duplicate names.
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Result<Self> {
        let mut set = Self::new();
        for field in fields {
            set.push(field)?;
        }
        Ok(set)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Append a field. Names must be unique within the set.
    pub fn push(&mut self, field: Field) -> Result<()> {
        let name = field.name().to_string();
        if self.fields.contains_key(&name) {
            return Err(FieldsError::DuplicateField { name });
        }
        self.fields.insert(name, field);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Prefix prepended to every child name at bind time.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Subset holding only `names`, in this set's order.
    pub fn select(&self, names: &[&str]) -> Self {
        self.filtered(|name| names.contains(&name))
    }

    /// Subset without `names`.
    pub fn omit(&self, names: &[&str]) -> Self {
        self.filtered(|name| !names.contains(&name))
    }

    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self {
            name: self.name.clone(),
            title: self.title.clone(),
            prefix: self.prefix.clone(),
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| keep(name))
                .map(|(name, field)| (name.clone(), field.clone()))
                .collect(),
        }
    }

    /// Append every field of `other`, failing on a name clash.
    pub fn merge(mut self, other: Fieldset) -> Result<Self> {
        for field in other.fields.into_values() {
            self.push(field)?;
        }
        Ok(self)
    }

    /// Bind every child against the matching entry of `data`.
    ///
    /// Children bind under `prefix + self.prefix`, and a child whose key is
    /// missing from `data` binds with `Absent`.
    pub fn bind(&self, binding: &Binding, data: &FieldValue, prefix: &str) -> Result<BoundFieldset> {
        let prefix = format!("{prefix}{}", self.prefix);
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let bound = field.bind(binding, &prefix, data.child(name))?;
            fields.insert(name.clone(), bound);
        }
        Ok(BoundFieldset { prefix, fields })
    }
}

impl TryFrom<Vec<Field>> for Fieldset {
    type Error = FieldsError;

    fn try_from(fields: Vec<Field>) -> Result<Self> {
        Self::from_fields(fields)
    }
}

/// Children of one bound composite, keyed by local name.
#[derive(Debug, Clone, Default)]
pub struct BoundFieldset {
    prefix: String,
    fields: IndexMap<String, BoundField>,
}

impl BoundFieldset {
    /// Full prefix the children were bound under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get(&self, name: &str) -> Option<&BoundField> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BoundField> {
        self.fields.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut BoundField)> {
        self.fields
            .iter_mut()
            .map(|(name, field)| (name.as_str(), field))
    }

    pub fn update(&mut self) {
        for field in self.fields.values_mut() {
            field.update();
        }
    }

    pub fn set_id_prefix(&mut self, prefix: &str) {
        for field in self.fields.values_mut() {
            field.set_id_prefix(prefix);
        }
    }

    /// Mapping of every child's extracted value.
    ///
    /// A child with nothing submitted contributes its `missing` fallback,
    /// cloned so that callers never share it with the prototype.
    pub fn extract(&self) -> FieldValue {
        let mut value = IndexMap::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let mut extracted = field.extract();
            if extracted.is_absent() && !field.missing().is_absent() {
                extracted = field.missing().clone();
            }
            value.insert(name.clone(), extracted);
        }
        FieldValue::Map(value)
    }

    /// Convert every entry of a mapping, collecting all failures.
    ///
    /// Entries without a matching child are reported as unknown fields.
    pub fn to_field(&mut self, value: &FieldValue) -> std::result::Result<FieldValue, Vec<Invalid>> {
        let mut result = IndexMap::new();
        let mut errors = Collector::default();

        for (name, entry) in value.entries().unwrap_or_default() {
            let Some(field) = self.fields.get_mut(&name) else {
                errors.unknown(&self.prefix, &name);
                continue;
            };
            match field.to_field(&entry) {
                Ok(converted) => {
                    result.insert(name, converted);
                }
                Err(error) => errors.record(&name, field, error),
            }
        }

        errors.finish(FieldValue::Map(result))
    }

    /// Validate every entry of a mapping, collecting all failures.
    pub fn validate(&mut self, value: &FieldValue) -> std::result::Result<(), Vec<Invalid>> {
        let mut errors = Collector::default();

        for (name, entry) in value.entries().unwrap_or_default() {
            let Some(field) = self.fields.get_mut(&name) else {
                errors.unknown(&self.prefix, &name);
                continue;
            };
            if let Err(error) = field.validate(&entry) {
                errors.record(&name, field, error);
            }
        }

        errors.finish(())
    }
}

/// Accumulates child failures without stopping at the first one.
#[derive(Default)]
struct Collector {
    errors: Vec<Invalid>,
}

impl Collector {
    /// Tag the error with the child's local name and attach the first one
    /// to the child for display.
    fn record(&mut self, name: &str, field: &mut BoundField, mut error: Invalid) {
        error.set_name(name);
        debug!(field = %field.name(), %error, "child field rejected value");
        if field.error().is_none() {
            field.set_error(Some(error.clone()));
        }
        self.errors.push(error);
    }

    fn unknown(&mut self, prefix: &str, name: &str) {
        let mut error = Invalid::Field {
            field: format!("{prefix}{name}"),
            message: Some("Unknown field".to_string()),
            name: None,
        };
        error.set_name(name);
        self.errors.push(error);
    }

    fn finish<T>(self, ok: T) -> std::result::Result<T, Vec<Invalid>> {
        if self.errors.is_empty() {
            Ok(ok)
        } else {
            Err(self.errors)
        }
    }
}
