//! Field prototypes and their per-request bound clones.
//!
//! A [`Field`] is configured once, typically at startup, and never changes
//! afterwards. Every request calls [`Field::bind`] to get a [`BoundField`]:
//! a fresh value that shares the prototype's immutable configuration and owns
//! all request state (name, id, value, params, mode, form value, error).
//! Because binding only reads the prototype, one definition can serve any
//! number of concurrent requests.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as Json;
use tracing::{error, trace};

use crate::error::{FieldsError, Result};
use crate::fieldset::{BoundFieldset, Fieldset};
use crate::invalid::Invalid;
use crate::params::Params;
use crate::registry::{Binding, Context, Request};
use crate::render::{FieldView, WIDGET_TEMPLATE};
use crate::types::{BasicField, FieldType, Mode, Template};
use crate::value::{is_falsy, FieldValue, ValueType};

type ValidatorFn = dyn Fn(&BoundField, &FieldValue) -> std::result::Result<(), Invalid> + Send + Sync;

/// Validator callback attached to a field: `(field, value) -> Result<(), Invalid>`.
#[derive(Clone)]
pub struct Validator(Arc<ValidatorFn>);

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&BoundField, &FieldValue) -> std::result::Result<(), Invalid> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, field: &BoundField, value: &FieldValue) -> std::result::Result<(), Invalid> {
        (self.0)(field, value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Immutable configuration shared by a prototype and all of its bound clones.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    name: String,
    title: String,
    description: String,
    readonly: bool,
    default: FieldValue,
    missing: FieldValue,
    validator: Option<Validator>,
    typ: Option<ValueType>,
    css_class: Option<String>,
    tmpl_input: Option<Template>,
    tmpl_display: Option<Template>,
    tmpl_widget: Option<Template>,
}

impl FieldConfig {
    fn new(name: String) -> Self {
        Self {
            title: capitalize(&name),
            name,
            description: String::new(),
            readonly: false,
            default: FieldValue::Absent,
            missing: FieldValue::Required,
            validator: None,
            typ: None,
            css_class: None,
            tmpl_input: None,
            tmpl_display: None,
            tmpl_widget: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn default(&self) -> &FieldValue {
        &self.default
    }

    pub fn missing(&self) -> &FieldValue {
        &self.missing
    }

    /// A field is required when no `missing` fallback was supplied.
    pub fn required(&self) -> bool {
        self.missing.is_required()
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.typ
    }

    pub fn css_class(&self) -> Option<&str> {
        self.css_class.as_deref()
    }

    pub fn input_template(&self) -> Option<&Template> {
        self.tmpl_input.as_ref()
    }

    pub fn display_template(&self) -> Option<&Template> {
        self.tmpl_display.as_ref()
    }

    pub fn widget_template(&self) -> Option<&Template> {
        self.tmpl_widget.as_ref()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum FieldKind {
    /// Concrete type known at definition time.
    Typed(Arc<dyn FieldType>),
    /// Type looked up by tag in the request's registry at bind time.
    Factory(String),
    /// Named children bound against a mapping value.
    Composite(Fieldset),
}

/// A field prototype.
///
/// ```
/// use formwork_fields::{Binding, Field, FieldValue, Params, Request, TextField};
///
/// let title = Field::typed("title", TextField).description("Page title");
/// let params: Params = [("title", "Hello")].into_iter().collect();
/// let binding = Binding::new(Request::default()).with_params(params);
///
/// let mut bound = title.bind(&binding, "", FieldValue::Absent).unwrap();
/// bound.update();
/// assert_eq!(bound.form_value(), Some(&FieldValue::from("Hello")));
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) config: Arc<FieldConfig>,
    pub(crate) kind: FieldKind,
}

impl Field {
    /// Plain field with identity conversions.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, Arc::new(BasicField))
    }

    /// Field of a concrete type.
    pub fn typed<T: FieldType + 'static>(name: impl Into<String>, ty: T) -> Self {
        Self::with_type(name, Arc::new(ty))
    }

    pub fn with_type(name: impl Into<String>, ty: Arc<dyn FieldType>) -> Self {
        Self::from_kind(name.into(), FieldKind::Typed(ty))
    }

    pub(crate) fn from_kind(name: String, kind: FieldKind) -> Self {
        Self {
            config: Arc::new(FieldConfig::new(name)),
            kind,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config_mut().title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config_mut().description = description.into();
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.config_mut().readonly = readonly;
        self
    }

    /// Value shown when neither params nor a bound value supply one.
    pub fn default(mut self, default: impl Into<FieldValue>) -> Self {
        self.config_mut().default = default.into();
        self
    }

    /// Fallback used when nothing was submitted. Anything but
    /// `FieldValue::Required` makes the field optional.
    pub fn missing(mut self, missing: impl Into<FieldValue>) -> Self {
        self.config_mut().missing = missing.into();
        self
    }

    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&BoundField, &FieldValue) -> std::result::Result<(), Invalid> + Send + Sync + 'static,
    {
        self.config_mut().validator = Some(Validator::new(f));
        self
    }

    pub fn value_type(mut self, typ: ValueType) -> Self {
        self.config_mut().typ = Some(typ);
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.config_mut().css_class = Some(class.into());
        self
    }

    pub fn input_template(mut self, template: impl Into<Template>) -> Self {
        self.config_mut().tmpl_input = Some(template.into());
        self
    }

    pub fn display_template(mut self, template: impl Into<Template>) -> Self {
        self.config_mut().tmpl_display = Some(template.into());
        self
    }

    pub fn widget_template(mut self, template: impl Into<Template>) -> Self {
        self.config_mut().tmpl_widget = Some(template.into());
        self
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        Arc::make_mut(&mut self.config)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn required(&self) -> bool {
        self.config.required()
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, FieldKind::Composite(_))
    }

    /// Children of a composite prototype.
    pub fn fields(&self) -> Option<&Fieldset> {
        match &self.kind {
            FieldKind::Composite(fields) => Some(fields),
            _ => None,
        }
    }

    /// Bind this prototype to one request.
    ///
    /// The clone's name is `prefix + name` and its id is that name with dots
    /// replaced by dashes. The prototype itself is never modified.
    pub fn bind(&self, binding: &Binding, prefix: &str, value: FieldValue) -> Result<BoundField> {
        match &self.kind {
            FieldKind::Typed(ty) => Ok(BoundField::from_prototype(
                self,
                Arc::clone(ty),
                binding,
                prefix,
                value,
            )),
            FieldKind::Factory(tag) => crate::factory::bind_factory(self, tag, binding, prefix, value),
            FieldKind::Composite(fields) => {
                crate::composite::bind_composite(self, fields, binding, prefix, value)
            }
        }
    }
}

/// A field bound to one request.
#[derive(Debug, Clone)]
pub struct BoundField {
    pub(crate) config: Arc<FieldConfig>,
    pub(crate) ty: Arc<dyn FieldType>,
    request: Request,
    pub(crate) name: String,
    pub(crate) id: String,
    value: FieldValue,
    params: Arc<Params>,
    context: Option<Context>,
    mode: Option<Mode>,
    form_value: Option<FieldValue>,
    error: Option<Invalid>,
    pub(crate) children: Option<BoundFieldset>,
}

impl BoundField {
    /// Copy the prototype's configuration, then apply the request overrides.
    pub(crate) fn from_prototype(
        prototype: &Field,
        ty: Arc<dyn FieldType>,
        binding: &Binding,
        prefix: &str,
        value: FieldValue,
    ) -> Self {
        let name = format!("{prefix}{}", prototype.name());
        let id = name.replace('.', "-");
        trace!(%name, ty = ty.tag(), "bound field");
        Self {
            config: Arc::clone(&prototype.config),
            ty,
            request: binding.request().clone(),
            name,
            id,
            value,
            params: Arc::clone(binding.params()),
            context: binding.context().cloned(),
            mode: None,
            form_value: None,
            error: None,
            children: None,
        }
    }

    /// Full dotted name, also the params key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as declared on the prototype.
    pub fn local_name(&self) -> &str {
        &self.config.name
    }

    /// DOM-safe identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    pub fn required(&self) -> bool {
        self.config.required()
    }

    pub fn readonly(&self) -> bool {
        self.config.readonly
    }

    pub fn default(&self) -> &FieldValue {
        &self.config.default
    }

    pub fn missing(&self) -> &FieldValue {
        &self.config.missing
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn field_type(&self) -> &dyn FieldType {
        self.ty.as_ref()
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The bound value, `Absent` if none was supplied.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// The opaque context downcast to a concrete type.
    pub fn context_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|c| c.downcast_ref::<T>())
    }

    /// Current mode; INPUT until `update` decides otherwise.
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or(Mode::Input)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    /// Display-ready value computed by `update`.
    pub fn form_value(&self) -> Option<&FieldValue> {
        self.form_value.as_ref()
    }

    pub fn set_form_value(&mut self, value: Option<FieldValue>) {
        self.form_value = value;
    }

    /// Error attached for display, if any.
    pub fn error(&self) -> Option<&Invalid> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: Option<Invalid>) {
        self.error = error;
    }

    pub fn is_composite(&self) -> bool {
        self.children.is_some()
    }

    /// Bound children of a composite.
    pub fn fields(&self) -> Option<&BoundFieldset> {
        self.children.as_ref()
    }

    pub fn fields_mut(&mut self) -> Option<&mut BoundFieldset> {
        self.children.as_mut()
    }

    /// Bound child of a composite by local name.
    pub fn child(&self, name: &str) -> Option<&BoundField> {
        self.children.as_ref().and_then(|c| c.get(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut BoundField> {
        self.children.as_mut().and_then(|c| c.get_mut(name))
    }

    /// Prepare the field for rendering.
    ///
    /// Sets the mode once (DISPLAY for readonly fields, INPUT otherwise) and
    /// computes `form_value` with the precedence submitted > bound > default.
    /// A bound or default value that fails `to_form` is logged and dropped.
    /// Composites then update every child in order.
    pub fn update(&mut self) {
        if self.mode.is_none() {
            self.mode = Some(if self.config.readonly {
                Mode::Display
            } else {
                Mode::Input
            });
        }

        self.update_form_value();

        if let Some(children) = self.children.as_mut() {
            children.update();
        }
    }

    fn update_form_value(&mut self) {
        let submitted = self.extract();
        if !submitted.is_absent() {
            self.form_value = Some(submitted);
            return;
        }

        let value = if self.value.is_absent() {
            self.config.default.clone()
        } else {
            self.value.clone()
        };

        if value.is_absent() {
            self.form_value = None;
            return;
        }

        let converted = match self.to_form(&value) {
            Ok(converted) => converted,
            Err(err) => {
                error!(field = %self.name, %err, "failed to convert value for display");
                FieldValue::Absent
            }
        };
        self.form_value = if converted.is_absent() {
            None
        } else {
            Some(converted)
        };
    }

    /// Submitted value for this field, `Absent` when not submitted.
    pub fn extract(&self) -> FieldValue {
        self.extract_or(FieldValue::Absent)
    }

    /// Submitted value, or `default` when the param is missing or falsy.
    ///
    /// Empty strings, zero, `false` and empty collections all count as not
    /// submitted, so a legitimate numeric `0` is indistinguishable from
    /// nothing. Composites assemble the mapping of their children instead
    /// and ignore `default`.
    pub fn extract_or(&self, default: FieldValue) -> FieldValue {
        if let Some(children) = self.children.as_ref() {
            return children.extract();
        }
        match self.params.get(&self.name) {
            Some(value) if !is_falsy(value) => FieldValue::Value(value.clone()),
            _ => default,
        }
    }

    /// Field representation to display representation.
    pub fn to_form(&self, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        if value.is_sentinel() {
            return Ok(value.clone());
        }
        let ty = Arc::clone(&self.ty);
        ty.to_form(self, value)
    }

    /// Submitted representation to field representation.
    ///
    /// Composites convert every entry and report all failing children at once.
    pub fn to_field(&mut self, value: &FieldValue) -> std::result::Result<FieldValue, Invalid> {
        if self.is_composite() {
            return self.composite_to_field(value);
        }
        if value.is_sentinel() {
            return Ok(value.clone());
        }
        let ty = Arc::clone(&self.ty);
        ty.to_field(self, value)
    }

    /// Validate a converted value.
    ///
    /// Leaves check the declared type, then the required marker, then the
    /// type's own rules, then the attached validator. Composites validate
    /// every child before running their own validator.
    pub fn validate(&mut self, value: &FieldValue) -> std::result::Result<(), Invalid> {
        if self.is_composite() {
            return self.composite_validate(value);
        }

        if let Some(typ) = self.config.typ {
            if !typ.matches(value) {
                return Err(Invalid::new(self, "Wrong type"));
            }
        }

        if value.is_required() {
            return Err(Invalid::new(self, "Required"));
        }

        let ty = Arc::clone(&self.ty);
        ty.validate(self, value)?;

        if let Some(validator) = self.config.validator.as_ref() {
            validator.call(self, value)?;
        }
        Ok(())
    }

    /// Recompute ids under a new prefix: `prefix + local name`, dots to dashes.
    pub fn set_id_prefix(&mut self, prefix: &str) {
        let path = format!("{prefix}{}", self.config.name);
        self.id = path.replace('.', "-");
        if let Some(children) = self.children.as_mut() {
            children.set_id_prefix(&format!("{path}."));
        }
    }

    /// Serialisable snapshot for templates.
    pub fn view(&self) -> FieldView {
        FieldView {
            name: self.name.clone(),
            id: self.id.clone(),
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            required: self.required(),
            readonly: self.config.readonly,
            mode: self.mode(),
            css_class: self.config.css_class.clone(),
            type_tag: self.ty.tag().to_string(),
            value: self.value.to_json(),
            form_value: self
                .form_value
                .as_ref()
                .map(FieldValue::to_json)
                .unwrap_or(Json::Null),
            error: self.error.as_ref().map(|e| match e.message() {
                Some(message) => message.to_string(),
                None => e.to_string(),
            }),
            html: None,
            fields: self
                .children
                .as_ref()
                .map(|c| c.iter().map(|(_, child)| child.view()).collect())
                .unwrap_or_default(),
        }
    }

    /// Render the input (or display) markup.
    ///
    /// DISPLAY mode uses the display template, every other state the input
    /// template; unset templates fall back to the field type's defaults.
    pub fn render(&self) -> Result<String> {
        if self.is_composite() {
            return self.render_composite();
        }

        let (template, slot) = match self.mode() {
            Mode::Display => (
                self.config
                    .tmpl_display
                    .clone()
                    .or_else(|| self.ty.display_template().map(Template::from)),
                "display",
            ),
            Mode::Input => (
                self.config
                    .tmpl_input
                    .clone()
                    .or_else(|| self.ty.input_template().map(Template::from)),
                "input",
            ),
        };

        let template = template.ok_or_else(|| FieldsError::MissingTemplate {
            field: self.name.clone(),
            slot,
        })?;
        self.render_template(&template, &self.view())
    }

    /// Render the field wrapped in its widget (label, description, error).
    pub fn render_widget(&self) -> Result<String> {
        let html = self.render()?;
        let template = if self.is_composite() {
            self.composite_widget_template()
        } else {
            self.config
                .tmpl_widget
                .clone()
                .unwrap_or_else(|| Template::from(WIDGET_TEMPLATE))
        };

        let mut view = self.view();
        view.html = Some(html);
        self.render_template(&template, &view)
    }

    pub(crate) fn render_template(&self, template: &Template, view: &FieldView) -> Result<String> {
        match template {
            Template::Callable(f) => f(self),
            Template::Named(name) => {
                let renderer = self
                    .request
                    .renderer()
                    .ok_or_else(|| FieldsError::NoRenderer {
                        field: self.name.clone(),
                    })?;
                trace!(field = %self.name, template = %name, "rendering field");
                renderer.render(name, view)
            }
        }
    }
}

impl fmt::Display for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {:?}>", self.ty.tag(), self.name)
    }
}

/// First letter upper case, the rest lower case.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntegerField, TextField};
    use rstest::rstest;
    use serde_json::json;

    fn binding_with(params: Params) -> Binding {
        Binding::new(Request::default()).with_params(params)
    }

    fn params(pairs: &[(&str, Json)]) -> Params {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_defaults() {
        let field = Field::new("first_name");
        assert_eq!(field.config().title(), "First_name");
        assert_eq!(field.config().description(), "");
        assert!(field.required());
        assert_eq!(field.config().default(), &FieldValue::Absent);
        assert_eq!(field.config().missing(), &FieldValue::Required);

        let optional = Field::new("nick").missing(FieldValue::Value(Json::Null));
        assert!(!optional.required());
    }

    #[test]
    fn test_bind_prefixes_name_and_id() {
        let field = Field::new("zip");
        let binding = binding_with(Params::new());
        let bound = field
            .bind(&binding, "form.addr.", FieldValue::from("123"))
            .unwrap();
        assert_eq!(bound.name(), "form.addr.zip");
        assert_eq!(bound.id(), "form-addr-zip");
        assert_eq!(bound.local_name(), "zip");
        assert_eq!(bound.value(), &FieldValue::from("123"));
    }

    #[test]
    fn test_bind_leaves_prototype_untouched() {
        let field = Field::typed("age", IntegerField).default(1);
        let before = format!("{field:?}");
        let binding = binding_with(params(&[("age", json!("7"))]));

        let mut bound = field.bind(&binding, "p.", FieldValue::from(3)).unwrap();
        bound.update();
        bound.set_error(Some(Invalid::new(&bound, "boom")));

        assert_eq!(format!("{field:?}"), before);
        assert_eq!(field.name(), "age");
        assert!(Arc::ptr_eq(&field.config, &bound.config));
    }

    #[test]
    fn test_bind_carries_context() {
        let field = Field::new("x");
        let binding = Binding::new(Request::default()).with_context(Arc::new(42_u32));
        let bound = field.bind(&binding, "", FieldValue::Absent).unwrap();
        assert_eq!(bound.context_as::<u32>(), Some(&42));
        assert!(bound.context_as::<String>().is_none());
    }

    #[rstest]
    #[case(json!(""))]
    #[case(json!(0))]
    #[case(json!([]))]
    #[case(json!(false))]
    #[case(json!(null))]
    fn test_extract_treats_falsy_as_absent(#[case] submitted: Json) {
        let field = Field::new("x");
        let bound = field
            .bind(&binding_with(params(&[("x", submitted)])), "", FieldValue::Absent)
            .unwrap();
        assert_eq!(bound.extract(), FieldValue::Absent);
        assert_eq!(
            bound.extract_or(FieldValue::from("fallback")),
            FieldValue::from("fallback")
        );
    }

    #[test]
    fn test_extract_missing_key() {
        let field = Field::new("x");
        let bound = field
            .bind(&binding_with(params(&[("y", json!("1"))])), "", FieldValue::Absent)
            .unwrap();
        assert_eq!(bound.extract(), FieldValue::Absent);
    }

    #[test]
    fn test_extract_uses_prefixed_name() {
        let field = Field::new("x");
        let bound = field
            .bind(&binding_with(params(&[("f.x", json!("0"))])), "f.", FieldValue::Absent)
            .unwrap();
        assert_eq!(bound.extract(), FieldValue::from("0"));
    }

    #[test]
    fn test_update_submitted_wins() {
        let field = Field::typed("x", IntegerField).default(1);
        let mut bound = field
            .bind(&binding_with(params(&[("x", json!("5"))])), "", FieldValue::from(3))
            .unwrap();
        bound.update();
        assert_eq!(bound.form_value(), Some(&FieldValue::from("5")));
        assert_eq!(bound.mode(), Mode::Input);
    }

    #[test]
    fn test_update_bound_value_beats_default() {
        let field = Field::typed("x", IntegerField).default(1);
        let mut bound = field
            .bind(&binding_with(Params::new()), "", FieldValue::from(3))
            .unwrap();
        bound.update();
        assert_eq!(bound.form_value(), Some(&FieldValue::from("3")));
    }

    #[test]
    fn test_update_falls_back_to_default() {
        let field = Field::typed("x", IntegerField).default(1);
        let mut bound = field
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        bound.update();
        assert_eq!(bound.form_value(), Some(&FieldValue::from("1")));
    }

    #[test]
    fn test_update_nothing_leaves_form_value_empty() {
        let mut bound = Field::new("x")
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        bound.update();
        assert_eq!(bound.form_value(), None);
    }

    #[test]
    fn test_update_with_nothing_clears_stale_form_value() {
        let mut bound = Field::new("x")
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        bound.set_form_value(Some(FieldValue::from("stale")));
        bound.update();
        assert_eq!(bound.form_value(), None);
    }

    #[test_log::test]
    fn test_update_swallows_conversion_failure() {
        let field = Field::typed("x", IntegerField);
        let mut bound = field
            .bind(&binding_with(Params::new()), "", FieldValue::from(json!({"bad": 1})))
            .unwrap();
        bound.update();
        assert_eq!(bound.form_value(), None);
        assert!(bound.error().is_none());
    }

    #[test]
    fn test_update_mode_is_set_once() {
        let field = Field::new("x").readonly(true);
        let mut bound = field
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        bound.update();
        assert_eq!(bound.mode(), Mode::Display);

        bound.set_mode(Mode::Input);
        bound.update();
        assert_eq!(bound.mode(), Mode::Input);
    }

    #[test]
    fn test_identity_round_trip() {
        let mut bound = Field::new("x")
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        for v in [
            FieldValue::from("text"),
            FieldValue::from(12),
            FieldValue::from(json!({"a": [1, 2]})),
        ] {
            let form = bound.to_form(&v).unwrap();
            assert_eq!(bound.to_field(&form).unwrap(), v);
        }
    }

    #[test]
    fn test_sentinels_pass_through_conversion() {
        let mut bound = Field::typed("x", IntegerField)
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        assert_eq!(bound.to_field(&FieldValue::Required).unwrap(), FieldValue::Required);
        assert_eq!(bound.to_form(&FieldValue::Absent).unwrap(), FieldValue::Absent);
    }

    #[test]
    fn test_validate_required() {
        let mut bound = Field::new("x")
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        let err = bound.validate(&FieldValue::Required).unwrap_err();
        assert_eq!(err.message(), Some("Required"));
        assert!(bound.validate(&FieldValue::from("ok")).is_ok());
    }

    #[test]
    fn test_validate_wrong_type() {
        let mut bound = Field::typed("x", TextField)
            .value_type(ValueType::String)
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        let err = bound.validate(&FieldValue::from(5)).unwrap_err();
        assert_eq!(err.message(), Some("Wrong type"));
    }

    #[test]
    fn test_validate_runs_validator() {
        let field = Field::new("x").validator(|field, value| {
            if value.as_str() == Some("bad") {
                Err(Invalid::new(field, "Bad value"))
            } else {
                Ok(())
            }
        });
        let mut bound = field
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        assert!(bound.validate(&FieldValue::from("good")).is_ok());
        let err = bound.validate(&FieldValue::from("bad")).unwrap_err();
        assert_eq!(err.to_string(), "x: Bad value");
    }

    #[test]
    fn test_render_without_renderer() {
        let bound = Field::typed("x", TextField)
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        assert!(matches!(bound.render(), Err(FieldsError::NoRenderer { .. })));
    }

    #[test]
    fn test_render_missing_template() {
        let bound = Field::new("x")
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        assert!(matches!(
            bound.render(),
            Err(FieldsError::MissingTemplate { slot: "input", .. })
        ));
    }

    #[test]
    fn test_render_callable_selected_by_mode() {
        let field = Field::new("x")
            .input_template(Template::callable(|f| Ok(format!("input:{}", f.name()))))
            .display_template(Template::callable(|f| Ok(format!("display:{}", f.name()))));
        let mut bound = field
            .bind(&binding_with(Params::new()), "", FieldValue::Absent)
            .unwrap();
        assert_eq!(bound.render().unwrap(), "input:x");
        bound.set_mode(Mode::Display);
        assert_eq!(bound.render().unwrap(), "display:x");
    }

    #[test]
    fn test_view_reports_state() {
        let field = Field::typed("age", IntegerField).title("Age");
        let mut bound = field
            .bind(&binding_with(Params::new()), "", FieldValue::from(30))
            .unwrap();
        bound.update();
        bound.set_error(Some(Invalid::new(&bound, "Too old")));
        let view = bound.view();
        assert_eq!(view.title, "Age");
        assert_eq!(view.type_tag, "int");
        assert_eq!(view.value, json!(30));
        assert_eq!(view.form_value, json!("30"));
        assert_eq!(view.error.as_deref(), Some("Too old"));
        assert!(view.fields.is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hello WORLD"), "Hello world");
        assert_eq!(capitalize(""), "");
    }
}
