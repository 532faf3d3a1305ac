//! Form field definitions, per-request binding and validation
//!
//! `formwork-fields` turns HTML form submissions into validated values and
//! back. It knows nothing about HTTP or a particular template engine:
//! callers supply the submitted [`Params`] and, for rendering, a
//! [`Renderer`] implementation.
//!
//! # Architecture
//!
//! - **Prototypes are immutable**: a [`Field`] is defined once and shared by every request
//! - **Bind per request**: [`Field::bind`] returns a [`BoundField`] owning all request state
//! - **Factory fields**: the concrete [`FieldType`] is looked up by tag in the request's [`FieldRegistry`]
//! - **Composites**: child fields bound recursively, every child failure reported in one [`Invalid`]
//!
//! # Lifecycle
//!
//! ```
//! use formwork_fields::{Binding, Field, FieldValue, IntegerField, Params, Request};
//!
//! let form = Field::composite(
//!     "person",
//!     vec![Field::new("name"), Field::typed("age", IntegerField)],
//! )
//! .unwrap();
//!
//! let params = Params::from_urlencoded("person.name=Ada&person.age=36");
//! let binding = Binding::new(Request::default()).with_params(params);
//! let mut bound = form.bind(&binding, "", FieldValue::Absent).unwrap();
//!
//! let submitted = bound.extract();
//! let value = bound.to_field(&submitted).unwrap();
//! bound.validate(&value).unwrap();
//! assert_eq!(value.child("age"), FieldValue::from(36));
//! ```

mod composite;
pub mod error;
mod factory;
pub mod field;
pub mod fieldset;
pub mod invalid;
pub mod params;
pub mod registry;
pub mod render;
pub mod types;
pub mod value;

pub use error::{FieldsError, Result};
pub use field::{BoundField, Field, FieldConfig, Validator};
pub use fieldset::{BoundFieldset, Fieldset};
pub use invalid::{CompositeError, Invalid};
pub use params::Params;
pub use registry::{Binding, Context, FieldRegistry, Request};
pub use render::{FieldView, Renderer};
pub use types::{
    builtin_types, BasicField, BoolField, FieldType, FloatField, IntegerField, LinesField, Mode,
    Template, TextField,
};
pub use value::{FieldValue, ValueType};
