//! Liquid rendering for formwork fields
//!
//! Provides the [`LiquidRenderer`] implementation of
//! [`formwork_fields::Renderer`], the [`TemplateLibrary`] of bundled and
//! user templates, and the figment-backed [`TemplatingConfig`].
//!
//! ```
//! use std::sync::Arc;
//! use formwork_fields::{Binding, Field, FieldValue, Request, TextField};
//! use formwork_templating::LiquidRenderer;
//!
//! let renderer = Arc::new(LiquidRenderer::builtin().unwrap());
//! let binding = Binding::new(Request::default().with_renderer(renderer));
//! let mut bound = Field::typed("title", TextField)
//!     .bind(&binding, "", FieldValue::from("Hello"))
//!     .unwrap();
//! bound.update();
//!
//! let html = bound.render().unwrap();
//! assert!(html.contains(r#"value="Hello""#));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod renderer;

pub use config::TemplatingConfig;
pub use engine::TemplateEngine;
pub use error::{Result, TemplatingError};
pub use library::TemplateLibrary;
pub use renderer::LiquidRenderer;
