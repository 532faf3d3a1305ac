//! Template engine for rendering named templates
//!
//! The engine owns a Liquid parser whose partial source is the template
//! library, so any template can `{% include "group:name" %}` another one.

use std::fmt;

use liquid::partials::EagerCompiler;
use tracing::trace;

use crate::config::TemplatingConfig;
use crate::error::{Result, TemplatingError};
use crate::library::TemplateLibrary;

/// Template engine with Liquid configuration
pub struct TemplateEngine {
    parser: liquid::Parser,
    library: TemplateLibrary,
}

impl TemplateEngine {
    /// Create an engine over `library`.
    pub fn new(library: TemplateLibrary) -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .partials(EagerCompiler::new(library.clone()))
            .build()
            .map_err(|e| TemplatingError::Parse(e.to_string()))?;
        Ok(Self { parser, library })
    }

    /// Engine over the bundled templates only.
    pub fn builtin() -> Result<Self> {
        Self::new(TemplateLibrary::builtin())
    }

    /// Engine over the templates described by `config`.
    pub fn from_config(config: &TemplatingConfig) -> Result<Self> {
        Self::new(TemplateLibrary::from_config(config)?)
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Get a reference to the underlying parser
    pub fn parser(&self) -> &liquid::Parser {
        &self.parser
    }

    /// Render the template registered as `name`.
    pub fn render(&self, name: &str, globals: &liquid::Object) -> Result<String> {
        let source = self
            .library
            .get(name)
            .ok_or_else(|| TemplatingError::NotFound(name.to_string()))?;
        trace!(template = %name, "rendering template");
        self.render_source(source, globals)
    }

    /// Render a template string.
    pub fn render_source(&self, source: &str, globals: &liquid::Object) -> Result<String> {
        let template = self
            .parser
            .parse(source)
            .map_err(|e| TemplatingError::Parse(e.to_string()))?;

        template
            .render(globals)
            .map_err(|e| TemplatingError::Render(e.to_string()))
    }
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("templates", &self.library.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(templates: &[(&str, &str)]) -> TemplateEngine {
        let mut library = TemplateLibrary::new();
        for (name, source) in templates {
            library.add(*name, *source);
        }
        TemplateEngine::new(library).unwrap()
    }

    fn globals(name: &str) -> liquid::Object {
        let mut globals = liquid::Object::new();
        globals.insert("name".into(), liquid::model::Value::scalar(name.to_string()));
        globals
    }

    #[test]
    fn test_engine_render() {
        let engine = engine(&[("greet:hello", "Hello {{ name }}!")]);
        assert_eq!(engine.render("greet:hello", &globals("World")).unwrap(), "Hello World!");
    }

    #[test]
    fn test_engine_render_unknown() {
        let engine = engine(&[]);
        let err = engine.render("nope", &globals("x")).unwrap_err();
        assert!(matches!(err, TemplatingError::NotFound(ref n) if n == "nope"));
    }

    #[test]
    fn test_engine_render_empty() {
        let engine = engine(&[]);
        assert_eq!(engine.render_source("", &liquid::Object::new()).unwrap(), "");
    }

    #[test]
    fn test_engine_parse_error() {
        let engine = engine(&[]);
        let err = engine
            .render_source("{% if %}", &liquid::Object::new())
            .unwrap_err();
        assert!(matches!(err, TemplatingError::Parse(_)));
    }

    #[test]
    fn test_engine_includes_partials() {
        let engine = engine(&[
            ("page:main", "<main>{% include \"page:part\" %}</main>"),
            ("page:part", "<b>{{ name }}</b>"),
        ]);
        assert_eq!(
            engine.render("page:main", &globals("x")).unwrap(),
            "<main><b>x</b></main>"
        );
    }
}
