use std::fs;
use std::sync::Arc;

use formwork_fields::{
    Binding, BoolField, Field, FieldValue, IntegerField, Mode, Params, Request, TextField,
};
use formwork_templating::{LiquidRenderer, TemplateEngine, TemplatingConfig};
use tempfile::TempDir;

fn binding(params: Params) -> Binding {
    let renderer = Arc::new(LiquidRenderer::builtin().unwrap());
    Binding::new(Request::default().with_renderer(renderer)).with_params(params)
}

fn address() -> Field {
    Field::composite(
        "addr",
        vec![
            Field::typed("street", TextField),
            Field::typed("zip", IntegerField).description("Five digits"),
        ],
    )
    .unwrap()
}

#[test]
fn test_text_input_escapes_value() {
    let mut bound = Field::typed("title", TextField)
        .css_class("wide")
        .bind(&binding(Params::new()), "", FieldValue::from("<b>hi</b>"))
        .unwrap();
    bound.update();

    let html = bound.render().unwrap();
    assert!(html.contains(r#"name="title""#));
    assert!(html.contains(r#"class="wide""#));
    assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
}

#[test]
fn test_readonly_renders_display_template() {
    let mut bound = Field::typed("title", TextField)
        .readonly(true)
        .bind(&binding(Params::new()), "", FieldValue::from("Hello"))
        .unwrap();
    bound.update();
    assert_eq!(bound.mode(), Mode::Display);

    let html = bound.render().unwrap();
    assert!(html.starts_with(r#"<span class="field-display" id="title">Hello</span>"#));
}

#[test]
fn test_checkbox_checked_from_bound_value() {
    let mut bound = Field::typed("agree", BoolField)
        .bind(&binding(Params::new()), "", FieldValue::from(true))
        .unwrap();
    bound.update();
    assert!(bound.render().unwrap().contains(" checked"));
}

#[test]
fn test_widget_wraps_input() {
    let mut bound = Field::typed("zip", IntegerField)
        .description("Five digits")
        .bind(&binding(Params::new()), "", FieldValue::Absent)
        .unwrap();
    bound.update();

    let html = bound.render_widget().unwrap();
    assert!(html.contains(r#"<label for="zip">Zip <span class="required">*</span></label>"#));
    assert!(html.contains(r#"<p class="description">Five digits</p>"#));
    assert!(html.contains(r#"type="number""#));
    assert!(!html.contains("has-error"));
}

#[test]
fn test_composite_renders_every_child_with_errors() {
    let params: Params = [("addr.street", "Main St")].into_iter().collect();
    let mut bound = address().bind(&binding(params), "", FieldValue::Absent).unwrap();

    let submitted = bound.extract();
    let err = bound.validate(&submitted).unwrap_err();
    assert_eq!(err.errors().len(), 1);
    bound.update();

    let html = bound.render_widget().unwrap();
    assert!(html.contains("<legend>Addr</legend>"));
    assert!(html.contains(r#"id="addr-street""#));
    assert!(html.contains(r#"value="Main St""#));
    assert!(html.contains(r#"id="addr-zip-widget""#));
    assert!(html.contains(r#"<p class="error-message">Required</p>"#));

    let street_at = html.find("addr-street").unwrap();
    let zip_at = html.find("addr-zip").unwrap();
    assert!(street_at < zip_at);
}

#[test]
fn test_composite_with_custom_input_uses_form_widget() {
    let renderer = {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("my")).unwrap();
        fs::write(
            dir.path().join("my/address.liquid"),
            "{% for child in fields %}[{{ child.name }}]{% endfor %}",
        )
        .unwrap();
        let config = TemplatingConfig::default().with_template_dir(dir.path());
        Arc::new(LiquidRenderer::new(Arc::new(
            TemplateEngine::from_config(&config).unwrap(),
        )))
    };
    let binding = Binding::new(Request::default().with_renderer(renderer));
    let bound = address()
        .input_template("my:address")
        .bind(&binding, "", FieldValue::Absent)
        .unwrap();

    assert_eq!(bound.render().unwrap(), "[addr.street][addr.zip]");
    let widget = bound.render_widget().unwrap();
    assert!(widget.starts_with(r#"<div class="form-widget" id="addr-widget">"#));
    assert!(widget.contains("<h3>Addr</h3>"));
}

#[test]
fn test_user_template_overrides_builtin() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("fields")).unwrap();
    fs::write(dir.path().join("fields/text.liquid"), "TEXT {{ id }}").unwrap();

    let config = TemplatingConfig::default().with_template_dir(dir.path());
    let engine = TemplateEngine::from_config(&config).unwrap();
    let renderer = Arc::new(LiquidRenderer::new(Arc::new(engine)));
    let binding = Binding::new(Request::default().with_renderer(renderer));

    let bound = Field::typed("title", TextField)
        .bind(&binding, "page.", FieldValue::Absent)
        .unwrap();
    assert_eq!(bound.render().unwrap(), "TEXT page-title");
}
