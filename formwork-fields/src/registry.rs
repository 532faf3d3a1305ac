//! Field type registry and the per-request binding context.
//!
//! Factory fields name their type by tag; the tag is resolved against the
//! registry reachable from the [`Request`] when the field is bound.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::params::Params;
use crate::render::Renderer;
use crate::types::{builtin_types, FieldType};

/// Opaque application object passed through binding untouched.
pub type Context = Arc<dyn Any + Send + Sync>;

/// Registry of field type implementations keyed by tag.
#[derive(Clone, Default)]
pub struct FieldRegistry {
    types: HashMap<String, Arc<dyn FieldType>>,
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in field type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for ty in builtin_types() {
            registry.register_arc(ty);
        }
        registry
    }

    /// Register a type under its own tag, returning any type it replaced.
    pub fn register<T: FieldType + 'static>(&mut self, ty: T) -> Option<Arc<dyn FieldType>> {
        self.register_arc(Arc::new(ty))
    }

    pub fn register_arc(&mut self, ty: Arc<dyn FieldType>) -> Option<Arc<dyn FieldType>> {
        let tag = ty.tag().to_string();
        debug!(%tag, "registered field type");
        self.types.insert(tag, ty)
    }

    /// Register a type under an alias tag.
    pub fn register_as(
        &mut self,
        tag: impl Into<String>,
        ty: Arc<dyn FieldType>,
    ) -> Option<Arc<dyn FieldType>> {
        self.types.insert(tag.into(), ty)
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn FieldType>> {
        self.types.get(tag).cloned()
    }

    /// Look up a tag, failing when nothing is registered for it.
    pub fn resolve(&self, tag: &str) -> Result<Arc<dyn FieldType>> {
        self.get(tag).ok_or_else(|| FieldsError::UnknownFieldType {
            tag: tag.to_string(),
        })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.types.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// The request-side collaborators a field needs: type registry and renderer.
#[derive(Debug, Clone)]
pub struct Request {
    registry: Arc<FieldRegistry>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Request {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self {
            registry,
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> Option<&Arc<dyn Renderer>> {
        self.renderer.as_ref()
    }
}

impl Default for Request {
    /// A request with the built-in registry and no renderer.
    fn default() -> Self {
        Self::new(Arc::new(FieldRegistry::with_defaults()))
    }
}

/// Per-request values every bound field receives: request, params and context.
#[derive(Debug, Clone)]
pub struct Binding {
    request: Request,
    params: Arc<Params>,
    context: Option<Context>,
}

impl Binding {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            params: Arc::new(Params::new()),
            context: None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Arc::new(params);
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn params(&self) -> &Arc<Params> {
        &self.params
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}
