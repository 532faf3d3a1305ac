//! Named template sources
//!
//! Templates are addressed as `group:name`. A file at `fields/text.liquid`
//! below a template root becomes `fields:text`; deeper files keep the rest of
//! their path, so `form/parts/legend.liquid` becomes `form:parts/legend`.
//! The library also serves as the partial source for `{% include %}`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path};

use include_dir::{include_dir, Dir};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::config::TemplatingConfig;
use crate::error::{Result, TemplatingError};

static BUILTIN_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Template sources keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, String>,
}

impl TemplateLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled field and form templates.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        library.load_builtin(crate::config::DEFAULT_EXTENSION);
        library
    }

    /// Bundled templates (when enabled) followed by every configured directory.
    pub fn from_config(config: &TemplatingConfig) -> Result<Self> {
        let mut library = Self::new();
        if config.builtin {
            library.load_builtin(&config.extension);
        }
        for dir in &config.template_dirs {
            library.load_dir(dir, &config.extension)?;
        }
        Ok(library)
    }

    /// Add or replace a template, returning the source it replaced.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> Option<String> {
        self.templates.insert(name.into(), source.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn load_builtin(&mut self, extension: &str) {
        let before = self.len();
        self.load_embedded(&BUILTIN_TEMPLATES, extension);
        debug!(count = self.len() - before, "loaded builtin templates");
    }

    fn load_embedded(&mut self, dir: &Dir<'_>, extension: &str) {
        for file in dir.files() {
            let Some(name) = template_name(file.path(), extension) else {
                continue;
            };
            match file.contents_utf8() {
                Some(source) => {
                    self.add(name, source);
                }
                None => warn!(path = %file.path().display(), "skipping non-UTF-8 builtin template"),
            }
        }
        for sub in dir.dirs() {
            self.load_embedded(sub, extension);
        }
    }

    /// Load every `*{extension}` file below `dir`, overriding existing names.
    ///
    /// Returns the number of templates loaded. Unreadable files are skipped
    /// with a warning; a missing directory is an error.
    pub fn load_dir(&mut self, dir: &Path, extension: &str) -> Result<usize> {
        if !dir.is_dir() {
            return Err(TemplatingError::Io {
                path: dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let mut loaded = 0;
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(%err, "skipping unreadable template path");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
        {
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let Some(name) = template_name(relative, extension) else {
                continue;
            };
            match fs::read_to_string(entry.path()) {
                Ok(source) => {
                    trace!(%name, path = %entry.path().display(), "loaded template");
                    self.add(name, source);
                    loaded += 1;
                }
                Err(err) => warn!(path = %entry.path().display(), %err, "skipping unreadable template"),
            }
        }

        debug!(dir = %dir.display(), count = loaded, "loaded template directory");
        Ok(loaded)
    }
}

impl liquid::partials::PartialSource for TemplateLibrary {
    fn contains(&self, name: &str) -> bool {
        TemplateLibrary::contains(self, name)
    }

    fn names(&self) -> Vec<&str> {
        TemplateLibrary::names(self).collect()
    }

    fn try_get<'a>(&'a self, name: &str) -> Option<Cow<'a, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}

/// Template name for a path relative to a template root, `None` if the file
/// does not carry `extension`.
pub fn template_name(relative: &Path, extension: &str) -> Option<String> {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let joined = parts.join("/");
    let stem = joined.strip_suffix(extension)?;
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    Some(stem.replacen('/', ":", 1))
}
