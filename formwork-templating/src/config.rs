//! Templating configuration loaded with figment
//!
//! Sources are merged in precedence order, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. An optional configuration file (TOML, YAML or JSON, chosen by extension)
//! 3. Environment variables prefixed with `FORMWORK_`

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TemplatingError};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "FORMWORK_";

/// Default template file extension
pub const DEFAULT_EXTENSION: &str = ".liquid";

/// Where templates come from and how their files are named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatingConfig {
    /// User template directories, later ones overriding earlier ones
    pub template_dirs: Vec<PathBuf>,
    /// File extension of template files, including the dot
    pub extension: String,
    /// Load the bundled templates before any user directory
    pub builtin: bool,
}

impl Default for TemplatingConfig {
    fn default() -> Self {
        Self {
            template_dirs: Vec::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            builtin: true,
        }
    }
}

impl TemplatingConfig {
    /// Load from defaults and the environment.
    pub fn load() -> Result<Self> {
        Self::extract(Self::figment(None)?)
    }

    /// Load from defaults, `path` and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::extract(Self::figment(Some(path))?)
    }

    /// The merged provider chain, for callers that want to add their own layers.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = file {
            debug!(path = %path.display(), "loading templating configuration file");
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => return Err(TemplatingError::UnsupportedFormat(path.to_path_buf())),
            };
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        debug!(
            dirs = config.template_dirs.len(),
            extension = %config.extension,
            builtin = config.builtin,
            "loaded templating configuration"
        );
        Ok(config)
    }

    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dirs.push(dir.into());
        self
    }

    pub fn with_builtin(mut self, builtin: bool) -> Self {
        self.builtin = builtin;
        self
    }
}
