use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "API Documentation";
pub const DEFAULT_DESCRIPTION: &str = "API documentation";
pub const DEFAULT_DOC_VERSION: &str = "0.0.1";
pub const DEFAULT_SWAGGER_UI_URL: &str = "http://petstore.swagger.io/";
pub const DEFAULT_URL_PREFIX: &str = "apidoc";

/// Header used by Swagger UI to send credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeader {
    /// Header name, e.g. `Authorization`
    pub name: String,
    /// Key of the definition in `securityDefinitions`; defaults to `name`
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl SecurityHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            description: String::new(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }
}

/// Settings for document assembly and the documentation endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API prefix such as `/api/v1`, stripped from registered paths and
    /// published as `basePath`
    pub base_path: String,
    pub title: String,
    pub description: String,
    pub doc_version: String,
    /// Hosted Swagger UI the index endpoint redirects to
    pub swagger_ui_url: String,
    /// Path segment under which the endpoints are mounted
    pub url_prefix: String,
    /// Directory of doc files; only honored in debug mode
    pub doc_file_path: Option<PathBuf>,
    pub headers: Vec<SecurityHeader>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            doc_version: DEFAULT_DOC_VERSION.to_string(),
            swagger_ui_url: DEFAULT_SWAGGER_UI_URL.to_string(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            doc_file_path: None,
            headers: Vec::new(),
            debug: false,
        }
    }
}

impl Config {
    /// Load a config file, filling absent keys with defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config.with_defaults())
    }

    /// Replace empty settings by their defaults and tidy the prefixes.
    pub fn with_defaults(mut self) -> Self {
        fill(&mut self.title, DEFAULT_TITLE);
        fill(&mut self.description, DEFAULT_DESCRIPTION);
        fill(&mut self.doc_version, DEFAULT_DOC_VERSION);
        fill(&mut self.swagger_ui_url, DEFAULT_SWAGGER_UI_URL);
        self.url_prefix = self.url_prefix.trim_matches('/').to_string();
        fill(&mut self.url_prefix, DEFAULT_URL_PREFIX);
        if self.base_path.len() > 1 {
            self.base_path = self.base_path.trim_end_matches('/').to_string();
        }
        self
    }

    /// Doc directory to read from, which requires debug mode.
    pub fn effective_doc_path(&self) -> Option<&Path> {
        if self.debug {
            self.doc_file_path.as_deref()
        } else {
            None
        }
    }
}

fn fill(value: &mut String, default: &str) {
    if value.is_empty() {
        *value = default.to_string();
    }
}
