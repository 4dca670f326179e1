//! The owner of everything registered for one application.
//!
//! An [`ApiDoc`] is created once by the application's composition root,
//! receives every registration during start-up and is finally consumed by
//! [`ApiDoc::into_router`] (or [`ApiDoc::document`] for an offline dump).

use crate::config::Config;
use crate::doc_file::{DocFileResolver, DocLoader};
use crate::entry::{build, MethodSpec, OperationDescriptor};
use crate::error::Result;
use crate::registry::{normalize_path, HttpMethod, PathEntry, SpecRegistry};
use crate::schema::SchemaNode;
use crate::validate::validate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SWAGGER_VERSION: &str = "2.0";

/// Swagger info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub description: String,
    pub title: String,
    pub version: String,
}

/// Header based API key definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityDefinition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "in")]
    pub location: String,
    pub name: String,
}

/// The aggregate document served by the spec endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDocument {
    pub base_path: String,
    pub swagger: String,
    pub info: Info,
    pub definition: BTreeMap<String, SchemaNode>,
    pub paths: BTreeMap<String, PathEntry>,
    pub security_definitions: BTreeMap<String, SecurityDefinition>,
}

/// Collects operations and assembles the document
pub struct ApiDoc {
    config: Config,
    registry: SpecRegistry,
    resolver: DocFileResolver,
}

impl ApiDoc {
    /// Create the documentation owner.
    ///
    /// `loader` supplies doc files unless debug mode enables
    /// `config.doc_file_path`.
    pub fn new(config: Config, loader: impl DocLoader + 'static) -> Result<Self> {
        let config = config.with_defaults();
        debug!("Initializing ApiDoc with prefix /{}", config.url_prefix);

        let mut resolver = DocFileResolver::new(loader);
        if let Some(dir) = config.effective_doc_path() {
            resolver = resolver.with_doc_dir(dir)?;
        }

        Ok(Self {
            config,
            registry: SpecRegistry::new(),
            resolver,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// Register an operation described by typed inputs.
    ///
    /// `group_prefix` is the prefix of the route group the handler is mounted
    /// on, `path` the route relative to it.
    pub fn register_typed(
        &mut self,
        group_prefix: &str,
        path: &str,
        method: HttpMethod,
        spec: &MethodSpec,
    ) -> Result<()> {
        let entry = build(spec)?;
        self.finish(group_prefix, path, method, entry)
    }

    /// Register an operation taken from a doc file, `reference` being `file:node`.
    pub fn register_from_doc(
        &mut self,
        group_prefix: &str,
        path: &str,
        method: HttpMethod,
        reference: &str,
    ) -> Result<()> {
        let entry = self.resolver.resolve(reference)?.clone();
        self.finish(group_prefix, path, method, entry)
    }

    fn finish(
        &mut self,
        group_prefix: &str,
        path: &str,
        method: HttpMethod,
        entry: OperationDescriptor,
    ) -> Result<()> {
        validate(&entry)?;
        let path = normalize_path(&self.config.base_path, group_prefix, path);
        info!("Registered {} {}", method, path);
        self.registry.register(&path, method, entry);
        Ok(())
    }

    /// Assemble the full document from everything registered so far.
    pub fn document(&self) -> SpecDocument {
        let security_definitions = self
            .config
            .headers
            .iter()
            .map(|header| {
                (
                    header.key().to_string(),
                    SecurityDefinition {
                        description: header.description.clone(),
                        kind: "apiKey".to_string(),
                        location: "header".to_string(),
                        name: header.name.clone(),
                    },
                )
            })
            .collect();

        SpecDocument {
            base_path: self.config.base_path.clone(),
            swagger: SWAGGER_VERSION.to_string(),
            info: Info {
                description: self.config.description.clone(),
                title: self.config.title.clone(),
                version: self.config.doc_version.clone(),
            },
            definition: BTreeMap::new(),
            paths: self.registry.snapshot().clone(),
            security_definitions,
        }
    }
}
