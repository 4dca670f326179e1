//! Pre-authored operation descriptions referenced as `file:node`.
//!
//! A doc file is a YAML mapping from node name to an operation:
//!
//! ```yaml
//! create:
//!   summary: Create a user
//!   tags: [users]
//!   parameters:
//!     - in: body
//!       name: body
//!       required: true
//!       type: object
//!       schema:
//!         type: object
//!   responses:
//!     200:
//!       schema:
//!         type: object
//! ```
//!
//! Files are loaded once, on the first reference, either from a directory
//! (debug mode only) or through a caller supplied [`DocLoader`], and stay
//! cached for the lifetime of the resolver.

use crate::entry::OperationDescriptor;
use crate::error::{Error, Result};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Contents of one doc file
pub type DocFile = BTreeMap<String, OperationDescriptor>;

/// Supplies the raw bytes of a doc file by key.
pub trait DocLoader: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

impl<F> DocLoader for F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self(key)
    }
}

/// A parsed `file:node` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocReference<'a> {
    pub file: &'a str,
    pub node: &'a str,
}

impl<'a> DocReference<'a> {
    /// Split a reference on its first `:`; both halves must be non-empty.
    pub fn parse(reference: &'a str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        let (file, node) = reference
            .split_once(':')
            .ok_or_else(|| invalid("expected 'file:node'"))?;
        if file.is_empty() {
            return Err(invalid("empty file"));
        }
        if node.is_empty() {
            return Err(invalid("empty node"));
        }
        Ok(Self { file, node })
    }
}

/// Resolves doc references against lazily loaded, cached doc files
pub struct DocFileResolver {
    doc_dir: Option<PathBuf>,
    loader: Box<dyn DocLoader>,
    cache: HashMap<String, DocFile>,
}

impl DocFileResolver {
    /// Create a resolver that only uses `loader`.
    pub fn new(loader: impl DocLoader + 'static) -> Self {
        debug!("Initializing DocFileResolver");
        Self {
            doc_dir: None,
            loader: Box::new(loader),
            cache: HashMap::new(),
        }
    }

    /// Read doc files from `dir` instead of the loader.
    ///
    /// The directory is made absolute immediately so later changes of the
    /// working directory do not affect lookups.
    pub fn with_doc_dir(mut self, dir: &Path) -> Result<Self> {
        let absolute = std::path::absolute(dir).map_err(|e| {
            Error::Config(format!("cannot resolve doc directory {}: {}", dir.display(), e))
        })?;
        debug!("Doc files will be read from {}", absolute.display());
        self.doc_dir = Some(absolute);
        Ok(self)
    }

    pub fn doc_dir(&self) -> Option<&Path> {
        self.doc_dir.as_deref()
    }

    /// Look up the operation a `file:node` reference points to.
    pub fn resolve(&mut self, reference: &str) -> Result<&OperationDescriptor> {
        let DocReference { file, node } = DocReference::parse(reference)?;

        if !self.cache.contains_key(file) {
            let doc = self.load(file)?;
            info!("Loaded doc file {} ({} entries)", file, doc.len());
            self.cache.insert(file.to_string(), doc);
        } else {
            debug!("Doc file {} found in cache", file);
        }

        self.cache
            .get(file)
            .and_then(|doc| doc.get(node))
            .ok_or_else(|| Error::MissingNode {
                file: file.to_string(),
                node: node.to_string(),
            })
    }

    /// Whether `file` has already been loaded.
    pub fn is_cached(&self, file: &str) -> bool {
        self.cache.contains_key(file)
    }

    fn load(&self, file: &str) -> Result<DocFile> {
        let load_error = |message: String| Error::DocLoad {
            file: file.to_string(),
            message,
        };

        let bytes = match &self.doc_dir {
            Some(dir) => {
                let path = dir.join(file);
                debug!("Reading doc file {}", path.display());
                std::fs::read(&path)
                    .map_err(|e| load_error(format!("{}: {}", path.display(), e)))?
            }
            None => {
                debug!("Loading doc file {} through the loader", file);
                self.loader.load(file).map_err(|e| load_error(format!("{:#}", e)))?
            }
        };

        serde_yaml::from_slice(&bytes).map_err(|e| load_error(e.to_string()))
    }
}
