//! Swagger doc - Swagger 2.0 documents assembled from typed handler descriptions.
//!
//! Handlers describe their inputs and outputs at start-up, either with types
//! implementing [`reflect::Reflect`] or by pointing at an entry of a
//! pre-authored YAML doc file. Every description is validated and collected
//! into one document, which is then served over HTTP next to a redirect to a
//! hosted Swagger UI.
//!
//! # Architecture
//!
//! 1. [`reflect`] - Explicit type descriptors standing in for runtime reflection
//! 2. [`tag`] - Parses field tags into exposed names and options
//! 3. [`schema`] - Turns type descriptors into schema trees
//! 4. [`entry`] - Builds operation descriptions from typed inputs
//! 5. [`validate`] - Structural checks on operations
//! 6. [`registry`] - Operations by path and method
//! 7. [`doc_file`] - Cached `file:node` lookups in YAML doc files
//! 8. [`api_doc`] - Owns the above and assembles the document
//! 9. [`server`] - The `/{prefix}/spec` and `/{prefix}` endpoints
//! 10. [`serializer`] - JSON / YAML output of the document
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_doc::{
//!     api_doc::ApiDoc,
//!     config::Config,
//!     entry::MethodSpec,
//!     reflect::{FieldDesc, RecordDesc, Reflect, TypeDesc},
//!     registry::HttpMethod,
//! };
//!
//! struct Pong;
//!
//! impl Reflect for Pong {
//!     fn type_desc() -> TypeDesc {
//!         RecordDesc::new("Pong")
//!             .field(FieldDesc::of::<String>("Message").tag("message"))
//!             .into()
//!     }
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut doc = ApiDoc::new(Config::default(), |key: &str| -> anyhow::Result<Vec<u8>> {
//!     anyhow::bail!("no doc file {}", key)
//! })?;
//!
//! doc.register_typed(
//!     "/system",
//!     "/ping",
//!     HttpMethod::Get,
//!     &MethodSpec::new()
//!         .tags(["system"])
//!         .summary("Ping")
//!         .response::<Pong>(),
//! )?;
//!
//! let router = doc.into_router()?;
//! swagger_doc::server::serve(router, "127.0.0.1:8080".parse()?).await?;
//! # Ok(())
//! # }
//! ```

pub mod api_doc;
pub mod cli;
pub mod config;
pub mod demo;
pub mod doc_file;
pub mod entry;
pub mod error;
pub mod reflect;
pub mod registry;
pub mod schema;
pub mod serializer;
pub mod server;
pub mod tag;
pub mod validate;

pub use error::{Error, Result};
