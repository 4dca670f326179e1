use crate::api_doc::ApiDoc;
use crate::config::{Config, SecurityHeader};
use crate::demo;
use crate::serializer::{serialize_json, serialize_yaml, write_document};
use crate::server::serve;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Swagger doc server - builds a Swagger 2.0 document from typed handler descriptions
#[derive(Parser, Debug)]
#[command(name = "swagger-doc")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// YAML config file; command-line flags override its values
    #[arg(short = 'c', long = "config", env = "SWAGGER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address to serve the documentation on
    #[arg(short = 'l', long = "listen", env = "SWAGGER_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// API prefix, e.g. /api/v1
    #[arg(long = "base-path", env = "SWAGGER_BASE_PATH")]
    pub base_path: Option<String>,

    /// Document title
    #[arg(long = "title", env = "SWAGGER_DOC_TITLE")]
    pub title: Option<String>,

    /// Document description
    #[arg(long = "description", env = "SWAGGER_DOC_DESC")]
    pub description: Option<String>,

    /// Document version
    #[arg(long = "doc-version", env = "SWAGGER_DOC_VERSION")]
    pub doc_version: Option<String>,

    /// URL path prefix of the documentation endpoints
    #[arg(long = "url-prefix", env = "SWAGGER_URL_PREFIX")]
    pub url_prefix: Option<String>,

    /// Address of the Swagger UI to redirect to
    #[arg(long = "ui-url", env = "SWAGGER_UI_URL")]
    pub swagger_ui_url: Option<String>,

    /// Directory of doc files, read only in debug mode
    #[arg(long = "doc-file-path", env = "SWAGGER_DOC_FILE_PATH", value_name = "DIR")]
    pub doc_file_path: Option<PathBuf>,

    /// Header carrying an API key, may be repeated
    #[arg(long = "header", env = "SWAGGER_HEADERS", value_delimiter = ',')]
    pub headers: Vec<String>,

    /// Debug mode, allows reading doc files from disk
    #[arg(long = "debug", env = "SWAGGER_DEBUG")]
    pub debug: bool,

    /// Write the document to FILE and exit instead of serving it
    #[arg(short = 'o', long = "dump", value_name = "FILE")]
    pub dump: Option<PathBuf>,

    /// Dump format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(ref config) = args.config {
        if !config.is_file() {
            anyhow::bail!("Config file does not exist: {}", config.display());
        }
    }

    if let Some(ref dir) = args.doc_file_path {
        if !args.debug {
            log::warn!(
                "Ignoring doc file path {} outside debug mode",
                dir.display()
            );
        } else if !dir.is_dir() {
            anyhow::bail!("Doc file path is not a directory: {}", dir.display());
        }
    }

    if let Some(ref output) = args.dump {
        info!("Output file: {} ({:?})", output.display(), args.output_format);
    } else {
        info!("Listening address: {}", args.listen);
    }

    Ok(args)
}

/// Merge the config file with the command-line overrides
pub fn build_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_yaml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let overrides = [
        (&args.base_path, &mut config.base_path),
        (&args.title, &mut config.title),
        (&args.description, &mut config.description),
        (&args.doc_version, &mut config.doc_version),
        (&args.url_prefix, &mut config.url_prefix),
        (&args.swagger_ui_url, &mut config.swagger_ui_url),
    ];
    for (value, target) in overrides {
        if let Some(value) = value {
            *target = value.clone();
        }
    }

    if args.doc_file_path.is_some() {
        config.doc_file_path = args.doc_file_path.clone();
    }
    config.headers.extend(
        args.headers
            .iter()
            .filter(|h| !h.is_empty())
            .map(|h| SecurityHeader::new(h.as_str())),
    );
    config.debug |= args.debug;

    Ok(config.with_defaults())
}

/// Run the main workflow
pub async fn run(args: CliArgs) -> Result<()> {
    let config = build_config(&args)?;
    info!("Document: {} {}", config.title, config.doc_version);

    // Step 1: Register every operation; any error aborts start-up
    let mut doc = ApiDoc::new(config, demo::embedded_docs)?;
    demo::register(&mut doc).context("Failed to register API operations")?;
    info!("Registered {} paths", doc.registry().len());

    // Step 2: Either dump the document or serve it
    if let Some(output_path) = &args.dump {
        let document = doc.document();
        let content = match args.output_format {
            OutputFormat::Yaml => serialize_yaml(&document)?,
            OutputFormat::Json => serialize_json(&document)?,
        };
        write_document(&content, output_path)?;
        info!("Successfully wrote spec document to {}", output_path.display());
        return Ok(());
    }

    serve(doc.into_router()?, args.listen).await
}
