//! Swagger doc - serves the Swagger 2.0 document of the bundled user service.
//!
//! # Usage
//!
//! ```bash
//! swagger-doc [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Serve the document and the UI redirect:
//! ```bash
//! swagger-doc --base-path /api/v1 --listen 0.0.0.0:8080
//! ```
//!
//! Read doc files from disk while editing them:
//! ```bash
//! swagger-doc --debug --doc-file-path ./docs
//! ```
//!
//! Write the document to a file instead of serving it:
//! ```bash
//! swagger-doc -f yaml -o swagger.yaml
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_doc::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger doc starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args).await?;

    Ok(())
}
