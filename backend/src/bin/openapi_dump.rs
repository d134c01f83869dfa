//! Print the OpenAPI document as JSON.

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use kiosk_backend::doc::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the kiosk backend OpenAPI document as JSON",
    version
)]
struct CliArgs {
    /// Write the document to a file instead of standard output.
    #[arg(long = "out", value_name = "path")]
    out: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let document = ApiDoc::openapi().to_json().map_err(io::Error::other)?;
    match args.out {
        Some(path) => fs::write(path, document)?,
        None => println!("{document}"),
    }
    Ok(())
}
