//! services/portal/src/bin/openapi.rs
//!
//! Writes the portal's OpenAPI document to the path given as the first argument,
//! or to `openapi.json` in the current directory.

use portal_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, spec_json)?;
    println!("OpenAPI specification for the training portal written to {}", path.display());
    Ok(())
}
