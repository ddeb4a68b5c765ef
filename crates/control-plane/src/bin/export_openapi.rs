// Export OpenAPI document as JSON
//
// Usage: cargo run --bin export-openapi > docs/api/openapi.json

use anyhow::{Context, Result};
use schedulink_control_plane::openapi::ApiDoc;

fn main() -> Result<()> {
    let json = ApiDoc::to_json().context("Failed to serialize OpenAPI document")?;
    println!("{json}");
    Ok(())
}
