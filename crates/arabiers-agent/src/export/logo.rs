//! Placeholder logo for the UI header

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;

use crate::error::{Error, Result};

/// 1x1 transparent PNG
const PLACEHOLDER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mP8Xw8AAnsB9wE7k3MAAAAASUVORK5CYII=";

/// Write the placeholder logo to `path` if nothing is there yet.
///
/// Returns `true` when the file was created.
pub fn ensure_logo(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    let bytes = BASE64
        .decode(PLACEHOLDER_PNG)
        .map_err(|e| Error::internal(format!("Invalid embedded logo: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;

    tracing::info!("Created placeholder logo at {}", path.display());
    Ok(true)
}
