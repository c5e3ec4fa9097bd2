//! Sheet file loading and input discovery.
//!
//! The parser never touches the filesystem; this module hands it raw bytes.

use crate::constants::SHEET_EXTENSIONS;
use crate::error::{HeatmapError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Read a sheet's raw bytes
pub async fn load_sheet(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| HeatmapError::io(path, e))?;
    debug!("Loaded {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

fn is_sheet_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SHEET_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Expand an input path into the sheet files it names.
///
/// A file is returned as-is whatever its extension. A directory is searched
/// recursively for sheet files, returned in sorted order.
pub fn discover_sheets(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(HeatmapError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input path does not exist"),
        ));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sheets = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_sheet_file(entry.path()) {
            sheets.push(entry.into_path());
        }
    }
    sheets.sort();

    debug!("Discovered {} sheet(s) under {}", sheets.len(), path.display());
    Ok(sheets)
}

/// Expand several input paths, keeping their order and dropping duplicates
pub fn discover_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sheets: Vec<PathBuf> = Vec::new();
    for path in paths {
        for sheet in discover_sheets(path)? {
            if !sheets.contains(&sheet) {
                sheets.push(sheet);
            }
        }
    }
    Ok(sheets)
}
