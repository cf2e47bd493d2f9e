//! Format abstraction layer for feature collection I/O
//!
//! Each format implements the `FormatReader` and `FormatWriter` traits, and
//! `format_for_path` dispatches on the file extension.

use std::path::Path;

use crate::error::{ArealError, Result};
use crate::models::FeatureCollection;

pub mod geojson;

pub use self::geojson::GeoJsonFormat;

/// Format reader trait that all format implementations must implement
pub trait FormatReader: Send + Sync {
    /// Read a feature collection from the given path
    fn read(&self, path: &Path) -> Result<FeatureCollection>;

    /// Get supported file extensions (e.g., ["geojson"])
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name (e.g., "GeoJSON")
    fn format_name(&self) -> &str;
}

/// Format writer trait
pub trait FormatWriter: Send + Sync {
    /// Write a feature collection to the given path, replacing any existing file
    fn write(&self, collection: &FeatureCollection, path: &Path) -> Result<()>;
}

/// Pick a reader for a path by its extension
pub fn format_for_path(path: &Path) -> Result<GeoJsonFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let format = GeoJsonFormat;
    if format.supported_extensions().contains(&extension.as_str()) {
        Ok(format)
    } else {
        Err(ArealError::Format {
            format: "unknown".to_string(),
            path: path.to_path_buf(),
            reason: format!(
                "Unsupported file extension '{}'. Supported: {}",
                extension,
                format.supported_extensions().join(", ")
            ),
        })
    }
}

/// Read a feature collection, detecting the format from the path
pub fn read_collection(path: &Path) -> Result<FeatureCollection> {
    format_for_path(path)?.read(path)
}

/// Write a feature collection, detecting the format from the path
pub fn write_collection(collection: &FeatureCollection, path: &Path) -> Result<()> {
    format_for_path(path)?.write(collection, path)
}
