//! Error types for areal

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArealError {
    // Reference and CRS errors
    #[error("Invalid reference collection: {reason}")]
    InvalidReference { reason: String },

    #[error("CRS mismatch: {left_crs} is not compatible with {right_crs}")]
    CrsMismatch { left_crs: String, right_crs: String },

    // Geometry errors
    #[error("Degenerate geometry at feature {index}: area {area} is not usable as an interpolation source")]
    DegenerateGeometry { index: usize, area: f64 },

    #[error("Invalid geometry at feature {index}: {reason}")]
    InvalidGeometry { index: usize, reason: String },

    #[error("Geometry family mismatch: {operation} expects {expected}, found {found}")]
    GeometryFamilyMismatch {
        operation: String,
        expected: String,
        found: String,
    },

    #[error("Collection mixes geometry families: {first} and {second} (feature {index})")]
    MixedGeometryFamily {
        first: String,
        second: String,
        index: usize,
    },

    #[error("Invalid predicate: {reason}")]
    InvalidPredicate { reason: String },

    // Attribute errors
    #[error("Field not found: {field}")]
    MissingField { field: String },

    #[error("Field {field} holds a non-numeric value at feature {index}: {value}")]
    NonNumericAttribute {
        field: String,
        index: usize,
        value: String,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Format errors
    #[error("Invalid {format} input at {path}: {reason}")]
    Format {
        format: String,
        path: PathBuf,
        reason: String,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ArealError>;
