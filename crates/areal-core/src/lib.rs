//! Areal Core - Domain models, errors, and configuration
//!
//! This crate contains the feature/collection model shared by every areal crate,
//! the error taxonomy, layered configuration, and GeoJSON I/O.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;

pub use error::{ArealError, Result};
pub use models::{
    AttributeValue, Attributes, Crs, Feature, FeatureCollection, Geometry, GeometryFamily,
};
