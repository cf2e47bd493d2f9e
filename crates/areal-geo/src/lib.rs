//! Areal Geo - Geometry engine, predicates, validation, and indexing
//!
//! This crate is the geometry provider for the overlay operations: it converts
//! canonical geometries to `geo` types, exposes the `GeometryEngine` seam with a
//! planar implementation, and evaluates spatial predicates.

pub mod crs;
pub mod engine;
pub mod index;
pub mod models;
pub mod predicate;
pub mod validation;

pub use crs::{check_crs_mismatch, crs_match};
pub use engine::{GeometryEngine, PlanarEngine};
pub use index::SpatialIndex;
pub use models::{from_geo_geometry, to_geo_geometry, GeometryExt};
pub use predicate::Predicate;
pub use validation::{
    check_geometries, count_invalid_geometries, validate_geometry, ValidationError,
    ValidationResult,
};
