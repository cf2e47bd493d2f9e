//! Field lookups shared by the operations

use areal_core::error::{ArealError, Result};
use areal_core::models::{AttributeValue, FeatureCollection, GeometryFamily, ValidityMode};
use areal_geo::models::to_geo_geometry;
use areal_geo::validation::check_geometries;
use geo::Geometry as GeoGeometry;

/// Numeric view of an attribute; null is `None`, anything non-numeric is an error
pub(crate) fn numeric_value(field: &str, index: usize, value: &AttributeValue) -> Result<Option<f64>> {
    if value.is_null() {
        return Ok(None);
    }
    value.as_f64().map(Some).ok_or_else(|| ArealError::NonNumericAttribute {
        field: field.to_string(),
        index,
        value: value.to_string(),
    })
}

/// Fail with `MissingField` for a field no feature carries.
///
/// An empty collection has no fields to check against and passes.
pub(crate) fn require_fields<'a>(
    collection: &FeatureCollection,
    fields: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    if collection.is_empty() {
        return Ok(());
    }
    for field in fields {
        if !collection.has_field(field) {
            return Err(ArealError::MissingField { field: field.to_string() });
        }
    }
    Ok(())
}

/// Fail with `GeometryFamilyMismatch` unless the collection is empty or of `family`
pub(crate) fn require_family(
    collection: &FeatureCollection,
    family: GeometryFamily,
    operation: &str,
) -> Result<()> {
    match collection.family() {
        Some(found) if found != family => Err(ArealError::GeometryFamilyMismatch {
            operation: operation.to_string(),
            expected: family.to_string(),
            found: found.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validate a collection's geometries and convert them once for the engine
pub(crate) fn prepare(collection: &FeatureCollection, mode: ValidityMode) -> Result<Vec<GeoGeometry>> {
    check_geometries(collection.iter().map(|f| &f.geometry), mode)?;
    Ok(collection.iter().map(|f| to_geo_geometry(&f.geometry)).collect())
}
