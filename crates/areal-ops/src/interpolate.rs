//! Area-weighted interpolation between incongruent polygon layers.
//!
//! Each source value is assumed to be spread uniformly over its polygon. A
//! target receives, per overlapping source `s`, the share
//! `area(s ∩ t) / area(s)` of an extensive value, or the overlap-area-weighted
//! mean of an intensive value.

use areal_core::error::{ArealError, Result};
use areal_core::models::{AttributeValue, Feature, FeatureCollection, GeometryFamily};
use areal_geo::crs::check_crs_mismatch;
use areal_geo::engine::GeometryEngine;
use areal_geo::index::SpatialIndex;
use geo::Geometry as GeoGeometry;

use crate::execution::ParallelStrategy;
use crate::fields::{numeric_value, prepare, require_family, require_fields};
use crate::models::AreaInterpolation;
use crate::ops::SpatialOps;

/// Message logged with every interpolation result
pub const ESTIMATE_NOTICE: &str =
    "Interpolated values are modeled estimates assuming each source value is uniformly distributed over its polygon";

/// Numeric values of one field, indexed by source feature
struct SourceField {
    name: String,
    extensive: bool,
    values: Vec<Option<f64>>,
}

impl<E> SpatialOps<E>
where
    E: GeometryEngine,
{
    /// Interpolate `fields` from `source` polygons onto `target` polygons.
    ///
    /// With `extensive` set, targets without overlap get `0.0`; otherwise they
    /// get null.
    pub fn interpolate_area_weighted<S: AsRef<str>>(
        &self,
        source: &FeatureCollection,
        target: &FeatureCollection,
        fields: &[S],
        extensive: bool,
    ) -> Result<FeatureCollection> {
        let names = fields.iter().map(|f| f.as_ref().to_string());
        let request = if extensive {
            AreaInterpolation::new().extensive(names)
        } else {
            AreaInterpolation::new().intensive(names)
        };
        self.interpolate(source, target, &request)
    }

    /// Interpolate extensive and intensive fields in one pass.
    ///
    /// The output has the target geometries and attributes, followed by one
    /// column per requested field (replacing a same-named target attribute).
    pub fn interpolate(
        &self,
        source: &FeatureCollection,
        target: &FeatureCollection,
        request: &AreaInterpolation,
    ) -> Result<FeatureCollection> {
        require_family(source, GeometryFamily::Polygon, "interpolate_area_weighted")?;
        require_family(target, GeometryFamily::Polygon, "interpolate_area_weighted")?;
        check_crs_mismatch(source.crs(), target.crs())?;
        require_fields(source, request.fields())?;

        let fields = source_fields(source, request)?;
        let source_geoms = prepare(source, self.options.validity)?;
        let target_geoms = prepare(target, self.options.validity)?;

        let source_areas: Vec<f64> = source_geoms.iter().map(|g| self.engine.area(g)).collect();
        if let Some((index, &area)) =
            source_areas.iter().enumerate().find(|&(_, &area)| area <= self.options.area_epsilon)
        {
            return Err(ArealError::DegenerateGeometry { index, area });
        }

        tracing::info!("{}", ESTIMATE_NOTICE);

        let index = SpatialIndex::from_geometries(&source_geoms);
        let features = self.executor.try_map(target.len(), |t| {
            let target_geom = &target_geoms[t];

            let mut overlaps = Vec::new();
            for s in index.candidates(target_geom, 0.0) {
                let overlap = self.engine.intersection(&source_geoms[s], target_geom)?;
                let overlap_area = self.engine.area(&GeoGeometry::MultiPolygon(overlap));
                if overlap_area > 0.0 {
                    overlaps.push((s, overlap_area));
                }
            }

            let target_feature = &target.features()[t];
            let mut attributes = target_feature.attributes.clone();
            for field in &fields {
                let value = if field.extensive {
                    extensive_value(&field.values, &overlaps, &source_areas)
                } else {
                    intensive_value(&field.values, &overlaps)
                };
                attributes.shift_remove(&field.name);
                attributes.insert(field.name.clone(), value);
            }

            Ok(Feature::new(target_feature.geometry.clone(), attributes))
        })?;

        tracing::debug!(
            sources = source.len(),
            targets = target.len(),
            extensive = request.extensive.len(),
            intensive = request.intensive.len(),
            "Area-weighted interpolation complete"
        );

        FeatureCollection::new(target.crs().or(source.crs()).cloned(), features)
    }
}

fn source_fields(source: &FeatureCollection, request: &AreaInterpolation) -> Result<Vec<SourceField>> {
    let extensive = request.extensive.iter().map(|name| (name, true));
    let intensive = request.intensive.iter().map(|name| (name, false));

    extensive
        .chain(intensive)
        .map(|(name, extensive)| {
            let values = source
                .iter()
                .enumerate()
                .map(|(index, feature)| match feature.attribute(name) {
                    Some(value) => numeric_value(name, index, value),
                    None => Ok(None),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(SourceField { name: name.clone(), extensive, values })
        })
        .collect()
}

/// `Σ v(s) · overlap(s, t) / area(s)`; zero when nothing overlaps
fn extensive_value(values: &[Option<f64>], overlaps: &[(usize, f64)], areas: &[f64]) -> AttributeValue {
    let total: f64 = overlaps
        .iter()
        .filter_map(|&(s, overlap)| values[s].map(|v| v * overlap / areas[s]))
        .sum();
    AttributeValue::Float(total)
}

/// `Σ v(s) · overlap(s, t) / Σ overlap(s, t)`; null when nothing overlaps
fn intensive_value(values: &[Option<f64>], overlaps: &[(usize, f64)]) -> AttributeValue {
    let (weighted, weight) = overlaps
        .iter()
        .filter_map(|&(s, overlap)| values[s].map(|v| (v * overlap, overlap)))
        .fold((0.0, 0.0), |(sum, total), (v, w)| (sum + v, total + w));

    if weight > 0.0 {
        AttributeValue::Float(weighted / weight)
    } else {
        AttributeValue::Null
    }
}
