use std::hash::Hash;

use areal_core::error::{ArealError, Result};
use areal_core::models::{
    AttributeKey, AttributeValue, Attributes, Feature, FeatureCollection, GeometryFamily,
};
use areal_geo::crs::check_crs_mismatch;
use areal_geo::engine::GeometryEngine;
use areal_geo::index::SpatialIndex;
use areal_geo::models::from_geo_geometry;
use indexmap::IndexMap;

use crate::execution::ParallelStrategy;
use crate::fields::{prepare, require_family, require_fields};
use crate::models::FieldReducer;
use crate::ops::SpatialOps;

impl<E> SpatialOps<E>
where
    E: GeometryEngine,
{
    /// Group features by `group_key` and reduce each group to one feature.
    ///
    /// Groups appear in order of first appearance. A group's geometry is the
    /// union of its members, and its attributes are the key under `key_name`
    /// followed by one column per reducer.
    pub fn aggregate_by<K, F>(
        &self,
        source: &FeatureCollection,
        key_name: &str,
        group_key: F,
        reducers: &[FieldReducer],
    ) -> Result<FeatureCollection>
    where
        K: Hash + Eq + Into<AttributeValue> + Send + Sync,
        F: Fn(&Feature) -> K,
    {
        require_fields(source, reducers.iter().map(|r| r.field.as_str()))?;
        let geoms = prepare(source, self.options.validity)?;

        let mut groups: IndexMap<K, Vec<usize>> = IndexMap::new();
        for (index, feature) in source.iter().enumerate() {
            groups.entry(group_key(feature)).or_default().push(index);
        }
        let groups: Vec<(K, Vec<usize>)> = groups.into_iter().collect();

        let merged = self.executor.try_map(groups.len(), |g| {
            let members = &groups[g].1;
            let member_geoms: Vec<_> = members.iter().map(|&i| geoms[i].clone()).collect();
            let union = self.engine.union(&member_geoms)?;
            let geometry = from_geo_geometry(&union).ok_or_else(|| ArealError::InvalidGeometry {
                index: members[0],
                reason: "Union produced a geometry collection".to_string(),
            })?;
            let reduced = reduce_members(source, members, reducers)?;
            Ok((geometry, reduced))
        })?;

        let features: Vec<Feature> = groups
            .into_iter()
            .zip(merged)
            .map(|((key, _), (geometry, reduced))| {
                let mut attributes = Attributes::new();
                attributes.insert(key_name.to_string(), key.into());
                extend_replacing(&mut attributes, reduced);
                Feature::new(geometry, attributes)
            })
            .collect();

        tracing::debug!(
            key = key_name,
            features = source.len(),
            groups = features.len(),
            "Aggregation complete"
        );

        FeatureCollection::new(source.crs().cloned(), features)
    }

    /// Merge features sharing a value of `field`, reducing the other fields
    pub fn dissolve(
        &self,
        source: &FeatureCollection,
        field: &str,
        reducers: &[FieldReducer],
    ) -> Result<FeatureCollection> {
        require_fields(source, [field])?;
        self.aggregate_by(
            source,
            field,
            |feature| AttributeKey(feature.attribute(field).cloned().unwrap_or_default()),
            reducers,
        )
    }

    /// Group points by the first zone (in zone order) that intersects them.
    ///
    /// Yields one feature per zone with at least one member, in zone order,
    /// carrying the zone geometry and attributes followed by the reduced
    /// fields. Points inside no zone are dropped.
    pub fn aggregate_by_containment(
        &self,
        points: &FeatureCollection,
        zones: &FeatureCollection,
        reducers: &[FieldReducer],
    ) -> Result<FeatureCollection> {
        require_family(points, GeometryFamily::Point, "aggregate_by_containment")?;
        require_family(zones, GeometryFamily::Polygon, "aggregate_by_containment")?;
        check_crs_mismatch(points.crs(), zones.crs())?;
        require_fields(points, reducers.iter().map(|r| r.field.as_str()))?;

        let point_geoms = prepare(points, self.options.validity)?;
        let zone_geoms = prepare(zones, self.options.validity)?;
        let index = SpatialIndex::from_geometries(&zone_geoms);

        let assignment = self.executor.map(point_geoms.len(), |p| {
            index
                .candidates(&point_geoms[p], 0.0)
                .into_iter()
                .find(|&z| self.engine.intersects(&point_geoms[p], &zone_geoms[z]))
        })?;

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); zones.len()];
        for (point, zone) in assignment.iter().enumerate() {
            if let Some(zone) = zone {
                members[*zone].push(point);
            }
        }
        let unassigned = assignment.iter().filter(|zone| zone.is_none()).count();

        let occupied: Vec<usize> = (0..zones.len()).filter(|&z| !members[z].is_empty()).collect();
        let reduced = self
            .executor
            .try_map(occupied.len(), |i| reduce_members(points, &members[occupied[i]], reducers))?;

        let features: Vec<Feature> = occupied
            .iter()
            .zip(reduced)
            .map(|(&z, reduced)| {
                let zone = &zones.features()[z];
                let mut attributes = zone.attributes.clone();
                extend_replacing(&mut attributes, reduced);
                Feature::new(zone.geometry.clone(), attributes)
            })
            .collect();

        tracing::debug!(
            points = points.len(),
            zones = zones.len(),
            occupied = features.len(),
            unassigned,
            "Containment aggregation complete"
        );

        FeatureCollection::new(zones.crs().or(points.crs()).cloned(), features)
    }
}

fn reduce_members(
    source: &FeatureCollection,
    members: &[usize],
    reducers: &[FieldReducer],
) -> Result<Vec<(String, AttributeValue)>> {
    let null = AttributeValue::Null;
    reducers
        .iter()
        .map(|spec| {
            let values: Vec<(usize, &AttributeValue)> = members
                .iter()
                .map(|&i| (i, source.features()[i].attribute(&spec.field).unwrap_or(&null)))
                .collect();
            let value = spec.reducer.reduce(&spec.field, &values)?;
            Ok((spec.output_name().to_string(), value))
        })
        .collect()
}

/// Append columns at the end, moving any same-named column there
fn extend_replacing(attributes: &mut Attributes, columns: Vec<(String, AttributeValue)>) {
    for (name, value) in columns {
        attributes.shift_remove(&name);
        attributes.insert(name, value);
    }
}
