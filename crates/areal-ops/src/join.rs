use std::collections::HashSet;

use areal_core::error::Result;
use areal_core::models::{AttributeValue, Feature, FeatureCollection};
use areal_geo::crs::check_crs_mismatch;
use areal_geo::engine::GeometryEngine;
use areal_geo::index::SpatialIndex;
use areal_geo::predicate::Predicate;

use crate::execution::ParallelStrategy;
use crate::fields::prepare;
use crate::models::JoinMode;
use crate::ops::SpatialOps;

/// Right-hand attribute name and the column it is written to
struct RightColumn {
    source: String,
    output: String,
}

impl<E> SpatialOps<E>
where
    E: GeometryEngine,
{
    /// Attach the attributes of every right feature matching each left feature.
    ///
    /// A left feature with k matches yields k rows in right order, each with
    /// the left geometry. With no match, `Left` yields one row whose right
    /// columns are null and `Inner` yields none. Right names colliding with a
    /// left name get the configured suffix. The output CRS is the left one.
    pub fn join(
        &self,
        left: &FeatureCollection,
        right: &FeatureCollection,
        predicate: Predicate,
        mode: JoinMode,
    ) -> Result<FeatureCollection> {
        predicate.validate()?;
        check_crs_mismatch(left.crs(), right.crs())?;

        let left_geoms = prepare(left, self.options.validity)?;
        let right_geoms = prepare(right, self.options.validity)?;

        let columns = right_columns(left, right, &self.options.join_suffix);

        let index = SpatialIndex::from_geometries(&right_geoms);
        let rows = self.executor.map(left.len(), |i| {
            let candidate = &left_geoms[i];
            let matches: Vec<usize> = match predicate.search_margin() {
                Some(margin) => index
                    .candidates(candidate, margin)
                    .into_iter()
                    .filter(|&j| predicate.evaluate(&self.engine, candidate, &right_geoms[j]))
                    .collect(),
                None => (0..right_geoms.len())
                    .filter(|&j| predicate.evaluate(&self.engine, candidate, &right_geoms[j]))
                    .collect(),
            };

            let feature = &left.features()[i];
            if matches.is_empty() {
                return match mode {
                    JoinMode::Left => vec![joined_row(feature, None, &columns)],
                    JoinMode::Inner => Vec::new(),
                };
            }

            matches
                .into_iter()
                .map(|j| joined_row(feature, Some(&right.features()[j]), &columns))
                .collect()
        })?;

        let features: Vec<Feature> = rows.into_iter().flatten().collect();

        tracing::debug!(
            %predicate,
            %mode,
            left = left.len(),
            right = right.len(),
            rows = features.len(),
            "Join complete"
        );

        FeatureCollection::new(left.crs().cloned(), features)
    }
}

/// Assign each right attribute a column name not used by the left side or by
/// an earlier right column.
///
/// A right name that collides with a left name gets `suffix`; when the
/// suffixed name is taken too, a counter is appended (`name_right_2`, ...).
fn right_columns(left: &FeatureCollection, right: &FeatureCollection, suffix: &str) -> Vec<RightColumn> {
    let left_names: HashSet<String> = left.field_names().into_iter().collect();
    let right_names = right.field_names();

    // Right names kept as-is are reserved first so a suffixed name cannot take them
    let mut taken: HashSet<String> = left_names.clone();
    taken.extend(right_names.iter().filter(|n| !left_names.contains(*n)).cloned());

    right_names
        .into_iter()
        .map(|name| {
            let output = if left_names.contains(&name) {
                let base = format!("{}{}", name, suffix);
                let mut output = base.clone();
                let mut counter = 2;
                while taken.contains(&output) {
                    output = format!("{}_{}", base, counter);
                    counter += 1;
                }
                taken.insert(output.clone());
                output
            } else {
                name.clone()
            };
            RightColumn { source: name, output }
        })
        .collect()
}

fn joined_row(left: &Feature, right: Option<&Feature>, columns: &[RightColumn]) -> Feature {
    let mut attributes = left.attributes.clone();
    for column in columns {
        let value = right
            .and_then(|r| r.attribute(&column.source))
            .cloned()
            .unwrap_or(AttributeValue::Null);
        attributes.insert(column.output.clone(), value);
    }
    Feature::new(left.geometry.clone(), attributes)
}
