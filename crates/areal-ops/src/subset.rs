use areal_core::error::{ArealError, Result};
use areal_core::models::FeatureCollection;
use areal_geo::crs::check_crs_mismatch;
use areal_geo::engine::GeometryEngine;
use areal_geo::index::SpatialIndex;
use areal_geo::predicate::Predicate;

use crate::execution::ParallelStrategy;
use crate::fields::prepare;
use crate::ops::SpatialOps;

impl<E> SpatialOps<E>
where
    E: GeometryEngine,
{
    /// Keep the source features for which `predicate(feature, r)` holds for
    /// at least one reference feature `r`.
    ///
    /// `Disjoint` keeps the features that intersect no reference feature, so
    /// `Intersects` and `Disjoint` partition the source. Against an empty
    /// reference, `Disjoint` keeps everything and every other predicate
    /// keeps nothing. Order and attributes are preserved.
    pub fn subset(
        &self,
        source: &FeatureCollection,
        reference: &FeatureCollection,
        predicate: Predicate,
    ) -> Result<FeatureCollection> {
        predicate.validate()?;
        check_crs_mismatch(source.crs(), reference.crs())?;

        let reference_geoms = prepare(reference, self.options.validity).map_err(|e| match e {
            ArealError::InvalidGeometry { index, reason } => ArealError::InvalidReference {
                reason: format!("feature {}: {}", index, reason),
            },
            other => other,
        })?;
        let source_geoms = prepare(source, self.options.validity)?;

        if reference.is_empty() {
            tracing::debug!(%predicate, "Subset against an empty reference");
            return if predicate.is_complement() {
                Ok(source.clone())
            } else {
                Ok(FeatureCollection::empty(source.crs().cloned()))
            };
        }

        let index = SpatialIndex::from_geometries(&reference_geoms);
        let keep = self.executor.map(source_geoms.len(), |i| {
            let candidate = &source_geoms[i];
            match predicate.search_margin() {
                Some(margin) => index
                    .candidates(candidate, margin)
                    .into_iter()
                    .any(|j| predicate.evaluate(&self.engine, candidate, &reference_geoms[j])),
                // Complement: no reference feature intersects the candidate
                None => !index
                    .candidates(candidate, 0.0)
                    .into_iter()
                    .any(|j| self.engine.intersects(candidate, &reference_geoms[j])),
            }
        })?;

        let features: Vec<_> = source
            .iter()
            .zip(keep)
            .filter_map(|(feature, keep)| keep.then(|| feature.clone()))
            .collect();

        tracing::debug!(
            %predicate,
            source = source.len(),
            reference = reference.len(),
            kept = features.len(),
            "Subset complete"
        );

        FeatureCollection::new(source.crs().cloned(), features)
    }
}

#[cfg(test)]
mod tests {
    use crate::{OpsOptions, SpatialOps};
    use areal_core::error::ArealError;
    use areal_core::models::{Crs, Feature, FeatureCollection, Geometry, ValidityMode};
    use areal_geo::predicate::Predicate;

    fn squares(origins: &[(f64, f64)]) -> FeatureCollection {
        let features = origins
            .iter()
            .enumerate()
            .map(|(i, (x, y))| {
                Feature::from_geometry(Geometry::rectangle(*x, *y, x + 1.0, y + 1.0))
                    .with_attribute("id", i)
            })
            .collect();
        FeatureCollection::new(None, features).unwrap()
    }

    fn ids(collection: &FeatureCollection) -> Vec<i64> {
        collection
            .iter()
            .map(|f| match f.attribute("id") {
                Some(areal_core::AttributeValue::Integer(i)) => *i,
                other => panic!("unexpected id {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_intersects_and_disjoint_partition() {
        let ops = SpatialOps::default();
        let source = squares(&[(0.0, 0.0), (5.0, 5.0), (1.0, 0.0), (10.0, 0.0)]);
        let reference = squares(&[(0.5, 0.5)]);

        let hit = ops.subset(&source, &reference, Predicate::Intersects).unwrap();
        let miss = ops.subset(&source, &reference, Predicate::Disjoint).unwrap();

        assert_eq!(ids(&hit), vec![0, 2]);
        assert_eq!(ids(&miss), vec![1, 3]);
    }

    #[test]
    fn test_touches_excludes_overlap() {
        let ops = SpatialOps::default();
        let source = squares(&[(1.0, 0.0), (0.5, 0.0), (3.0, 0.0)]);
        let reference = squares(&[(0.0, 0.0)]);

        let touching = ops.subset(&source, &reference, Predicate::Touches).unwrap();
        assert_eq!(ids(&touching), vec![0]);
    }

    #[test]
    fn test_within_distance() {
        let ops = SpatialOps::default();
        let source = squares(&[(3.0, 0.0), (6.0, 0.0)]);
        let reference = squares(&[(0.0, 0.0)]);

        let near = ops.subset(&source, &reference, Predicate::WithinDistance(2.0)).unwrap();
        assert_eq!(ids(&near), vec![0]);

        let err = ops
            .subset(&source, &reference, Predicate::WithinDistance(-1.0))
            .unwrap_err();
        assert!(matches!(err, ArealError::InvalidPredicate { .. }));
    }

    #[test]
    fn test_empty_reference() {
        let ops = SpatialOps::default();
        let source = squares(&[(0.0, 0.0), (2.0, 2.0)]);
        let reference = FeatureCollection::empty(None);

        assert!(ops.subset(&source, &reference, Predicate::Intersects).unwrap().is_empty());
        assert_eq!(ops.subset(&source, &reference, Predicate::Disjoint).unwrap(), source);
    }

    #[test]
    fn test_malformed_reference() {
        let source = squares(&[(0.0, 0.0)]);
        let reference = FeatureCollection::new(
            None,
            vec![Feature::from_geometry(Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 1.0]]]))],
        )
        .unwrap();

        let strict = SpatialOps::default();
        let err = strict.subset(&source, &reference, Predicate::Intersects).unwrap_err();
        assert!(matches!(err, ArealError::InvalidReference { .. }));

        let lenient = SpatialOps::new(OpsOptions::new().with_validity(ValidityMode::Lenient));
        assert!(lenient.subset(&source, &reference, Predicate::Intersects).is_ok());
    }

    #[test]
    fn test_self_intersecting_reference() {
        let source = squares(&[(0.0, 0.0)]);
        let bowtie = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [2.0, 2.0],
            [2.0, 0.0],
            [0.0, 2.0],
            [0.0, 0.0],
        ]]);
        let reference = FeatureCollection::new(None, vec![Feature::from_geometry(bowtie)]).unwrap();

        let err = SpatialOps::default()
            .subset(&source, &reference, Predicate::Intersects)
            .unwrap_err();
        match err {
            ArealError::InvalidReference { reason } => assert!(reason.contains("self-intersection")),
            other => panic!("expected InvalidReference, got {:?}", other),
        }
    }

    #[test]
    fn test_crs_mismatch() {
        let ops = SpatialOps::default();
        let source = squares(&[(0.0, 0.0)]).or_crs(Some(Crs::from_epsg(32748)));
        let reference = squares(&[(0.0, 0.0)]).or_crs(Some(Crs::web_mercator()));

        let err = ops.subset(&source, &reference, Predicate::Intersects).unwrap_err();
        assert!(matches!(err, ArealError::CrsMismatch { .. }));
    }
}
