//! End-to-end scenarios for the overlay operations
//!
//! Each test builds small planar collections by hand and checks the exact
//! output of one operation.

use areal_core::config::ExecutionMode;
use areal_core::error::ArealError;
use areal_core::models::{AttributeValue, Crs, Feature, FeatureCollection, Geometry};
use areal_ops::{FieldReducer, JoinMode, OpsOptions, Predicate, Reducer, SpatialOps};

fn square(min_x: f64, min_y: f64, size: f64) -> Geometry {
    Geometry::rectangle(min_x, min_y, min_x + size, min_y + size)
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection::new(Some(Crs::from_epsg(32748)), features).unwrap()
}

#[test]
fn test_extensive_interpolation_over_half_squares() {
    let ops = SpatialOps::default();
    let source = collection(vec![
        Feature::from_geometry(square(0.0, 0.0, 1.0)).with_attribute("value", 10),
        Feature::from_geometry(square(1.0, 0.0, 1.0)).with_attribute("value", 20),
    ]);
    let target = collection(vec![Feature::from_geometry(square(0.5, 0.0, 1.0))]);

    let out = ops.interpolate_area_weighted(&source, &target, &["value"], true).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out.features()[0].geometry, target.features()[0].geometry);
    let value = out.features()[0].attribute("value").and_then(AttributeValue::as_f64).unwrap();
    assert!((value - 15.0).abs() < 1e-9, "expected 15, got {}", value);
}

#[test]
fn test_subset_against_empty_reference() {
    let ops = SpatialOps::default();
    let source = collection(vec![
        Feature::from_geometry(square(0.0, 0.0, 1.0)).with_attribute("id", 1),
        Feature::from_geometry(square(3.0, 3.0, 1.0)).with_attribute("id", 2),
    ]);
    let reference = FeatureCollection::empty(Some(Crs::from_epsg(32748)));

    let intersecting = ops.subset(&source, &reference, Predicate::Intersects).unwrap();
    assert!(intersecting.is_empty());

    let disjoint = ops.subset(&source, &reference, Predicate::Disjoint).unwrap();
    assert_eq!(disjoint, source);
}

#[test]
fn test_left_join_with_one_unmatched_feature() {
    let ops = SpatialOps::default();
    let left = collection(vec![
        Feature::from_geometry(square(0.0, 0.0, 2.0)).with_attribute("parcel", "p1"),
        Feature::from_geometry(square(10.0, 0.0, 2.0)).with_attribute("parcel", "p2"),
        Feature::from_geometry(square(50.0, 50.0, 2.0)).with_attribute("parcel", "p3"),
    ]);
    let right = collection(vec![
        Feature::from_geometry(square(1.0, 1.0, 2.0)).with_attribute("zone", "z1"),
        Feature::from_geometry(square(-1.0, -1.0, 1.5)).with_attribute("zone", "z2"),
        Feature::from_geometry(square(11.0, 1.0, 0.5)).with_attribute("zone", "z3"),
    ]);

    let left_join = ops.join(&left, &right, Predicate::Intersects, JoinMode::Left).unwrap();
    let inner_join = ops.join(&left, &right, Predicate::Intersects, JoinMode::Inner).unwrap();

    // p1 matches z1 and z2, p2 matches z3, p3 matches nothing
    assert_eq!(left_join.len(), 2 + 1 + 1);
    assert_eq!(inner_join.len(), 3);

    let zones: Vec<AttributeValue> = left_join
        .iter()
        .map(|f| f.attribute("zone").cloned().unwrap_or_default())
        .collect();
    assert_eq!(
        zones,
        vec![
            AttributeValue::from("z1"),
            AttributeValue::from("z2"),
            AttributeValue::from("z3"),
            AttributeValue::Null,
        ]
    );
    assert_eq!(left_join.features()[3].attribute("parcel"), Some(&AttributeValue::from("p3")));
}

#[test]
fn test_containment_mean_per_zone() {
    let ops = SpatialOps::default();
    let zones = collection(vec![
        Feature::from_geometry(square(0.0, 0.0, 10.0)).with_attribute("zone", "A"),
        Feature::from_geometry(square(20.0, 0.0, 10.0)).with_attribute("zone", "B"),
    ]);
    let points = collection(vec![
        Feature::from_geometry(Geometry::point(1.0, 1.0)).with_attribute("value", 3.0),
        Feature::from_geometry(Geometry::point(25.0, 5.0)).with_attribute("value", 10.0),
        Feature::from_geometry(Geometry::point(5.0, 5.0)).with_attribute("value", 6.0),
        Feature::from_geometry(Geometry::point(28.0, 2.0)).with_attribute("value", 20.0),
        Feature::from_geometry(Geometry::point(9.0, 9.0)).with_attribute("value", 9.0),
    ]);

    let out = ops
        .aggregate_by_containment(&points, &zones, &[FieldReducer::new("value", Reducer::Mean)])
        .unwrap();

    assert_eq!(out.len(), 2);

    let a = &out.features()[0];
    assert_eq!(a.geometry, zones.features()[0].geometry);
    assert_eq!(a.attribute("zone"), Some(&AttributeValue::from("A")));
    assert_eq!(a.attribute("value"), Some(&AttributeValue::Float(6.0)));

    let b = &out.features()[1];
    assert_eq!(b.geometry, zones.features()[1].geometry);
    assert_eq!(b.attribute("value"), Some(&AttributeValue::Float(15.0)));
}

#[test]
fn test_crs_mismatch_is_rejected_everywhere() {
    let ops = SpatialOps::default();
    let utm = collection(vec![Feature::from_geometry(square(0.0, 0.0, 1.0)).with_attribute("v", 1)]);
    let mercator = FeatureCollection::new(
        Some(Crs::web_mercator()),
        vec![Feature::from_geometry(square(0.0, 0.0, 1.0)).with_attribute("v", 1)],
    )
    .unwrap();

    let is_mismatch = |err: ArealError| matches!(err, ArealError::CrsMismatch { .. });

    assert!(is_mismatch(ops.subset(&utm, &mercator, Predicate::Intersects).unwrap_err()));
    assert!(is_mismatch(ops.join(&utm, &mercator, Predicate::Intersects, JoinMode::Left).unwrap_err()));
    assert!(is_mismatch(
        ops.interpolate_area_weighted(&utm, &mercator, &["v"], true).unwrap_err()
    ));
}

#[test]
fn test_parallel_execution_matches_sequential() {
    let left = collection(
        (0..40)
            .map(|i| {
                let x = (i % 8) as f64 * 1.5;
                let y = (i / 8) as f64 * 1.5;
                Feature::from_geometry(square(x, y, 2.0)).with_attribute("id", i)
            })
            .collect(),
    );
    let right = collection(
        (0..10)
            .map(|i| Feature::from_geometry(square(i as f64 * 1.2, 1.0, 1.0)).with_attribute("rid", i))
            .collect(),
    );

    let sequential = SpatialOps::default();
    let parallel = SpatialOps::new(OpsOptions::new().with_execution(ExecutionMode::ParallelWith(4)));

    assert_eq!(
        sequential.join(&left, &right, Predicate::Intersects, JoinMode::Left).unwrap(),
        parallel.join(&left, &right, Predicate::Intersects, JoinMode::Left).unwrap()
    );
    assert_eq!(
        sequential.subset(&left, &right, Predicate::Disjoint).unwrap(),
        parallel.subset(&left, &right, Predicate::Disjoint).unwrap()
    );
    assert_eq!(
        sequential.interpolate_area_weighted(&left, &right, &["id"], true).unwrap(),
        parallel.interpolate_area_weighted(&left, &right, &["id"], true).unwrap()
    );
}
