//! Property-based tests for predicates and index pruning

use areal_core::Geometry;
use areal_geo::{to_geo_geometry, GeometryEngine, PlanarEngine, Predicate, SpatialIndex};
use geo::Geometry as GeoGeometry;
use proptest::prelude::*;

fn square() -> impl Strategy<Value = GeoGeometry> {
    (0i32..15, 0i32..15, 1i32..5).prop_map(|(x, y, size)| {
        let (x, y, size) = (x as f64, y as f64, size as f64);
        to_geo_geometry(&Geometry::rectangle(x, y, x + size, y + size))
    })
}

fn predicate() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        Just(Predicate::Intersects),
        Just(Predicate::Touches),
        Just(Predicate::Within),
        Just(Predicate::Contains),
        (0u8..6).prop_map(|d| Predicate::WithinDistance(d as f64 * 0.5)),
    ]
}

proptest! {
    /// Property: every feature satisfying a predicate is among the index candidates.
    #[test]
    fn prop_index_never_prunes_a_match(
        geoms in prop::collection::vec(square(), 0..15),
        reference in square(),
        predicate in predicate(),
    ) {
        let engine = PlanarEngine;
        let index = SpatialIndex::from_geometries(&geoms);
        let margin = predicate.search_margin().unwrap();
        let candidates = index.candidates(&reference, margin);

        for (i, geom) in geoms.iter().enumerate() {
            if predicate.evaluate(&engine, geom, &reference) {
                prop_assert!(candidates.contains(&i), "{} matched {:?} but was pruned", predicate, i);
            }
        }
    }

    /// Property: intersects and disjoint are complements.
    #[test]
    fn prop_disjoint_complements_intersects(a in square(), b in square()) {
        let engine = PlanarEngine;
        prop_assert_ne!(
            Predicate::Intersects.evaluate(&engine, &a, &b),
            Predicate::Disjoint.evaluate(&engine, &a, &b)
        );
    }

    /// Property: within and contains are converses.
    #[test]
    fn prop_within_is_converse_of_contains(a in square(), b in square()) {
        let engine = PlanarEngine;
        prop_assert_eq!(
            Predicate::Within.evaluate(&engine, &a, &b),
            Predicate::Contains.evaluate(&engine, &b, &a)
        );
        prop_assert_eq!(engine.within(&a, &b), engine.contains(&b, &a));
    }
}
