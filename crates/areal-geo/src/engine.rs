//! Geometry engine seam.
//!
//! Every geometric computation the overlay operations need goes through
//! [`GeometryEngine`]. [`PlanarEngine`] implements it with the `geo` crate over
//! planar (pre-projected) coordinates.

use areal_core::error::{ArealError, Result};
use geo::algorithm::area::Area;
use geo::algorithm::bool_ops::BooleanOps;
use geo::algorithm::centroid::Centroid;
use geo::algorithm::intersects::Intersects;
use geo::algorithm::relate::Relate;
use geo::{Distance, Euclidean, Geometry as GeoGeometry, MultiPolygon, Point, Polygon};

/// Geometry operations consumed by the overlay operations
pub trait GeometryEngine: Send + Sync {
    /// Unsigned area; zero for points and lines
    fn area(&self, geometry: &GeoGeometry) -> f64;

    /// Areal intersection of two polygonal geometries.
    ///
    /// Disjoint inputs yield an empty `MultiPolygon`, never an error.
    /// Non-polygonal inputs fail with `GeometryFamilyMismatch`.
    fn intersection(&self, a: &GeoGeometry, b: &GeoGeometry) -> Result<MultiPolygon<f64>>;

    fn intersects(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool;

    fn disjoint(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool {
        !self.intersects(a, b)
    }

    /// Boundaries meet but interiors do not
    fn touches(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool;

    /// `a` lies inside `b` and does not sit only on its boundary
    fn within(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool;

    fn contains(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool {
        self.within(b, a)
    }

    /// Minimum planar distance, zero for intersecting geometries
    fn distance(&self, a: &GeoGeometry, b: &GeoGeometry) -> f64;

    fn within_distance(&self, a: &GeoGeometry, b: &GeoGeometry, distance: f64) -> bool {
        self.intersects(a, b) || self.distance(a, b) <= distance
    }

    fn centroid(&self, geometry: &GeoGeometry) -> Option<Point<f64>>;

    /// Union of same-family geometries; polygons are dissolved along shared boundaries
    fn union(&self, geometries: &[GeoGeometry]) -> Result<GeoGeometry>;
}

/// Planar geometry engine backed by the `geo` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarEngine;

impl PlanarEngine {
    pub fn new() -> Self {
        Self
    }
}

fn family_name(geometry: &GeoGeometry) -> &'static str {
    match geometry {
        GeoGeometry::Point(_) | GeoGeometry::MultiPoint(_) => "point",
        GeoGeometry::Line(_) | GeoGeometry::LineString(_) | GeoGeometry::MultiLineString(_) => {
            "line"
        }
        GeoGeometry::Polygon(_)
        | GeoGeometry::MultiPolygon(_)
        | GeoGeometry::Rect(_)
        | GeoGeometry::Triangle(_) => "polygon",
        GeoGeometry::GeometryCollection(_) => "collection",
    }
}

/// Polygons making up an areal geometry, `None` for points and lines
fn polygons_of(geometry: &GeoGeometry) -> Option<Vec<Polygon<f64>>> {
    match geometry {
        GeoGeometry::Polygon(p) => Some(vec![p.clone()]),
        GeoGeometry::MultiPolygon(mp) => Some(mp.0.clone()),
        GeoGeometry::Rect(r) => Some(vec![r.to_polygon()]),
        GeoGeometry::Triangle(t) => Some(vec![t.to_polygon()]),
        _ => None,
    }
}

fn not_areal(operation: &str, geometry: &GeoGeometry) -> ArealError {
    ArealError::GeometryFamilyMismatch {
        operation: operation.to_string(),
        expected: "polygon".to_string(),
        found: family_name(geometry).to_string(),
    }
}

impl GeometryEngine for PlanarEngine {
    fn area(&self, geometry: &GeoGeometry) -> f64 {
        geometry.unsigned_area()
    }

    fn intersection(&self, a: &GeoGeometry, b: &GeoGeometry) -> Result<MultiPolygon<f64>> {
        let overlap = match (a, b) {
            (GeoGeometry::Polygon(p), GeoGeometry::Polygon(q)) => p.intersection(q),
            (GeoGeometry::Polygon(p), GeoGeometry::MultiPolygon(q)) => p.intersection(q),
            (GeoGeometry::MultiPolygon(p), GeoGeometry::Polygon(q)) => p.intersection(q),
            (GeoGeometry::MultiPolygon(p), GeoGeometry::MultiPolygon(q)) => p.intersection(q),
            _ => {
                let p = MultiPolygon::new(polygons_of(a).ok_or_else(|| not_areal("intersection", a))?);
                let q = MultiPolygon::new(polygons_of(b).ok_or_else(|| not_areal("intersection", b))?);
                p.intersection(&q)
            }
        };
        Ok(overlap)
    }

    fn intersects(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool {
        a.intersects(b)
    }

    fn touches(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool {
        a.relate(b).is_touches()
    }

    fn within(&self, a: &GeoGeometry, b: &GeoGeometry) -> bool {
        a.relate(b).is_within()
    }

    fn distance(&self, a: &GeoGeometry, b: &GeoGeometry) -> f64 {
        if a.intersects(b) {
            return 0.0;
        }
        Euclidean.distance(a, b)
    }

    fn centroid(&self, geometry: &GeoGeometry) -> Option<Point<f64>> {
        geometry.centroid()
    }

    fn union(&self, geometries: &[GeoGeometry]) -> Result<GeoGeometry> {
        let first = geometries.first().ok_or_else(|| ArealError::InvalidGeometry {
            index: 0,
            reason: "Union of an empty geometry set".to_string(),
        })?;
        let family = family_name(first);

        if let Some(mismatch) = geometries.iter().find(|g| family_name(g) != family) {
            return Err(ArealError::GeometryFamilyMismatch {
                operation: "union".to_string(),
                expected: family.to_string(),
                found: family_name(mismatch).to_string(),
            });
        }

        let merged = match family {
            "polygon" => {
                let polygons: Vec<Polygon<f64>> =
                    geometries.iter().filter_map(polygons_of).flatten().collect();
                let mut dissolved = geo::unary_union(&polygons);
                if dissolved.0.len() == 1 {
                    GeoGeometry::Polygon(dissolved.0.remove(0))
                } else {
                    GeoGeometry::MultiPolygon(dissolved)
                }
            }
            "point" => {
                let points = geometries
                    .iter()
                    .flat_map(|g| match g {
                        GeoGeometry::Point(p) => vec![*p],
                        GeoGeometry::MultiPoint(mp) => mp.0.clone(),
                        _ => vec![],
                    })
                    .collect::<Vec<_>>();
                GeoGeometry::MultiPoint(geo::MultiPoint::new(points))
            }
            "line" => {
                let lines = geometries
                    .iter()
                    .flat_map(|g| match g {
                        GeoGeometry::Line(l) => vec![geo::LineString::from(*l)],
                        GeoGeometry::LineString(ls) => vec![ls.clone()],
                        GeoGeometry::MultiLineString(mls) => mls.0.clone(),
                        _ => vec![],
                    })
                    .collect::<Vec<_>>();
                GeoGeometry::MultiLineString(geo::MultiLineString::new(lines))
            }
            other => {
                return Err(ArealError::GeometryFamilyMismatch {
                    operation: "union".to_string(),
                    expected: "point, line, or polygon".to_string(),
                    found: other.to_string(),
                })
            }
        };

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::to_geo_geometry;
    use areal_core::models::Geometry;

    fn square(min_x: f64, min_y: f64, size: f64) -> GeoGeometry {
        to_geo_geometry(&Geometry::rectangle(min_x, min_y, min_x + size, min_y + size))
    }

    #[test]
    fn test_area() {
        let engine = PlanarEngine;
        assert!((engine.area(&square(0.0, 0.0, 2.0)) - 4.0).abs() < 1e-12);
        assert_eq!(engine.area(&GeoGeometry::Point(Point::new(1.0, 1.0))), 0.0);
    }

    #[test]
    fn test_intersection_overlap() {
        let engine = PlanarEngine;
        let overlap = engine.intersection(&square(0.0, 0.0, 2.0), &square(1.0, 1.0, 2.0)).unwrap();
        assert!((overlap.unsigned_area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersection_of_disjoint_is_explicitly_empty() {
        let engine = PlanarEngine;
        let overlap = engine.intersection(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0)).unwrap();
        assert!(overlap.0.is_empty());
        assert_eq!(overlap.unsigned_area(), 0.0);
    }

    #[test]
    fn test_intersection_rejects_points() {
        let engine = PlanarEngine;
        let point = GeoGeometry::Point(Point::new(0.5, 0.5));
        let err = engine.intersection(&point, &square(0.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, ArealError::GeometryFamilyMismatch { .. }));
    }

    #[test]
    fn test_touches_and_intersects() {
        let engine = PlanarEngine;
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        let c = square(0.5, 0.0, 1.0);

        assert!(engine.touches(&a, &b));
        assert!(engine.intersects(&a, &b));
        assert!(!engine.touches(&a, &c));
        assert!(engine.disjoint(&a, &square(3.0, 3.0, 1.0)));
    }

    #[test]
    fn test_within_and_contains() {
        let engine = PlanarEngine;
        let outer = square(0.0, 0.0, 10.0);
        let inner = GeoGeometry::Point(Point::new(5.0, 5.0));

        assert!(engine.within(&inner, &outer));
        assert!(engine.contains(&outer, &inner));
        assert!(!engine.within(&outer, &inner));
    }

    #[test]
    fn test_distance() {
        let engine = PlanarEngine;
        let a = square(0.0, 0.0, 1.0);
        let b = square(4.0, 0.0, 1.0);

        assert!((engine.distance(&a, &b) - 3.0).abs() < 1e-9);
        assert!(engine.within_distance(&a, &b, 3.0));
        assert!(!engine.within_distance(&a, &b, 2.5));
        assert_eq!(engine.distance(&a, &square(0.5, 0.5, 1.0)), 0.0);
    }

    #[test]
    fn test_union_dissolves_adjacent_squares() {
        let engine = PlanarEngine;
        let merged = engine.union(&[square(0.0, 0.0, 1.0), square(1.0, 0.0, 1.0)]).unwrap();

        assert!(matches!(merged, GeoGeometry::Polygon(_)));
        assert!((engine.area(&merged) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_of_points() {
        let engine = PlanarEngine;
        let merged = engine
            .union(&[
                GeoGeometry::Point(Point::new(0.0, 0.0)),
                GeoGeometry::Point(Point::new(1.0, 1.0)),
            ])
            .unwrap();

        match merged {
            GeoGeometry::MultiPoint(mp) => assert_eq!(mp.0.len(), 2),
            other => panic!("Expected MultiPoint, got {:?}", other),
        }
    }

    #[test]
    fn test_union_rejects_mixed_and_empty() {
        let engine = PlanarEngine;
        assert!(engine.union(&[]).is_err());
        assert!(engine
            .union(&[square(0.0, 0.0, 1.0), GeoGeometry::Point(Point::new(0.0, 0.0))])
            .is_err());
    }
}
