use geo::algorithm::bounding_rect::BoundingRect;
use geo::Geometry as GeoGeometry;
use rstar::{RTree, RTreeObject, AABB};

/// Envelope of one indexed feature
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEnvelope {
    /// Position of the feature in its collection
    pub id: usize,

    envelope: AABB<[f64; 2]>,
}

impl IndexedEnvelope {
    /// Envelope of a geometry, `None` for geometries without a bounding box
    pub fn new(id: usize, geometry: &GeoGeometry) -> Option<Self> {
        bounding_envelope(geometry, 0.0).map(|envelope| Self { id, envelope })
    }
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn bounding_envelope(geometry: &GeoGeometry, margin: f64) -> Option<AABB<[f64; 2]>> {
    let rect = geometry.bounding_rect()?;
    let min = rect.min();
    let max = rect.max();
    Some(AABB::from_corners([min.x - margin, min.y - margin], [max.x + margin, max.y + margin]))
}

/// R-tree over feature envelopes, used to narrow candidate pairs before exact tests
pub struct SpatialIndex {
    tree: RTree<IndexedEnvelope>,
}

impl SpatialIndex {
    /// Create a new empty spatial index
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load an index; ids are the positions in `geometries`
    pub fn from_geometries(geometries: &[GeoGeometry]) -> Self {
        let indexed: Vec<IndexedEnvelope> = geometries
            .iter()
            .enumerate()
            .filter_map(|(id, geom)| IndexedEnvelope::new(id, geom))
            .collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    /// Ids whose envelopes come within `margin` of the geometry's envelope, ascending
    pub fn candidates(&self, geometry: &GeoGeometry, margin: f64) -> Vec<usize> {
        match bounding_envelope(geometry, margin) {
            Some(envelope) => {
                let mut ids: Vec<usize> =
                    self.tree.locate_in_envelope_intersecting(&envelope).map(|g| g.id).collect();
                ids.sort_unstable();
                ids
            }
            None => Vec::new(),
        }
    }

    /// Get the total number of indexed envelopes
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::to_geo_geometry;
    use areal_core::models::Geometry;

    #[test]
    fn test_spatial_index_creation() {
        let index = SpatialIndex::new();
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_spatial_index_bbox_query() {
        let geometries: Vec<GeoGeometry> = [
            Geometry::point(0.0, 0.0),
            Geometry::point(5.0, 5.0),
            Geometry::point(10.0, 10.0),
        ]
        .iter()
        .map(to_geo_geometry)
        .collect();
        let index = SpatialIndex::from_geometries(&geometries);

        assert_eq!(index.len(), 3);
        let window = to_geo_geometry(&Geometry::rectangle(0.0, 0.0, 6.0, 6.0));
        assert_eq!(index.candidates(&window, 0.0), vec![0, 1]);
    }

    #[test]
    fn test_candidates_include_touching_envelopes() {
        let geometries: Vec<GeoGeometry> = [
            Geometry::rectangle(0.0, 0.0, 1.0, 1.0),
            Geometry::rectangle(1.0, 0.0, 2.0, 1.0),
            Geometry::rectangle(5.0, 0.0, 6.0, 1.0),
        ]
        .iter()
        .map(to_geo_geometry)
        .collect();
        let index = SpatialIndex::from_geometries(&geometries);

        assert_eq!(index.candidates(&geometries[0], 0.0), vec![0, 1]);
        assert_eq!(index.candidates(&geometries[0], 4.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_geometry_is_not_indexed() {
        let empty = GeoGeometry::MultiPoint(geo::MultiPoint::new(vec![]));
        let index = SpatialIndex::from_geometries(&[empty.clone()]);
        assert!(index.is_empty());
        assert!(index.candidates(&empty, 1.0).is_empty());
    }
}
