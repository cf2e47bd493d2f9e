pub mod attribute;
pub mod feature;
pub mod geometry;

pub use attribute::{AttributeKey, AttributeValue, Attributes};
pub use feature::{Feature, FeatureCollection};
pub use geometry::{Crs, Geometry, GeometryFamily, ValidityMode};
