//! GeoJSON format reader and writer

use std::fs;
use std::path::Path;

use crate::error::{ArealError, Result};
use crate::formats::{FormatReader, FormatWriter};
use crate::models::{AttributeValue, Attributes, Crs, Feature, FeatureCollection, Geometry};

/// GeoJSON feature collection format
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonFormat;

impl FormatReader for GeoJsonFormat {
    fn read(&self, path: &Path) -> Result<FeatureCollection> {
        let content = fs::read_to_string(path)?;
        let collection = parse_feature_collection(&content, path)?;

        tracing::debug!(
            path = %path.display(),
            features = collection.len(),
            crs = ?collection.crs().map(|c| c.epsg),
            "Read GeoJSON collection"
        );

        Ok(collection)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

impl FormatWriter for GeoJsonFormat {
    fn write(&self, collection: &FeatureCollection, path: &Path) -> Result<()> {
        let content = to_geojson_string(collection)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Parse GeoJSON text into a feature collection.
///
/// `origin` is only used for error messages. A bare Feature or Geometry is
/// wrapped into a one-element collection.
pub fn parse_feature_collection(content: &str, origin: &Path) -> Result<FeatureCollection> {
    let format_error = |reason: String| ArealError::Format {
        format: "GeoJSON".to_string(),
        path: origin.to_path_buf(),
        reason,
    };

    let geojson: geojson::GeoJson =
        content.parse().map_err(|e| format_error(format!("Failed to parse GeoJSON: {}", e)))?;

    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => {
            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_epsg_from_crs)
                .map(Crs::from_epsg);

            let features = fc
                .features
                .iter()
                .enumerate()
                .map(|(idx, feature)| convert_feature(feature, idx).map_err(&format_error))
                .collect::<Result<Vec<_>>>()?;

            FeatureCollection::new(crs, features)
        }
        geojson::GeoJson::Feature(feature) => {
            let feature = convert_feature(&feature, 0).map_err(&format_error)?;
            FeatureCollection::new(None, vec![feature])
        }
        geojson::GeoJson::Geometry(geometry) => {
            let geometry = convert_geometry(&geometry.value).map_err(&format_error)?;
            FeatureCollection::new(None, vec![Feature::from_geometry(geometry)])
        }
    }
}

/// Serialize a feature collection as pretty-printed GeoJSON
pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String> {
    let features = collection
        .iter()
        .map(|feature| {
            let properties: geojson::JsonObject = feature
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect();

            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(to_geojson_value(&feature.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let foreign_members = collection.crs().map(|crs| {
        let mut members = geojson::JsonObject::new();
        members.insert(
            "crs".to_string(),
            serde_json::json!({
                "type": "name",
                "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", crs.epsg) }
            }),
        );
        members
    });

    let fc = geojson::FeatureCollection { bbox: None, features, foreign_members };

    serde_json::to_string_pretty(&fc)
        .map_err(|e| ArealError::Serialization(format!("Failed to serialize GeoJSON: {}", e)))
}

/// Convert a GeoJSON feature to a Feature
fn convert_feature(feature: &geojson::Feature, idx: usize) -> std::result::Result<Feature, String> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| format!("Feature {} has no geometry", idx))?;

    let geometry =
        convert_geometry(&geometry.value).map_err(|reason| format!("Feature {}: {}", idx, reason))?;

    let attributes: Attributes = feature
        .properties
        .as_ref()
        .map(|props| {
            props.iter().map(|(k, v)| (k.clone(), AttributeValue::from_json(v))).collect()
        })
        .unwrap_or_default();

    Ok(Feature::new(geometry, attributes))
}

fn position(p: &[f64]) -> std::result::Result<[f64; 2], String> {
    match p {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(format!("Position needs at least 2 coordinates, found {}", p.len())),
    }
}

fn positions(ps: &[Vec<f64>]) -> std::result::Result<Vec<[f64; 2]>, String> {
    ps.iter().map(|p| position(p)).collect()
}

fn rings(rs: &[Vec<Vec<f64>>]) -> std::result::Result<Vec<Vec<[f64; 2]>>, String> {
    rs.iter().map(|r| positions(r)).collect()
}

/// Convert a GeoJSON geometry value; extra ordinates (z, m) are dropped
fn convert_geometry(value: &geojson::Value) -> std::result::Result<Geometry, String> {
    match value {
        geojson::Value::Point(p) => Ok(Geometry::Point { coordinates: position(p)? }),
        geojson::Value::MultiPoint(ps) => Ok(Geometry::MultiPoint { coordinates: positions(ps)? }),
        geojson::Value::LineString(ps) => Ok(Geometry::LineString { coordinates: positions(ps)? }),
        geojson::Value::MultiLineString(ls) => {
            Ok(Geometry::MultiLineString { coordinates: rings(ls)? })
        }
        geojson::Value::Polygon(rs) => Ok(Geometry::Polygon { coordinates: rings(rs)? }),
        geojson::Value::MultiPolygon(polys) => Ok(Geometry::MultiPolygon {
            coordinates: polys.iter().map(|p| rings(p)).collect::<std::result::Result<_, _>>()?,
        }),
        geojson::Value::GeometryCollection(_) => {
            Err("GeometryCollection is not supported as a feature geometry".to_string())
        }
    }
}

fn to_geojson_value(geometry: &Geometry) -> geojson::Value {
    fn pos(c: &[f64; 2]) -> Vec<f64> {
        vec![c[0], c[1]]
    }
    fn line(cs: &[[f64; 2]]) -> Vec<Vec<f64>> {
        cs.iter().map(pos).collect()
    }

    match geometry {
        Geometry::Point { coordinates } => geojson::Value::Point(pos(coordinates)),
        Geometry::MultiPoint { coordinates } => geojson::Value::MultiPoint(line(coordinates)),
        Geometry::LineString { coordinates } => geojson::Value::LineString(line(coordinates)),
        Geometry::MultiLineString { coordinates } => {
            geojson::Value::MultiLineString(coordinates.iter().map(|l| line(l)).collect())
        }
        Geometry::Polygon { coordinates } => {
            geojson::Value::Polygon(coordinates.iter().map(|r| line(r)).collect())
        }
        Geometry::MultiPolygon { coordinates } => geojson::Value::MultiPolygon(
            coordinates.iter().map(|p| p.iter().map(|r| line(r)).collect()).collect(),
        ),
    }
}

/// Extract EPSG code from a legacy GeoJSON CRS object
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    // Parse "EPSG:4326" or "urn:ogc:def:crs:EPSG::4326"
    let name = crs.get("properties")?.get("name")?.as_str()?;
    if name.ends_with("CRS84") {
        return Some(4326);
    }
    name.rsplit(':').next()?.parse().ok()
}
