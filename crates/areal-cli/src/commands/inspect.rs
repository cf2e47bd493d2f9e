//! Inspect command implementation

use super::CommandContext;
use crate::cli::InspectArgs;
use crate::output_types::{FieldInfo, InspectOutput};
use anyhow::Result;
use areal_core::{AttributeValue, FeatureCollection, Geometry};
use areal_geo::{count_invalid_geometries, GeometryExt};
use tabled::Tabled;

pub fn execute(args: InspectArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let collection = ctx.read_input(&args.path)?;
    let summary = summarize(&collection, args.path.display().to_string());
    let output = ctx.output;

    if output.is_json() {
        return output.result(summary);
    }

    output.section("Collection");
    output.kv("Path", &summary.path);
    output.kv("Features", summary.feature_count);
    output.kv(
        "Geometry",
        summary.geometry_family.as_deref().unwrap_or("(empty)"),
    );
    output.kv(
        "CRS",
        collection.crs().map(|c| c.to_string()).unwrap_or_else(|| "unset".to_string()),
    );
    if let Some([min_x, min_y, max_x, max_y]) = summary.bbox {
        output.kv("Extent", format!("[{}, {}] - [{}, {}]", min_x, min_y, max_x, max_y));
    }
    if summary.invalid_geometries > 0 {
        output.warning(format!("{} invalid geometries", summary.invalid_geometries));
    }

    output.section("Fields");

    #[derive(Tabled)]
    struct FieldRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Types")]
        types: String,
        #[tabled(rename = "Non-null")]
        non_null: usize,
    }

    let rows: Vec<FieldRow> = summary
        .fields
        .into_iter()
        .map(|f| FieldRow {
            name: f.name,
            types: f.types.join(", "),
            non_null: f.non_null,
        })
        .collect();
    output.table(rows);

    Ok(())
}

fn summarize(collection: &FeatureCollection, path: String) -> InspectOutput {
    let geometries: Vec<Geometry> = collection.iter().map(|f| f.geometry.clone()).collect();

    let fields = collection
        .field_names()
        .into_iter()
        .map(|name| {
            let mut types: Vec<String> = Vec::new();
            let mut non_null = 0;
            for value in collection.iter().filter_map(|f| f.attribute(&name)) {
                if value.is_null() {
                    continue;
                }
                non_null += 1;
                let kind = value_type(value).to_string();
                if !types.contains(&kind) {
                    types.push(kind);
                }
            }
            FieldInfo { name, types, non_null }
        })
        .collect();

    InspectOutput {
        path,
        feature_count: collection.len(),
        geometry_family: collection.family().map(|f| f.to_string()),
        crs: collection.crs().map(|c| c.epsg),
        bbox: extent(&geometries),
        invalid_geometries: count_invalid_geometries(&geometries),
        fields,
    }
}

fn extent(geometries: &[Geometry]) -> Option<[f64; 4]> {
    geometries
        .iter()
        .filter_map(|g| g.bbox())
        .reduce(|a, b| [a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])])
}

fn value_type(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::Null => "null",
        AttributeValue::Bool(_) => "bool",
        AttributeValue::Integer(_) => "integer",
        AttributeValue::Float(_) => "float",
        AttributeValue::Text(_) => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use areal_core::{Crs, Feature};

    #[test]
    fn test_summarize_reports_fields_and_extent() {
        let collection = FeatureCollection::new(
            Some(Crs::web_mercator()),
            vec![
                Feature::from_geometry(Geometry::rectangle(0.0, 0.0, 1.0, 1.0))
                    .with_attribute("name", "a")
                    .with_attribute("pop", 10i64),
                Feature::from_geometry(Geometry::rectangle(2.0, -1.0, 3.0, 4.0))
                    .with_attribute("name", "b")
                    .with_attribute("pop", AttributeValue::Null),
            ],
        )
        .unwrap();

        let summary = summarize(&collection, "zones.geojson".to_string());
        assert_eq!(summary.feature_count, 2);
        assert_eq!(summary.geometry_family.as_deref(), Some("polygon"));
        assert_eq!(summary.crs, Some(3857));
        assert_eq!(summary.bbox, Some([0.0, -1.0, 3.0, 4.0]));
        assert_eq!(summary.invalid_geometries, 0);
        assert_eq!(summary.fields.len(), 2);
        assert_eq!(summary.fields[1].name, "pop");
        assert_eq!(summary.fields[1].types, vec!["integer".to_string()]);
        assert_eq!(summary.fields[1].non_null, 1);
    }

    #[test]
    fn test_summarize_empty_collection() {
        let summary = summarize(&FeatureCollection::empty(None), "empty.geojson".to_string());
        assert_eq!(summary.feature_count, 0);
        assert!(summary.geometry_family.is_none());
        assert!(summary.bbox.is_none());
        assert!(summary.fields.is_empty());
    }
}
