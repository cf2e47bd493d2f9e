use serde::Serialize;

/// Output of an operation that wrote its result to a file
#[derive(Debug, Serialize)]
pub struct WriteOutput {
    pub operation: String,
    pub path: String,
    pub input_features: usize,
    pub output_features: usize,
}

/// Output for inspect command
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub path: String,
    pub feature_count: usize,
    pub geometry_family: Option<String>,
    pub crs: Option<u32>,
    pub bbox: Option<[f64; 4]>,
    pub invalid_geometries: usize,
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Serialize)]
pub struct FieldInfo {
    pub name: String,
    pub types: Vec<String>,
    pub non_null: usize,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub entries: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}
