use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Areal - Vector overlay toolkit
#[derive(Parser, Debug)]
#[command(name = "areal")]
#[command(about = "Subsetting, spatial joins, area-weighted interpolation and aggregation over GeoJSON", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output messages in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./areal.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Process features in parallel
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Worker threads for parallel processing
    #[arg(long, global = true, value_name = "N")]
    pub threads: Option<usize>,

    /// EPSG code assigned to inputs that declare no CRS
    #[arg(long, global = true, value_name = "EPSG")]
    pub crs: Option<u32>,

    /// Geometry validity mode (strict or lenient)
    #[arg(long, global = true, value_name = "MODE")]
    pub validity: Option<String>,

    /// Write the resulting GeoJSON here instead of stdout
    #[arg(long, short = 'o', global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keep source features that satisfy a predicate against a reference layer
    Subset(SubsetArgs),

    /// Attach attributes of matching right features to left features
    Join(JoinArgs),

    /// Interpolate attributes from source polygons onto target polygons
    Interpolate(InterpolateArgs),

    /// Merge features sharing an attribute value
    Dissolve(DissolveArgs),

    /// Aggregate points by the zone polygon containing them
    Contain(ContainArgs),

    /// Keep only the named attributes
    Project(ProjectArgs),

    /// Summarize a GeoJSON file
    Inspect(InspectArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct SubsetArgs {
    /// Features to filter
    pub source: PathBuf,

    /// Reference features
    pub reference: PathBuf,

    /// Predicate: intersects, disjoint, touches, within, contains, or dwithin:<distance>
    #[arg(long, short = 'p', default_value = "intersects")]
    pub predicate: String,
}

#[derive(Parser, Debug)]
pub struct JoinArgs {
    /// Left features; output geometry comes from here
    pub left: PathBuf,

    /// Right features whose attributes are attached
    pub right: PathBuf,

    /// Predicate: intersects, disjoint, touches, within, contains, or dwithin:<distance>
    #[arg(long, short = 'p', default_value = "intersects")]
    pub predicate: String,

    /// Join mode (left or inner)
    #[arg(long, default_value = "left")]
    pub mode: String,

    /// Suffix for colliding right-hand column names
    #[arg(long)]
    pub suffix: Option<String>,
}

#[derive(Parser, Debug)]
pub struct InterpolateArgs {
    /// Source polygons carrying the values
    pub source: PathBuf,

    /// Target polygons receiving the values
    pub target: PathBuf,

    /// Extensive fields (totals), comma-separated
    #[arg(long, short = 'e', value_delimiter = ',')]
    pub extensive: Vec<String>,

    /// Intensive fields (densities, rates), comma-separated
    #[arg(long, short = 'i', value_delimiter = ',')]
    pub intensive: Vec<String>,

    /// Source polygons with area at or below this are rejected
    #[arg(long)]
    pub area_epsilon: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct DissolveArgs {
    /// Features to merge
    pub source: PathBuf,

    /// Attribute whose values define the groups
    #[arg(long)]
    pub by: String,

    /// Reducers as field:reducer[:alias] (mean, sum, min, max, count, first)
    #[arg(long, short = 'r', value_delimiter = ',')]
    pub reduce: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ContainArgs {
    /// Point features to aggregate
    pub points: PathBuf,

    /// Zone polygons
    pub zones: PathBuf,

    /// Reducers as field:reducer[:alias] (mean, sum, min, max, count, first)
    #[arg(long, short = 'r', value_delimiter = ',')]
    pub reduce: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Features to project
    pub source: PathBuf,

    /// Attributes to keep, in order, comma-separated
    #[arg(long, short = 'f', value_delimiter = ',', required = true)]
    pub fields: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// GeoJSON file to summarize
    pub path: PathBuf,
}
