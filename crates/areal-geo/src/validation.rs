use crate::models::{to_geo_geometry, Geometry, ValidityMode};
use areal_core::error::{ArealError, Result};
use geo::Validation;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    fn absorb(&mut self, prefix: String, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }

    /// First error formatted as `location: reason`
    pub fn first_reason(&self) -> Option<String> {
        self.errors.first().map(|e| format!("{}: {}", e.location, e.reason))
    }
}

/// Validate a geometry's structure and, for polygons, its topology.
///
/// Polygon rings must not cross themselves or each other, and the parts of a
/// multipolygon must not overlap.
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    let mut result = validate_structure(geometry);
    if result.is_valid {
        if let Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } = geometry {
            if let Err(problem) = to_geo_geometry(geometry).check_validation() {
                result.add_error(geometry.type_name().to_string(), problem.to_string());
            }
        }
    }
    result
}

fn validate_structure(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Point { coordinates } => validate_position("Point", coordinates),
        Geometry::LineString { coordinates } => validate_linestring(coordinates),
        Geometry::Polygon { coordinates } => validate_polygon(coordinates),
        Geometry::MultiPoint { coordinates } => {
            let mut result = ValidationResult::valid();
            if coordinates.is_empty() {
                result.add_error("MultiPoint".to_string(), "MultiPoint has no points".to_string());
            }
            for (i, c) in coordinates.iter().enumerate() {
                result.absorb(format!("MultiPoint[{}]", i), validate_position("Point", c));
            }
            result
        }
        Geometry::MultiLineString { coordinates } => {
            let mut result = ValidationResult::valid();
            if coordinates.is_empty() {
                result.add_error(
                    "MultiLineString".to_string(),
                    "MultiLineString has no lines".to_string(),
                );
            }
            for (i, ls) in coordinates.iter().enumerate() {
                result.absorb(format!("MultiLineString[{}]", i), validate_linestring(ls));
            }
            result
        }
        Geometry::MultiPolygon { coordinates } => {
            let mut result = ValidationResult::valid();
            if coordinates.is_empty() {
                result.add_error(
                    "MultiPolygon".to_string(),
                    "MultiPolygon has no polygons".to_string(),
                );
            }
            for (i, poly) in coordinates.iter().enumerate() {
                result.absorb(format!("MultiPolygon[{}]", i), validate_polygon(poly));
            }
            result
        }
    }
}

fn validate_position(location: &str, coord: &[f64; 2]) -> ValidationResult {
    let mut result = ValidationResult::valid();
    if !coord[0].is_finite() || !coord[1].is_finite() {
        result.add_error(
            format!("{}({}, {})", location, coord[0], coord[1]),
            "Coordinates must be finite".to_string(),
        );
    }
    result
}

fn validate_linestring(coords: &[[f64; 2]]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    // LineString must have at least 2 points
    if coords.len() < 2 {
        result.add_error(
            "LineString".to_string(),
            format!("LineString must have at least 2 points, found {}", coords.len()),
        );
        return result;
    }

    for (i, coord) in coords.iter().enumerate() {
        if !coord[0].is_finite() || !coord[1].is_finite() {
            result.add_error(format!("LineString[{}]", i), "Coordinates must be finite".to_string());
        }
    }

    result
}

fn validate_ring(location: String, ring: &[[f64; 2]], result: &mut ValidationResult) {
    if ring.len() < 4 {
        result.add_error(
            location.clone(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location.clone(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    if ring.iter().any(|c| !c[0].is_finite() || !c[1].is_finite()) {
        result.add_error(location, "Coordinates must be finite".to_string());
    }
}

fn validate_polygon(rings: &[Vec<[f64; 2]>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let Some((exterior, interiors)) = rings.split_first() else {
        result.add_error("Polygon".to_string(), "Polygon has no exterior ring".to_string());
        return result;
    };

    validate_ring("Polygon exterior".to_string(), exterior, &mut result);
    for (i, interior) in interiors.iter().enumerate() {
        validate_ring(format!("Polygon interior[{}]", i), interior, &mut result);
    }

    result
}

/// Check every geometry of a collection under the given validity mode.
///
/// Strict mode fails on the first invalid geometry. Lenient mode logs each
/// invalid geometry and lets the operation proceed with it unchanged.
pub fn check_geometries<'a, I>(geometries: I, mode: ValidityMode) -> Result<usize>
where
    I: IntoIterator<Item = &'a Geometry>,
{
    let mut invalid = 0;
    for (index, geometry) in geometries.into_iter().enumerate() {
        let validation = validate_geometry(geometry);
        if validation.is_valid {
            continue;
        }

        let reason = validation.first_reason().unwrap_or_else(|| "Invalid geometry".to_string());
        match mode {
            ValidityMode::Strict => return Err(ArealError::InvalidGeometry { index, reason }),
            ValidityMode::Lenient => {
                tracing::warn!(index, reason = %reason, "Proceeding with invalid geometry");
                invalid += 1;
            }
        }
    }
    Ok(invalid)
}

/// Count invalid geometries in a collection
pub fn count_invalid_geometries(geometries: &[Geometry]) -> usize {
    geometries.iter().filter(|g| !validate_geometry(g).is_valid).count()
}
