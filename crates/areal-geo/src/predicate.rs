//! Spatial predicates used by subsetting and joining

use std::fmt;
use std::str::FromStr;

use areal_core::error::{ArealError, Result};
use geo::Geometry as GeoGeometry;

use crate::engine::GeometryEngine;

/// Binary spatial relation between a candidate geometry and a reference geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    /// Any shared point, boundaries included
    Intersects,
    /// No shared point at all
    Disjoint,
    /// Boundaries meet but interiors do not
    Touches,
    /// Candidate lies inside the reference
    Within,
    /// Candidate contains the reference
    Contains,
    /// Minimum planar distance is at most the threshold
    WithinDistance(f64),
}

impl Predicate {
    /// Reject thresholds that cannot be evaluated
    pub fn validate(&self) -> Result<()> {
        if let Predicate::WithinDistance(distance) = self {
            if !distance.is_finite() || *distance < 0.0 {
                return Err(ArealError::InvalidPredicate {
                    reason: format!("Distance must be finite and non-negative, got {}", distance),
                });
            }
        }
        Ok(())
    }

    /// Evaluate `candidate <predicate> reference`
    pub fn evaluate<E: GeometryEngine + ?Sized>(
        &self,
        engine: &E,
        candidate: &GeoGeometry,
        reference: &GeoGeometry,
    ) -> bool {
        match self {
            Predicate::Intersects => engine.intersects(candidate, reference),
            Predicate::Disjoint => engine.disjoint(candidate, reference),
            Predicate::Touches => engine.touches(candidate, reference),
            Predicate::Within => engine.within(candidate, reference),
            Predicate::Contains => engine.contains(candidate, reference),
            Predicate::WithinDistance(distance) => {
                engine.within_distance(candidate, reference, *distance)
            }
        }
    }

    /// Envelope expansion for index pre-filtering.
    ///
    /// `None` means the predicate can hold for geometries whose envelopes do
    /// not meet, so an index cannot narrow the candidates.
    pub fn search_margin(&self) -> Option<f64> {
        match self {
            Predicate::Disjoint => None,
            Predicate::WithinDistance(distance) => Some(*distance),
            _ => Some(0.0),
        }
    }

    /// Whether the predicate holds exactly when `Intersects` does not
    pub fn is_complement(&self) -> bool {
        matches!(self, Predicate::Disjoint)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Intersects => write!(f, "intersects"),
            Predicate::Disjoint => write!(f, "disjoint"),
            Predicate::Touches => write!(f, "touches"),
            Predicate::Within => write!(f, "within"),
            Predicate::Contains => write!(f, "contains"),
            Predicate::WithinDistance(d) => write!(f, "dwithin:{}", d),
        }
    }
}

impl FromStr for Predicate {
    type Err = ArealError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let predicate = match lower.as_str() {
            "intersects" => Predicate::Intersects,
            "disjoint" => Predicate::Disjoint,
            "touches" => Predicate::Touches,
            "within" => Predicate::Within,
            "contains" => Predicate::Contains,
            other => {
                let threshold = other
                    .strip_prefix("dwithin:")
                    .or_else(|| other.strip_prefix("within_distance:"))
                    .ok_or_else(|| ArealError::InvalidPredicate {
                        reason: format!(
                            "Unknown predicate '{}'. Use intersects, disjoint, touches, within, contains, or dwithin:<distance>",
                            s
                        ),
                    })?;
                let distance = threshold.parse::<f64>().map_err(|_| ArealError::InvalidPredicate {
                    reason: format!("Invalid distance '{}'", threshold),
                })?;
                Predicate::WithinDistance(distance)
            }
        };

        predicate.validate()?;
        Ok(predicate)
    }
}
