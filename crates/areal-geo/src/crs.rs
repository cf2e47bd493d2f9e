//! CRS compatibility checks
//!
//! Inputs are expected to be pre-projected into a shared planar reference;
//! nothing here reprojects.

use crate::models::Crs;
use areal_core::error::{ArealError, Result};

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// Fail with `CrsMismatch` when both collections declare a CRS and they differ.
///
/// A collection without a CRS is assumed to share the other's reference.
pub fn check_crs_mismatch(left: Option<&Crs>, right: Option<&Crs>) -> Result<()> {
    match (left, right) {
        (Some(left), Some(right)) if !crs_match(left, right) => Err(ArealError::CrsMismatch {
            left_crs: left.to_string(),
            right_crs: right.to_string(),
        }),
        _ => Ok(()),
    }
}
