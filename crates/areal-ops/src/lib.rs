//! Areal Ops - Subsetting, joins, interpolation, and aggregation
//!
//! This crate implements the overlay operations over feature collections,
//! computing geometry through a `GeometryEngine` and scheduling per-feature
//! work sequentially or on rayon.

mod aggregate;
pub mod execution;
mod fields;
pub mod interpolate;
mod join;
pub mod models;
pub mod ops;
pub mod project;
mod subset;

pub use areal_geo::predicate::Predicate;
pub use execution::{Executor, ParallelStrategy};
pub use interpolate::ESTIMATE_NOTICE;
pub use models::{AreaInterpolation, FieldReducer, JoinMode, OpsOptions, Reducer};
pub use ops::SpatialOps;
pub use project::project;
