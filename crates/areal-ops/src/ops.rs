use areal_geo::engine::{GeometryEngine, PlanarEngine};

use crate::execution::Executor;
use crate::models::OpsOptions;

/// Entry point for the overlay operations.
///
/// Holds the geometry engine every operation computes with and the options
/// that tune them. Operations never mutate their inputs; each returns a new
/// collection.
pub struct SpatialOps<E = PlanarEngine>
where
    E: GeometryEngine,
{
    pub(crate) engine: E,
    pub(crate) options: OpsOptions,
    pub(crate) executor: Executor,
}

impl SpatialOps<PlanarEngine> {
    /// Create operations backed by the planar `geo` engine
    pub fn new(options: OpsOptions) -> Self {
        Self::with_engine(PlanarEngine, options)
    }
}

impl Default for SpatialOps<PlanarEngine> {
    fn default() -> Self {
        Self::new(OpsOptions::default())
    }
}

impl<E> SpatialOps<E>
where
    E: GeometryEngine,
{
    /// Create operations with a custom geometry engine
    pub fn with_engine(engine: E, options: OpsOptions) -> Self {
        let executor = Executor::new(options.execution);
        Self { engine, options, executor }
    }

    /// Geometry engine used for areas, intersections and predicates
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Options these operations were created with
    pub fn options(&self) -> &OpsOptions {
        &self.options
    }
}
