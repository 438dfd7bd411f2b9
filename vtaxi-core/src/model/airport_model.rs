use crate::model::{AirportConfig, TaxiGraph};
use crate::routing::WaypointRouter;
use crate::Error;

/// Loaded airport: the routable network together with its configuration
#[derive(Debug, Clone)]
pub struct Airport {
    pub graph: TaxiGraph,
    pub config: AirportConfig,
}

impl Airport {
    pub fn new(graph: TaxiGraph, config: AirportConfig) -> Self {
        Self { graph, config }
    }

    /// Creates a router bound to one runway configuration (`EAST`, `WEST`, ...)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is not defined for this airport.
    pub fn router(&self, configuration: &str) -> Result<WaypointRouter<'_>, Error> {
        WaypointRouter::new(&self.graph, &self.config, configuration)
    }
}
