//! This module turns the raw OSM export into the processed airport network
//! and reads processed airports back for routing.

mod builder;
mod classifier;
mod config;
pub(crate) mod indexer;
pub(crate) mod persisted;
pub mod raw;

pub use builder::{ProcessedAirport, process_airport, process_lines};
pub use config::{AirportProcessingConfig, ProcessingSettings, RunwayConfigurationTemplate};
pub use indexer::IndexedNetwork;
pub use persisted::{load_airport, read_network};
pub use raw::{RawLine, SupplementaryData, read_raw_lines};
