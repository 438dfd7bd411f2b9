//! `GeoJSON` and JSON output: the processed network, the airport
//! configuration and computed paths.

mod network;
mod path;

pub use network::{network_to_geojson, write_config, write_network};
