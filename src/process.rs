use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;
use vtaxi_core::prelude::{AirportProcessingConfig, ProcessingSettings, process_airport};

use crate::cli::{DEFAULT_DATA_DIR, ProcessArgs};

/// Settings from `--settings`, or the built-in defaults
///
/// # Errors
///
/// Returns an error if the settings file is missing or invalid.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ProcessingSettings> {
    match path {
        Some(path) => ProcessingSettings::from_toml_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(ProcessingSettings::default()),
    }
}

fn output_path(explicit: Option<&PathBuf>, code: &str, extension: &str) -> PathBuf {
    explicit
        .cloned()
        .unwrap_or_else(|| Path::new(DEFAULT_DATA_DIR).join(format!("{code}.{extension}")))
}

/// Processes raw layout data and writes the network and configuration files
///
/// # Errors
///
/// Returns an error if an input is missing or malformed or an output cannot
/// be written.
pub fn run(args: &ProcessArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let network_path = output_path(args.output_network.as_ref(), &settings.airport_code, "geojson");
    let config_path = output_path(args.output_config.as_ref(), &settings.airport_code, "json");

    let config = AirportProcessingConfig {
        geojson_path: args.geojson.clone(),
        supplementary_path: args.json.clone(),
        settings,
    };
    let processed = process_airport(&config).context("failed to process airport data")?;
    info!(
        nodes = processed.network.nodes.len(),
        segments = processed.network.segments.len(),
        gates = processed.config.gates.total_count,
        "Airport processed"
    );

    processed
        .write_network(&network_path)
        .with_context(|| format!("failed to write {}", network_path.display()))?;
    processed
        .write_config(&config_path)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    println!(
        "Processed data saved to {} and {}",
        network_path.display(),
        config_path.display()
    );
    Ok(())
}
