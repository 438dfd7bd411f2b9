use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use geojson::GeoJson;
use tracing::info;
use vtaxi_core::prelude::{
    Airport, MovementType, TaxiGraph, TaxiPath, load_airport, movement_profile,
};

use crate::cli::{AirportFiles, PathArgs, parse_waypoints};

/// Numbered segment list of a path, each segment printed once
pub fn segment_lines(path: &TaxiPath, graph: &TaxiGraph) -> Vec<String> {
    path.unique_segments()
        .into_iter()
        .enumerate()
        .map(|(i, id)| match graph.segment_by_id(id) {
            Some(segment) => format!("{}. {segment}", i + 1),
            None => format!("{}. {id}", i + 1),
        })
        .collect()
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn write_geojson(path: &Path, taxi_path: &TaxiPath, graph: &TaxiGraph) -> anyhow::Result<()> {
    let collection = taxi_path.to_geojson(graph)?;
    create_parent(path)?;
    let writer = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    serde_json::to_writer_pretty(writer, &GeoJson::FeatureCollection(collection))?;
    info!("Path written to {}", path.display());
    Ok(())
}

fn simulate(args: &PathArgs, airport: &Airport, path: &TaxiPath) -> anyhow::Result<()> {
    let Some(aircraft) = args.profile else {
        return Ok(());
    };
    let points = movement_profile(path, &airport.graph, &aircraft, args.time_step)?;
    let duration = points.last().map_or(0.0, |point| point.time);
    let top_speed = points.iter().map(|point| point.speed).fold(0.0, f64::max);
    println!(
        "Movement profile ({aircraft}): {} points, {duration:.0}s, top speed {top_speed:.1}kt",
        points.len()
    );

    if let Some(out) = &args.profile_out {
        create_parent(out)?;
        let writer = BufWriter::new(
            File::create(out).with_context(|| format!("failed to create {}", out.display()))?,
        );
        serde_json::to_writer_pretty(writer, &points)?;
        info!("Movement profile written to {}", out.display());
    }
    Ok(())
}

/// Routes the waypoint sequence and prints the path
///
/// # Errors
///
/// Returns an error if the airport data cannot be loaded, the configuration is
/// unknown, or no path satisfies the waypoints.
pub fn run(args: &PathArgs) -> anyhow::Result<()> {
    let files = AirportFiles::resolve(&args.airport_data);
    let airport = load_airport(&files.network, &files.config).with_context(|| {
        format!(
            "failed to load airport data from {} and {}",
            files.network.display(),
            files.config.display()
        )
    })?;
    let router = airport.router(&args.airport_config)?;

    let points = parse_waypoints(&args.path);
    let movement = MovementType::from(args.movement);
    println!("Processing {movement} path");
    println!("Waypoints: {}", points.join(" -> "));

    let path = router
        .find_path(&points, movement)
        .context("No valid path found through all waypoints!")?;

    println!();
    println!("Shortest path found:");
    for line in segment_lines(&path, &airport.graph) {
        println!("{line}");
    }
    println!();
    println!("Total path length: {:.1}m", path.total_distance);

    if let Some(out) = &args.geojson_out {
        write_geojson(out, &path, &airport.graph)?;
    }
    simulate(args, &airport, &path)
}
