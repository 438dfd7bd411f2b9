use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use geo::LineString;
use serde_json::json;
use std::hint::black_box;
use vtaxi_core::loading::{RunwayConfigurationTemplate, SupplementaryData};
use vtaxi_core::model::Alternates;
use vtaxi_core::prelude::*;

const X0: f64 = 2.35;
const Y0: f64 = 48.72;
const STEP: f64 = 0.001;

fn coord(column: usize, row: usize) -> (f64, f64) {
    (X0 + column as f64 * STEP, Y0 + row as f64 * STEP)
}

/// Square grid of taxiways `H1..Hn` and `V0..Vn-1` standing on a runway,
/// with one parking position above the top-left corner.
fn grid_lines(size: usize) -> Vec<RawLine> {
    let mut lines = vec![RawLine::new(
        LineString::from(vec![coord(0, 0), coord(size - 1, 0)]),
        SegmentType::Runway,
        "06/24",
    )];
    for row in 1..=size {
        lines.push(RawLine::new(
            LineString::from(vec![coord(0, row), coord(size - 1, row)]),
            SegmentType::Taxiway,
            format!("H{row}"),
        ));
    }
    for column in 0..size {
        lines.push(RawLine::new(
            LineString::from(vec![coord(column, 0), coord(column, size)]),
            SegmentType::Taxiway,
            format!("V{column}"),
        ));
    }
    lines.push(RawLine::new(
        LineString::from(vec![coord(0, size), coord(0, size + 1)]),
        SegmentType::ParkingPosition,
        "P1",
    ));
    lines
}

fn grid_airport(size: usize) -> Airport {
    let entrance = format!("V{}", size - 1);
    let mut settings = ProcessingSettings {
        runway_points: [entrance.clone()].into_iter().collect(),
        ..ProcessingSettings::default()
    };
    settings.runway_configurations.clear();
    settings.runway_configurations.insert(
        "WEST".to_string(),
        RunwayConfigurationTemplate {
            departure: "24".to_string(),
            arrival: "25".to_string(),
            entrances: vec![entrance.clone()],
            exits: vec![entrance],
            alternates: Alternates {
                departure: "06".to_string(),
                arrival: "07".to_string(),
            },
        },
    );
    let supplementary = SupplementaryData::from_value(&json!({
        "parking_positions": { "P1": { "exit_taxiway": format!("H{size}") } }
    }));

    process_lines(&grid_lines(size), supplementary, &settings)
        .to_airport()
        .expect("grid airport has a WEST configuration")
}

fn bench_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_lines");
    for size in [8usize, 16, 32] {
        let lines = grid_lines(size);
        let supplementary = SupplementaryData::from_value(&json!({}));
        let settings = ProcessingSettings::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                let processed = process_lines(black_box(lines), supplementary.clone(), &settings);
                black_box(processed.network.segments.len());
            });
        });
    }
    group.finish();
}

fn bench_find_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_path");
    for size in [8usize, 16, 32] {
        let airport = grid_airport(size);
        let router = airport.router("WEST").expect("WEST configuration");
        let waypoints = vec![
            "P1".to_string(),
            "V0".to_string(),
            format!("H{}", size / 2),
            format!("V{}", size - 1),
        ];
        group.bench_with_input(BenchmarkId::from_parameter(size), &waypoints, |b, waypoints| {
            b.iter(|| {
                let path = router
                    .find_path(black_box(waypoints), MovementType::Departure)
                    .expect("grid route");
                black_box(path.total_distance);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_processing, bench_find_path);
criterion_main!(benches);
