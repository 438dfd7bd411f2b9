use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use vtaxi_core::prelude::{AircraftType, MovementType};

/// Airport code used when `--airport-data` names a directory
pub const DEFAULT_AIRPORT_CODE: &str = "LFPO";
/// Directory holding processed airport data
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "vtaxi", version, about = "Airport ground movement tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process airport layout data
    Process(ProcessArgs),
    /// Assign positions for aircraft movement
    Assign(AssignArgs),
    /// Find the shortest path through a taxiway sequence
    Path(PathArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MovementArg {
    /// Runway to gate
    Arrival,
    /// Gate to runway
    Departure,
}

impl From<MovementArg> for MovementType {
    fn from(value: MovementArg) -> Self {
        match value {
            MovementArg::Arrival => Self::Arrival,
            MovementArg::Departure => Self::Departure,
        }
    }
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Raw airport `GeoJSON` export
    #[arg(long)]
    pub geojson: PathBuf,

    /// Supplementary runway and parking position data
    #[arg(long)]
    pub json: PathBuf,

    /// Output path for the processed network [default: data/<CODE>.geojson]
    #[arg(long)]
    pub output_network: Option<PathBuf>,

    /// Output path for the airport configuration [default: data/<CODE>.json]
    #[arg(long)]
    pub output_config: Option<PathBuf>,

    /// Processing settings (TOML); LFPO defaults when omitted
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Type of movement
    #[arg(long = "type", value_enum)]
    pub movement: MovementArg,

    /// Runway configuration, random when omitted
    #[arg(long)]
    pub config: Option<String>,

    /// Specific gate
    #[arg(long)]
    pub gate: Option<String>,

    /// Specific runway entrance or exit
    #[arg(long)]
    pub runway_point: Option<String>,

    /// Preferred terminal
    #[arg(long)]
    pub terminal: Option<String>,

    /// Gates to exclude, comma separated
    #[arg(long, value_delimiter = ',')]
    pub exclude_gates: Vec<String>,

    /// Terminals to exclude, comma separated
    #[arg(long, value_delimiter = ',')]
    pub exclude_terminals: Vec<String>,

    /// Processed airport configuration file
    #[arg(long, default_value = "data/LFPO.json")]
    pub airport_data: PathBuf,

    /// Print the assignment as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Type of movement (arrival: runway->gate, departure: gate->runway)
    #[arg(long = "type", value_enum)]
    pub movement: MovementArg,

    /// Runway configuration
    #[arg(long = "airport_config", visible_alias = "airport-config")]
    pub airport_config: String,

    /// Waypoint sequence, e.g. "[W37,L4,W2,V06]"
    #[arg(long)]
    pub path: String,

    /// Processed airport configuration file, or the directory holding it
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub airport_data: PathBuf,

    /// Write the path as `GeoJSON`
    #[arg(long)]
    pub geojson_out: Option<PathBuf>,

    /// Simulate the movement with a built-in aircraft type
    #[arg(long)]
    pub profile: Option<AircraftType>,

    /// Simulation step in seconds
    #[arg(long, default_value_t = 1.0)]
    pub time_step: f64,

    /// Write the movement profile as JSON
    #[arg(long, requires = "profile")]
    pub profile_out: Option<PathBuf>,
}

/// Splits a bracketed, comma separated waypoint list
pub fn parse_waypoints(path: &str) -> Vec<String> {
    path.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|point| !point.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Processed data files of one airport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportFiles {
    pub network: PathBuf,
    pub config: PathBuf,
}

impl AirportFiles {
    /// Resolves `<dir>/<CODE>.geojson` and `<dir>/<CODE>.json` from either the
    /// configuration file or its directory.
    pub fn resolve(airport_data: &Path) -> Self {
        let (dir, code) = if airport_data.is_dir() {
            (airport_data.to_path_buf(), DEFAULT_AIRPORT_CODE.to_string())
        } else {
            let dir = airport_data
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let code = airport_data
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(DEFAULT_AIRPORT_CODE)
                .to_string();
            (dir, code)
        };
        Self {
            network: dir.join(format!("{code}.geojson")),
            config: dir.join(format!("{code}.json")),
        }
    }
}
