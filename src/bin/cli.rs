//! turfwalk CLI - replay recorded walks through the capture pipeline
//!
//! Usage:
//!   turfwalk-cli replay <files..> [--config <json>] [--output <json>] [--test-mode]
//!   turfwalk-cli cell <lat> <lng> [--grid-size <deg>]
//!
//! Replaying GPX files shows which loops would have been captured and how
//! many grid cells each one claims, which helps tune the loop tolerances
//! against real GPS recordings.

use clap::{Parser, Subcommand};
use gpx::{read, Gpx};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use turfwalk::{
    geo_utils::path_length, GpsPoint, Grid, ReplaySummary, Result,
    TerritoryConfig, TerritoryError,
};

/// Nominal user-equivalent range error used to turn HDOP into meters.
const NOMINAL_UERE_M: f64 = 5.0;

#[derive(Parser)]
#[command(name = "turfwalk-cli")]
#[command(about = "Replay GPS walks through loop detection and grid capture", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay GPX tracks and report captured loops
    Replay {
        /// GPX files, or folders containing GPX files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// JSON file overriding configuration fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the replay summaries as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip fix filtering (deterministic playback)
        #[arg(long)]
        test_mode: bool,
    },

    /// Print the cell identifier for a coordinate
    Cell {
        lat: f64,
        lng: f64,

        /// Grid cell size in degrees
        #[arg(long, default_value_t = TerritoryConfig::default().grid_size)]
        grid_size: f64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let outcome = match cli.command {
        Commands::Replay {
            inputs,
            config,
            output,
            test_mode,
        } => run_replay(&inputs, config.as_deref(), output.as_deref(), test_mode),
        Commands::Cell {
            lat,
            lng,
            grid_size,
        } => {
            println!("{}", Grid::new(grid_size).cell_id(lat, lng));
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load configuration from JSON (missing fields keep their defaults).
fn load_config(path: Option<&Path>, test_mode: bool) -> Result<TerritoryConfig> {
    let mut config = match path {
        Some(p) => serde_json::from_reader(BufReader::new(File::open(p)?))?,
        None => TerritoryConfig::default(),
    };
    if test_mode {
        config.test_mode = true;
    }
    config.validate()?;
    Ok(config)
}

/// Expand folders into the GPX files they contain.
fn collect_gpx_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)?
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "gpx"))
                .collect();
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

/// Parse a single GPX file into timestamped fixes.
fn parse_gpx_file(path: &Path) -> Result<Vec<GpsPoint>> {
    let file = File::open(path)?;
    let gpx: Gpx = read(BufReader::new(file)).map_err(|e| TerritoryError::Gpx(e.to_string()))?;

    let mut points = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for pt in &segment.points {
                let coord = pt.point();
                let timestamp = pt
                    .time
                    .clone()
                    .map(|t| {
                        let at: time::OffsetDateTime = t.into();
                        (at.unix_timestamp_nanos() / 1_000_000) as i64
                    })
                    .unwrap_or(points.len() as i64 * 1000);

                points.push(GpsPoint {
                    latitude: coord.y(),
                    longitude: coord.x(),
                    accuracy: pt.hdop.map(|hdop| hdop * NOMINAL_UERE_M),
                    timestamp,
                });
            }
        }
    }
    Ok(points)
}

fn run_replay(
    inputs: &[PathBuf],
    config_path: Option<&Path>,
    output: Option<&Path>,
    test_mode: bool,
) -> Result<()> {
    let config = load_config(config_path, test_mode)?;

    let mut tracks = Vec::new();
    for path in collect_gpx_paths(inputs)? {
        match parse_gpx_file(&path) {
            Ok(points) => {
                let id = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string();
                println!(
                    "  [OK] {} - {} points, {:.2}km",
                    id,
                    points.len(),
                    path_length(&points) / 1000.0
                );
                tracks.push((id, points));
            }
            Err(e) => eprintln!("  [ERR] Failed to parse {}: {}", path.display(), e),
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("REPLAY ({} tracks)", tracks.len());
    println!("{}", "=".repeat(60));

    let summaries = replay_all(&tracks, &config);
    let mut ok = Vec::new();
    for (summary, (id, _)) in summaries.into_iter().zip(&tracks) {
        match summary {
            Ok(s) => {
                print_summary(&s);
                ok.push(s);
            }
            Err(e) => eprintln!("  [ERR] {}: {}", id, e),
        }
    }

    if let Some(path) = output {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &ok)?;
        println!("\nWrote {} summaries to {}", ok.len(), path.display());
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn replay_all(tracks: &[(String, Vec<GpsPoint>)], config: &TerritoryConfig) -> Vec<Result<ReplaySummary>> {
    turfwalk::replay_tracks_parallel(tracks, config)
}

#[cfg(not(feature = "parallel"))]
fn replay_all(tracks: &[(String, Vec<GpsPoint>)], config: &TerritoryConfig) -> Vec<Result<ReplaySummary>> {
    tracks
        .iter()
        .map(|(id, points)| turfwalk::replay_track(id, points, config))
        .collect()
}

fn print_summary(summary: &ReplaySummary) {
    println!(
        "\n{}: {} fixes ({} rejected), {:.2}km",
        summary.track_id,
        summary.fixes,
        summary.rejected,
        summary.distance_m / 1000.0
    );
    for (i, capture) in summary.captures.iter().enumerate() {
        println!(
            "  Loop {}: {:?}, {} cells, perimeter {:.0}m, closed at ({:.6}, {:.6})",
            i + 1,
            capture.kind,
            capture.cell_count(),
            capture.perimeter_m,
            capture.closure_point.latitude,
            capture.closure_point.longitude
        );
    }
    println!("  Total claimed: {} cells", summary.claimed_cells);
}
