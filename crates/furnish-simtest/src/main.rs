//! Furnish Headless Placement Harness
//!
//! Runs the full pipeline (place, validate human approach, export) on JSON
//! inputs. When a seed yields no valid layout the next seed is tried, up to
//! `--retries` times. The accepted layout is written as JSON.
//!
//! Usage:
//!   cargo run -p furnish-simtest -- --catalog db.json --bounds 0,4,0,3,0,2.5 bed chair
//!   cargo run -p furnish-simtest -- --catalog db.json --room room.json bed --verbose

use std::fs;
use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use furnish_logic::catalog::{Catalog, CatalogEntry};
use furnish_logic::config::{AccessConfig, PlannerConfig};
use furnish_logic::geometry::Room;
use furnish_logic::grid::{Cell, WalkGrid};
use furnish_logic::layout::Layout;
use furnish_logic::planner::place_and_validate_with;
use furnish_logic::{PlacementError, Result};
use log::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "furnish-simtest")]
#[command(about = "Headless furniture placement and accessibility harness")]
#[command(version)]
#[command(group(ArgGroup::new("room_source").required(true).args(["room", "bounds"])))]
struct Cli {
    /// Catalog JSON file ({"items": [...]})
    #[arg(short, long)]
    catalog: PathBuf,

    /// Room JSON file with x_min, x_max, y_min, y_max, z_min, z_max
    #[arg(long)]
    room: Option<PathBuf>,

    /// Room bounds as x_min,x_max,y_min,y_max,z_min,z_max (meters)
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<String>,

    /// Catalog item names to place, in placement order
    #[arg(required = true)]
    items: Vec<String>,

    /// Seed of the first run
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Seeds to try before giving up
    #[arg(short, long, default_value = "30")]
    retries: u32,

    /// Planner configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file for the layout (stdout when absent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging and an ASCII map of the walkability grid
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    eprintln!("=== Furnish Placement Harness ===\n");

    let catalog = Catalog::from_json(&fs::read_to_string(&cli.catalog)?)?;
    info!("Loaded {} catalog entries from {}", catalog.len(), cli.catalog.display());

    let room = load_room(cli)?;
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_json(&fs::read_to_string(path)?)?,
        None => PlannerConfig::default(),
    };
    let entries = catalog.resolve(&cli.items).map_err(|e| {
        if let PlacementError::UnknownCatalogItem { .. } = e {
            let mut known: Vec<&str> = catalog.names().collect();
            known.sort_unstable();
            info!("Known catalog items: {}", known.join(", "));
        }
        e
    })?;

    let layout = plan_with_retries(&room, &entries, cli.seed, cli.retries, &config)?;

    if cli.verbose {
        for item in &layout.items {
            let reach = match item.approach_side {
                Some(side) => format!("approached from {}", side),
                None => "no approach needed".to_string(),
            };
            eprintln!(
                "  ✓ {} at ({:.2}, {:.2}, {:.2}) rot {:.0}°, {}",
                item.name, item.center[0], item.center[1], item.center[2], item.rotation, reach
            );
        }
        eprintln!("\n{}", render_grid(&layout, &config.access)?);
    }

    let json = layout.to_json_pretty()?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("Layout written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn load_room(cli: &Cli) -> Result<Room> {
    if let Some(bounds) = &cli.bounds {
        return parse_bounds(bounds);
    }
    match &cli.room {
        Some(path) => {
            let room: Room = serde_json::from_str(&fs::read_to_string(path)?)?;
            room.validate()?;
            Ok(room)
        }
        None => Err(PlacementError::InvalidRoom(
            "either --room or --bounds is required".into(),
        )),
    }
}

fn parse_bounds(text: &str) -> Result<Room> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PlacementError::InvalidRoom(format!("bad bounds '{}': {}", text, e)))?;
    match values[..] {
        [x_min, x_max, y_min, y_max, z_min, z_max] => {
            Room::new(x_min, x_max, y_min, y_max, z_min, z_max)
        }
        _ => Err(PlacementError::InvalidRoom(format!(
            "expected 6 comma-separated bounds, got {}",
            values.len()
        ))),
    }
}

/// Run the planner on consecutive seeds until one layout is accepted.
/// Only retryable failures move on to the next seed.
fn plan_with_retries(
    room: &Room,
    entries: &[CatalogEntry],
    first_seed: u64,
    retries: u32,
    config: &PlannerConfig,
) -> Result<Layout> {
    let runs = retries.max(1);
    let mut last_err = None;
    for run in 0..runs {
        let seed = first_seed.wrapping_add(run as u64);
        match place_and_validate_with(room, entries, seed, config) {
            Ok(layout) => {
                info!("Accepted layout with seed {} (run {}/{})", seed, run + 1, runs);
                return Ok(layout);
            }
            Err(e) if e.is_retryable() => {
                warn!("Seed {} rejected: {}", seed, e);
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| PlacementError::InvalidConfig("no runs attempted".into())))
}

/// Walkability map of an accepted layout with every approach route drawn.
fn render_grid(layout: &Layout, access: &AccessConfig) -> Result<String> {
    let mut grid = WalkGrid::for_room(&layout.room, access.cell_size_m)?;
    let (hx, hy) = (access.agent.width / 2.0, access.agent.depth / 2.0);
    for item in &layout.items {
        let (x_lo, x_hi, y_lo, y_hi) = item.aabb.expanded_footprint(hx, hy);
        grid.block_rect(x_lo, x_hi, y_lo, y_hi);
    }
    let route: Vec<Cell> = layout
        .items
        .iter()
        .filter_map(|item| item.approach_path.as_ref())
        .flatten()
        .map(|p| grid.world_to_cell(p[0], p[1]))
        .collect();
    Ok(format!(
        "{}×{} cells, {} blocked\n{}",
        grid.nx(),
        grid.ny(),
        grid.blocked_count(),
        grid.to_ascii(&route)
    ))
}
