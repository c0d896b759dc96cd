use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use yardmaster_core::consistency::audit_layout;
use yardmaster_core::id::{CarId, IndustryId, LocationId, TrackId};
use yardmaster_core::initializer::initialize_layout;
use yardmaster_core::layout_state::LayoutState;
use yardmaster_core::reset::reset_to_home_yards;
use yardmaster_core::routing::OffLayoutRoutingService;
use yardmaster_core::store::InMemoryStore;
use yardmaster_data::loader::{detect_format, require_data_file};
use yardmaster_data::schema::INDUSTRIES_FILE;
use yardmaster_data::{LayoutData, load_layout, write_layout};

#[derive(Parser, Debug)]
#[command(
    name = "yardmaster",
    version,
    about = "Car placement and yard assignment for a model railroad layout",
    long_about = "Loads a layout directory (locations, industries and rolling_stock files \
                  in RON, TOML or JSON, plus an optional operations file) and runs \
                  placement operations against it."
)]
struct Args {
    /// Layout directory
    dir: PathBuf,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Empty the tracks and send every car back to its home yard
    Reset {
        /// Save the result back into the layout directory
        #[arg(long)]
        write: bool,
    },
    /// Spot every unplaced car in its home yard
    Initialize {
        #[arg(long)]
        write: bool,
    },
    /// Check that tracks and car records agree; fails if they don't
    Audit,
    /// Plan a destination, staging through a fiddle yard when the target is off-layout
    Route {
        /// Location the car is leaving
        #[arg(long)]
        origin: String,
        /// Destination location
        #[arg(long)]
        location: String,
        /// Destination industry
        #[arg(long)]
        industry: String,
        /// Destination track
        #[arg(long)]
        track: Option<String>,
    },
    /// Spot a car on a track
    Place {
        #[arg(long)]
        car: String,
        #[arg(long)]
        industry: String,
        #[arg(long)]
        track: String,
        #[arg(long)]
        write: bool,
    },
    /// Take a car off its current track
    Remove {
        #[arg(long)]
        car: String,
        #[arg(long)]
        write: bool,
    },
    /// Move a car to another track
    Move {
        #[arg(long)]
        car: String,
        #[arg(long)]
        industry: String,
        #[arg(long)]
        track: String,
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .without_time()
        .init();

    if !args.dir.is_dir() {
        bail!("Layout directory does not exist: {}", args.dir.display());
    }
    let data = load_layout(&args.dir)
        .with_context(|| format!("Failed to load layout from {}", args.dir.display()))?;

    match args.command {
        Command::Reset { write } => reset(&args.dir, data, write),
        Command::Initialize { write } => initialize(&args.dir, data, write),
        Command::Audit => audit(&data),
        Command::Route {
            origin,
            location,
            industry,
            track,
        } => route(&data, origin, location, industry, track),
        Command::Place {
            car,
            industry,
            track,
            write,
        } => {
            let strict = data.config.placement.strict_duplicate_check;
            edit(&args.dir, data, write, |state| {
                let car_id = CarId::new(car);
                let record = state
                    .car(&car_id)
                    .cloned()
                    .with_context(|| format!("Unknown car {car_id}"))?;
                let at = state.place_car_at_industry(
                    &IndustryId::new(industry),
                    &TrackId::new(track),
                    record,
                    !strict,
                )?;
                println!("Placed {car_id} on {at}");
                Ok(())
            })
        }
        Command::Remove { car, write } => edit(&args.dir, data, write, |state| {
            let car_id = CarId::new(car);
            let Some(at) = state.locate(&car_id) else {
                bail!("Car {car_id} is not on any track");
            };
            state.remove_car_from_industry(&at.industry_id, &at.track_id, &car_id)?;
            println!("Removed {car_id} from {at}");
            Ok(())
        }),
        Command::Move {
            car,
            industry,
            track,
            write,
        } => edit(&args.dir, data, write, |state| {
            let car_id = CarId::new(car);
            let at = state.move_car(&car_id, &IndustryId::new(industry), &TrackId::new(track))?;
            println!("Moved {car_id} to {at}");
            Ok(())
        }),
    }
}

// ===========================================================================
// Commands
// ===========================================================================

fn reset(dir: &Path, data: LayoutData, write: bool) -> Result<()> {
    let mut store = InMemoryStore::new(data.industries.clone(), data.rolling_stock.clone());
    let report = reset_to_home_yards(&mut store, &data.config.reset).context("Reset failed")?;

    println!(
        "Reset {} industries: {} cars placed, {} kept, {} skipped",
        report.cleared_industries,
        report.placed.len(),
        report.kept.len(),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.car_id, skipped.reason);
    }

    let (industries, rolling_stock) = store.into_parts();
    save(
        dir,
        LayoutData {
            industries,
            rolling_stock,
            ..data
        },
        write,
    )
}

fn initialize(dir: &Path, data: LayoutData, write: bool) -> Result<()> {
    let outcome = initialize_layout(&data.industries, &data.rolling_stock);

    println!(
        "Initialized: {} cars placed, {} skipped",
        outcome.placements.len(),
        outcome.skipped.len()
    );
    for (car_id, at) in &outcome.placements {
        println!("  {car_id} -> {at}");
    }
    for skipped in &outcome.skipped {
        println!("  skipped {}: {}", skipped.car_id, skipped.reason);
    }

    let rolling_stock = outcome.apply_to_cars(&data.rolling_stock);
    save(
        dir,
        LayoutData {
            industries: outcome.industries,
            rolling_stock,
            ..data
        },
        write,
    )
}

fn audit(data: &LayoutData) -> Result<()> {
    let found = audit_layout(&data.industries, &data.rolling_stock);
    if found.is_empty() {
        println!("Layout is consistent");
        return Ok(());
    }
    for discrepancy in &found {
        println!("{discrepancy}");
    }
    bail!("{} discrepancies found", found.len());
}

fn route(
    data: &LayoutData,
    origin: String,
    location: String,
    industry: String,
    track: Option<String>,
) -> Result<()> {
    let service = OffLayoutRoutingService::new(&data.locations, &data.industries);
    let track = track.map(TrackId::new);
    let Some(destination) = service.plan_destination(
        &LocationId::new(origin),
        &LocationId::new(location),
        &IndustryId::new(industry),
        track.as_ref(),
    ) else {
        bail!("No route: the target needs a track, or no fiddle yard can stage it");
    };
    println!("{}", serde_json::to_string_pretty(&destination)?);
    Ok(())
}

/// Run one edit against the layout aggregate, then save.
fn edit(
    dir: &Path,
    data: LayoutData,
    write: bool,
    op: impl FnOnce(&mut LayoutState) -> Result<()>,
) -> Result<()> {
    let mut state = LayoutState::from_parts(data.industries.clone(), data.rolling_stock.clone());
    op(&mut state)?;

    let (industries, rolling_stock) = state.into_parts();
    save(
        dir,
        LayoutData {
            industries,
            rolling_stock,
            ..data
        },
        write,
    )
}

/// Write `data` back in the format the directory already uses.
fn save(dir: &Path, data: LayoutData, write: bool) -> Result<()> {
    if !write {
        info!("Dry run; pass --write to save");
        return Ok(());
    }
    let format = detect_format(&require_data_file(dir, INDUSTRIES_FILE)?)?;
    write_layout(dir, &data, format)
        .with_context(|| format!("Failed to write layout to {}", dir.display()))?;
    info!(dir = %dir.display(), "Saved layout");
    Ok(())
}
