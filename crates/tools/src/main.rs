use std::sync::Arc;

use clap::{Parser, Subcommand};
use engine::{ClickOutcome, EngineConfig, RecordingRenderer, SightingsEngine};
use foundation::{LonLat, OwnerId};
use streaming::{HttpPointStore, PointStore};
use tools::parse_bounds;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for the sightings engine")]
struct Args {
    /// Base URL of the point store
    #[arg(long, env = "SIGHTINGS_STORE", default_value = "http://127.0.0.1:9200")]
    store: String,

    /// Print engine metrics to stderr when done
    #[arg(long)]
    stats: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the heatmap and circle layer specifications
    Layers,
    /// Fetch the decayed feature collection for a viewport
    View {
        /// Viewport: west,south,east,north
        #[arg(long, allow_hyphen_values = true)]
        bounds: String,
    },
    /// Submit a point in mark mode and print the refreshed viewport
    Mark {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Viewport to refresh afterwards: west,south,east,north
        #[arg(long, allow_hyphen_values = true)]
        bounds: String,
        /// Owner recorded on the point (anonymous when omitted)
        #[arg(long)]
        owner: Option<String>,
    },
    /// Delete every point recorded for an owner
    Purge {
        #[arg(long)]
        owner: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = EngineConfig::from_env();
    let store = Arc::new(HttpPointStore::new(&args.store));
    debug!(store = %store.base_url(), "using point store");

    match args.command {
        Command::Layers => {
            let layers = layers::build_layers(&config.layers)?;
            println!("{}", serde_json::to_string_pretty(&layers.to_json()?)?);
        }
        Command::View { bounds } => {
            let bounds = parse_bounds(&bounds)?;
            let (engine, renderer) = build_engine(config, store, None)?;
            engine.on_load(Some(bounds)).await?;
            print_source(&engine, &renderer)?;
            report(&engine, args.stats);
        }
        Command::Mark {
            lon,
            lat,
            bounds,
            owner,
        } => {
            let bounds = parse_bounds(&bounds)?;
            let (engine, renderer) = build_engine(config, store, owner.map(OwnerId::new))?;
            engine.on_load(Some(bounds)).await?;
            engine.toggle_mark_mode();
            match engine.on_click(LonLat::new(lon, lat)).await? {
                ClickOutcome::Submitted { point, .. } => eprintln!("stored {}", point.id),
                ClickOutcome::Ignored => eprintln!("click ignored"),
                ClickOutcome::NotLoaded => eprintln!("map not loaded"),
            }
            print_source(&engine, &renderer)?;
            report(&engine, args.stats);
        }
        Command::Purge { owner } => {
            let deleted = store.delete_owned(OwnerId::new(owner)).await?;
            println!("deleted {deleted}");
        }
    }

    Ok(())
}

fn build_engine(
    config: EngineConfig,
    store: Arc<HttpPointStore>,
    owner: Option<OwnerId>,
) -> Result<(SightingsEngine, Arc<RecordingRenderer>), Box<dyn std::error::Error>> {
    let renderer = Arc::new(RecordingRenderer::new());
    let engine = SightingsEngine::builder(store, renderer.clone())
        .config(config)
        .user(owner.unwrap_or_default())
        .build()?;
    Ok((engine, renderer))
}

fn print_source(
    engine: &SightingsEngine,
    renderer: &RecordingRenderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = renderer
        .source(&engine.config().layers.source_name)
        .unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&source)?);
    Ok(())
}

fn report(engine: &SightingsEngine, stats: bool) {
    if stats {
        eprint!("{}", engine.metrics());
    }
    for event in engine.drain_trace() {
        debug!(seq = event.seq, kind = event.kind, "{}", event.message);
    }
}
