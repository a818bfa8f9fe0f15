//! Altar CLI - offline harness for the altar decision engine.
//!
//! - `altar decide --scan <fixture.json>` - evaluate one recorded altar
//! - `altar match --context <header> <text>` - run a single line through the matcher
//! - `altar catalog` - list the active modifier catalog with effective tiers

mod events;
mod scan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use altar_core::{DrawQueue, SystemClock};
use altar_decide::{AltarConfig, AltarEvaluator, Outcome};
use altar_mods::{CachedMatcher, ModCatalog, ModMatcher, TextNormalizer};

use crate::events::{DecisionEvent, EventLog};
use crate::scan::ScanFixture;

#[derive(Parser)]
#[command(name = "altar")]
#[command(about = "Altar decision harness", version)]
struct Cli {
    /// Settings file (defaults to ./altar.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a recorded two-panel scan
    Decide {
        /// Scan fixture (JSON)
        #[arg(long)]
        scan: PathBuf,

        /// Append a decision event to this JSONL file
        #[arg(long)]
        events: Option<PathBuf>,
    },

    /// Match one modifier line
    Match {
        /// Panel header naming who the modifier applies to
        #[arg(long)]
        context: String,

        /// Raw modifier text
        text: String,
    },

    /// List the active catalog
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let catalog = config.load_catalog()?;

    match cli.command {
        Commands::Decide { scan, events } => decide(&config, catalog, &scan, events),
        Commands::Match { context, text } => match_line(catalog, &context, &text),
        Commands::Catalog => list_catalog(&config, &catalog),
    }
}

fn load_config(path: Option<&Path>) -> Result<AltarConfig> {
    match path {
        Some(path) => AltarConfig::load(path),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            AltarConfig::load_from_dir(&cwd)
        }
    }
}

fn matcher_for(catalog: Arc<ModCatalog>) -> CachedMatcher {
    CachedMatcher::new(ModMatcher::new(catalog), Arc::new(TextNormalizer::new()))
}

fn decide(
    config: &AltarConfig,
    catalog: ModCatalog,
    scan: &Path,
    events: Option<PathBuf>,
) -> Result<()> {
    let fixture = ScanFixture::load(scan)?;
    let catalog = Arc::new(catalog);
    let matcher = matcher_for(Arc::clone(&catalog));
    let unit = fixture
        .into_unit(&matcher)
        .with_cache_ttl(config.cache_ttl());

    let evaluator = AltarEvaluator::from_config(config, &catalog, Arc::new(SystemClock::new()));
    let mut queue = DrawQueue::new();
    let evaluation = evaluator.evaluate(&unit, &mut queue)?;

    match evaluation.outcome {
        Outcome::Winner { side, reason } => println!("Winner: {side} ({reason:?})"),
        Outcome::Neutral(reason) => println!("No winner: {reason:?}"),
    }
    match &evaluation.button {
        Some(button) => println!("Click: element {}", button.id()),
        None => println!("Click: none"),
    }
    print_queue(&queue);

    if let Some(path) = events {
        let event = DecisionEvent::new(unit.id().to_string(), unit.kind(), &evaluation)?;
        EventLog::new(path).emit(&event)?;
    }
    Ok(())
}

fn print_queue(queue: &DrawQueue) {
    if !queue.texts().is_empty() {
        println!();
        println!("Text:");
        for text in queue.texts() {
            println!(
                "  ({:>6.1}, {:>6.1})  {}",
                text.position.x, text.position.y, text.text
            );
        }
    }
    if !queue.frames().is_empty() {
        println!();
        println!("Frames:");
        for frame in queue.frames() {
            let c = frame.color;
            println!(
                "  ({}, {}, {}x{})  #{:02x}{:02x}{:02x}  thickness {}",
                frame.rect.x, frame.rect.y, frame.rect.width, frame.rect.height, c.r, c.g, c.b,
                frame.thickness
            );
        }
    }
}

fn match_line(catalog: ModCatalog, context: &str, text: &str) -> Result<()> {
    let matcher = matcher_for(Arc::new(catalog));
    match matcher.match_raw(text, context) {
        Some(m) => {
            let kind = if m.is_beneficial() { "upside" } else { "downside" };
            println!("{kind}: {}", m.canonical);
        }
        None => println!("unmatched"),
    }
    Ok(())
}

fn list_catalog(config: &AltarConfig, catalog: &ModCatalog) -> Result<()> {
    let tiers = config.tier_table(catalog);
    println!("{} modifiers", catalog.len());
    for (kind, descriptor) in catalog.descriptors() {
        let canonical = descriptor.canonical();
        let sign = if kind.is_beneficial() { '+' } else { '-' };
        println!(
            "  {sign} {:>4}  {}",
            tiers.tier(canonical.as_str()),
            canonical
        );
    }
    Ok(())
}
