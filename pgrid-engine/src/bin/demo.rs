//! Grid demo driver
//!
//! Mounts a grid session against a running catalog service, applies a
//! scripted set of interactions and prints the resulting grids as text.
//! Start the catalog first:
//!
//! ```bash
//! pgrid-server --seed-demo
//! pgrid-demo --width 1024 --toggle 2 --toggle 5 --cond OR
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pgrid_common::api::{PostSummary, TermSummary};
use pgrid_common::FilterCond;
use pgrid_engine::events::GridEvent;
use pgrid_engine::{
    FilterGroup, FilterPanel, GridConfig, GridSession, GridSnapshot, HttpResolver,
};
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for pgrid-demo
#[derive(Parser, Debug)]
#[command(name = "pgrid-demo")]
#[command(about = "Scripted demo driver for the PGRID grid engine")]
#[command(version)]
struct Args {
    /// Grid TOML config path (defaults to the platform config dir)
    #[arg(short, long, env = "PGRID_GRID_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog service base URL (overrides the config file)
    #[arg(short, long, env = "PGRID_ENDPOINT")]
    endpoint: Option<String>,

    /// Viewport width to lay out for
    #[arg(short, long, default_value = "1024")]
    width: u32,

    /// Term ids to toggle on, in order
    #[arg(long = "toggle", value_name = "TERM_ID")]
    toggle: Vec<String>,

    /// Filter condition, AND or OR (overrides the config file)
    #[arg(long)]
    cond: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pgrid_demo=info,pgrid_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting PGRID demo v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration, then apply CLI overrides
    let config_path = args
        .config
        .or_else(|| pgrid_common::config::default_config_path("grid.toml"));
    let mut config = match config_path {
        Some(path) => GridConfig::load(&path).context("Failed to load grid config")?,
        None => GridConfig::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(cond) = args.cond {
        config.filter_cond = cond.parse::<FilterCond>()?;
    }

    info!("Catalog endpoint: {}", config.endpoint);

    // Seed the grid from the catalog listings
    let posts = fetch_posts(&config.endpoint, &config.post_type)
        .await
        .context("Failed to list posts; is pgrid-server running?")?;
    let terms = fetch_terms(&config.endpoint, &config.taxonomy)
        .await
        .context("Failed to list terms")?;

    info!("Mounted {} items, {} filter terms", posts.len(), terms.len());
    for term in &terms {
        info!("  term {} = {}", term.id, term.name);
    }

    let items: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let panel = FilterPanel::with_groups(vec![FilterGroup::tags(&terms)]);
    let resolver = Arc::new(HttpResolver::new(config.endpoint.clone())?);

    let handle = GridSession::spawn(config, items, panel, resolver);
    let mut events = handle.subscribe();

    // Initial measurement, then the unfiltered grid
    handle.resize(args.width).await?;
    wait_for_layout(&mut events).await?;
    println!("-- unfiltered --");
    print_grid(&handle.snapshot().await?);

    // Scripted toggles, one resolve each
    for raw in &args.toggle {
        let item = terms
            .iter()
            .position(|t| t.id.to_string() == *raw)
            .with_context(|| format!("No term with id {}", raw))?;
        handle.toggle_tag(0, item).await?;
        wait_for_layout(&mut events).await?;
    }

    if !args.toggle.is_empty() {
        println!("-- filtered: terms {} --", args.toggle.join(","));
        print_grid(&handle.snapshot().await?);
    }

    Ok(())
}

/// Wait until the session publishes its next layout
async fn wait_for_layout(events: &mut broadcast::Receiver<GridEvent>) -> Result<()> {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .context("Timed out waiting for grid event")??;
        match event {
            GridEvent::LayoutUpdated { .. } => return Ok(()),
            GridEvent::ResolveFailed { reason, .. } => {
                anyhow::bail!("Filter resolve failed: {}", reason)
            }
            _ => {}
        }
    }
}

async fn fetch_posts(endpoint: &str, post_type: &str) -> Result<Vec<PostSummary>> {
    let url = format!("{}/v1/posts", endpoint.trim_end_matches('/'));
    let posts = reqwest::Client::new()
        .get(&url)
        .query(&[("post_type", post_type)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(posts)
}

async fn fetch_terms(endpoint: &str, taxonomy: &str) -> Result<Vec<TermSummary>> {
    let url = format!("{}/v1/terms", endpoint.trim_end_matches('/'));
    let terms = reqwest::Client::new()
        .get(&url)
        .query(&[("taxonomy", taxonomy)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(terms)
}

/// Print a snapshot as one character cell per grid position
fn print_grid(snapshot: &GridSnapshot) {
    println!(
        "grid {}x{} width={} filtered={}",
        snapshot.columns, snapshot.rows, snapshot.width, snapshot.filtered
    );

    let cols = snapshot.columns as usize;
    let rows = snapshot.rows as usize;
    let mut cells: Vec<Vec<Option<i64>>> = vec![vec![None; cols]; rows];
    for p in snapshot.items.iter().filter(|p| p.on) {
        if let (Some(x), Some(y)) = (p.x, p.y) {
            if (y as usize) < rows && (x as usize) < cols {
                cells[y as usize][x as usize] = Some(p.id);
            }
        }
    }

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(id) => format!("{:>4}", id),
                None => format!("{:>4}", "."),
            })
            .collect();
        println!("{}", line.join(" "));
    }
}
