//! OCR Overlay Viewer - upload an image, scan it, inspect the detections
//!
//! The scan runs in an external service; this program validates the upload,
//! draws the returned bounding boxes over the image and lists them in a
//! sortable table.

mod app;
mod config;
mod dashboard;
mod overlay;
mod shared;
mod storage;
mod table;
mod upload;
mod vision;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::{build_scanner, ScanCoordinator};
use crate::config::AppConfig;
use crate::dashboard::{run_viewer, ViewerApp};
use crate::shared::ViewerState;
use crate::table::{SortDirection, SortField};
use crate::upload::UploadedFile;

/// OCR Overlay Viewer - draw scan results over an uploaded image
#[derive(Parser, Debug)]
#[command(name = "ocr-overlay-viewer")]
#[command(about = "Scan an image with an OCR service and inspect the detections")]
struct Args {
    /// Image to load and scan at startup
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Scan service endpoint (overrides the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Replay a saved scan response instead of calling the service
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Scan `--image` without opening a window and print the table as JSON
    #[arg(long, requires = "image")]
    scan_only: bool,

    /// Column to sort the printed table by (label, minX, maxX, minY, maxY...)
    #[arg(long)]
    sort_by: Option<SortField>,

    /// Sort the printed table in descending order
    #[arg(long)]
    descending: bool,

    /// Alternative configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window title
    #[arg(long, default_value = "OCR Viewer")]
    title: String,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = load_or_create_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let scanner = build_scanner(&config.scan)?;
    let coordinator = ScanCoordinator::new(scanner);

    if args.scan_only {
        let image = args.image.as_deref().context("--scan-only needs --image")?;
        let direction = if args.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let output = scan_to_json(&config, &coordinator, image, args.sort_by, direction)?;
        println!("{}", output);
        return Ok(());
    }

    info!("OCR Overlay Viewer starting...");

    let mut viewer = ViewerApp::new(args.title.clone(), &config, coordinator);
    if let Some(image) = args.image {
        viewer = viewer.with_initial_image(image);
    }

    run_viewer(viewer)?;

    info!("OCR Overlay Viewer shutdown complete");

    Ok(())
}

/// Load configuration from file or create default.
///
/// An explicit path must load. The default location falls back to defaults
/// and writes them out when no file exists yet.
fn load_or_create_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    let config_path = match storage::default_config_path() {
        Ok(path) => path,
        Err(e) => {
            warn!("No config directory ({}), using default configuration", e);
            return Ok(AppConfig::default());
        }
    };

    if config_path.exists() {
        match config::load_config(&config_path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                return Ok(config);
            }
            Err(e) => warn!("Ignoring invalid configuration: {:#}", e),
        }
    } else if let Err(e) = config::save_config(&AppConfig::default(), &config_path) {
        warn!("Could not write default configuration: {:#}", e);
    }

    info!("Using default configuration");
    Ok(AppConfig::default())
}

/// Command-line flags win over file values
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(ref endpoint) = args.endpoint {
        config.scan.endpoint = endpoint.clone();
    }
    if let Some(ref fixture) = args.fixture {
        config.scan.fixture_path = Some(fixture.clone());
    }
}

/// Headless scan: validate, scan, sort and serialize the rows
fn scan_to_json(
    config: &AppConfig,
    coordinator: &ScanCoordinator,
    image: &Path,
    sort_by: Option<SortField>,
    direction: SortDirection,
) -> Result<String> {
    let mut state = ViewerState::new(config);

    let file = UploadedFile::from_path(image, config.upload.max_file_bytes)?;
    let ticket = state.begin_upload(std::slice::from_ref(&file))?;

    info!("Scanning {:?} with {}", image, coordinator.scanner_name());
    coordinator.submit(ticket);
    let outcome = coordinator.recv().context("Scan worker disconnected")?;
    state.apply_outcome(outcome);

    if let Some(message) = state.last_error.take() {
        bail!("Scan failed: {}", message);
    }

    if let Some(field) = sort_by {
        state.table.sort(field, direction);
    }

    serde_json::to_string_pretty(state.table.rows()).context("Failed to serialize table")
}
