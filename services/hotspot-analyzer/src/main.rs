//! Thermal hotspot analyzer.
//!
//! Fetches the most recent cloud-filtered LST composite around a site (or
//! reads a local `.npy` export), flags anomalous hot pixels and writes an
//! overlay image, an interactive map and a JSON report.

use std::path::PathBuf;
use std::process::ExitCode;

use acquisition::{
    acquire_lst, load_acquisition_config, HttpSceneCatalog, RasterFetcher, SourcePreference,
};
use anomaly::DetectorConfig;
use anyhow::{Context, Result};
use clap::Parser;
use hotspot_analyzer::{analyze, write_outputs, AnalysisReport};
use lst_common::{GeoPoint, LstError, Raster};
use renderer::OverlayStyle;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "hotspot-analyzer")]
#[command(about = "Detect thermal hotspots around a site from recent LST imagery")]
struct Args {
    /// Site latitude in decimal degrees
    #[arg(long, default_value_t = 20.9515, env = "HOTSPOT_LAT", allow_negative_numbers = true)]
    lat: f64,

    /// Site longitude in decimal degrees
    #[arg(long, default_value_t = 85.2157, env = "HOTSPOT_LON", allow_negative_numbers = true)]
    lon: f64,

    /// Analyse a local .npy raster (degrees Celsius) instead of fetching one
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Acquisition configuration file
    #[arg(short, long, default_value = "config/acquisition.yaml", env = "HOTSPOT_CONFIG")]
    config: PathBuf,

    /// Source preference: auto, landsat or sentinel (default from config)
    #[arg(long)]
    prefer: Option<SourcePreference>,

    /// Search radius around the site in meters (default from config)
    #[arg(long)]
    radius_m: Option<f64>,

    /// Recency window in days (default from config)
    #[arg(long)]
    window_days: Option<u32>,

    /// Expected fraction of anomalous pixels
    #[arg(long, default_value_t = 0.05)]
    contamination: f64,

    /// Directory for overlay.png, map.html and report.json
    #[arg(short, long, default_value = "output", env = "HOTSPOT_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    info!(lat = args.lat, lon = args.lon, "Starting hotspot analysis");

    match run(&args).await {
        Ok(report) => {
            println!("{}", report.summary());
            println!("Outputs written to {}", args.output_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "Analysis failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(args: &Args) -> Result<AnalysisReport> {
    let point = GeoPoint::new(args.lat, args.lon)?;

    let (raster, source) = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "Loading local raster");
            let raster = npy_parser::parse_npy_file(path)
                .map_err(LstError::from)
                .with_context(|| format!("Failed to load {:?}", path))?;
            (raster, path.display().to_string())
        }
        None => acquire(args, point).await?,
    };

    let analysis = analyze(
        raster,
        source,
        DetectorConfig::with_contamination(args.contamination),
    )?;

    let (report, paths) =
        write_outputs(&args.output_dir, point, &analysis, &OverlayStyle::default())?;
    info!(
        overlay = %paths.overlay.display(),
        map = %paths.map.display(),
        report = %paths.report.display(),
        "Analysis finished"
    );

    Ok(report)
}

async fn acquire(args: &Args, point: GeoPoint) -> Result<(Raster, String)> {
    let config = load_acquisition_config(&args.config)?;

    let mut query = config.query_for(point);
    if let Some(radius_m) = args.radius_m {
        query.radius_m = radius_m;
    }
    if let Some(window_days) = args.window_days {
        query.window_days = window_days;
    }
    query.validate()?;

    let preference = args.prefer.unwrap_or(config.query.prefer);
    info!(
        gateway = %config.gateway.base_url,
        prefer = %preference,
        radius_m = query.radius_m,
        window_days = query.window_days,
        "Acquiring LST raster"
    );

    let catalog = HttpSceneCatalog::new(config.gateway.base_url.clone(), config.timeout())
        .map_err(LstError::from)?;
    let fetcher = RasterFetcher::new(config.timeout()).map_err(LstError::from)?;

    let acquired = acquire_lst(&catalog, &fetcher, &config, preference, &query)
        .await
        .map_err(LstError::from)?;

    Ok((acquired.raster, acquired.source.to_string()))
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<LstError>()
        .map(|e| e.exit_code() as u8)
        .unwrap_or(1)
}
