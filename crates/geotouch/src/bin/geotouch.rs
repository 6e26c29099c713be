//! geotouch CLI: calibration, region authoring and offline detection.

use clap::{Parser, Subcommand};
use geotouch::core::{estimate_homography, map_corners, warp_frame};
use geotouch::flight::{Gazetteer, TimeoutGeocoder};
use geotouch::imageio::{load_frame, save_frame};
use geotouch::{
    CalibrationStore, FixtureTracker, FlightInfoService, FramePipeline, GeoTouchConfig,
    LoadOutcome, MapTransform, PipelineError, Point2, RegionStore,
};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "geotouch")]
#[command(about = "Calibrate a camera against a map, author regions, and locate fingertips on it")]
#[command(version)]
struct Cli {
    /// JSON config file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Region store path (overrides the config).
    #[arg(long, global = true)]
    regions: Option<PathBuf>,

    /// Calibration file path (overrides the config).
    #[arg(long, global = true)]
    calibration: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON log lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store 4 camera-space corners in the order TL TR BL BR.
    Calibrate {
        /// Corners as `x,y`.
        #[arg(num_args = 4, required = true, value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<Point2<f32>>,

        /// Extra reference correspondence `cx,cy=mx,my` (camera = map) to
        /// check the calibration against.
        #[arg(long = "check", value_parser = parse_correspondence, allow_hyphen_values = true)]
        checks: Vec<(Point2<f32>, Point2<f32>)>,
    },

    /// Append a region (map-space polygon) to the store.
    AddRegion {
        #[arg(long)]
        name: String,

        /// Vertices as `x,y`; at least 3.
        #[arg(required = true, num_args = 1.., value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<Point2<f32>>,
    },

    /// Remove the most recently added region.
    Undo,

    /// Print the stored regions.
    List {
        /// Print the store as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Report which regions contain one or two points.
    Locate {
        /// Points as `x,y`.
        #[arg(required = true, num_args = 1..=2, value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<Point2<f32>>,

        /// Points are camera-space; map them through the calibration first.
        #[arg(long)]
        camera: bool,
    },

    /// Warp a camera image into map space.
    Warp {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },

    /// Run the detection pipeline on one camera image with given fingertips.
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,

        /// Camera-space fingertip `x,y` (repeat for a second hand).
        #[arg(long = "point", value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<Point2<f32>>,

        /// Write the frame report (stages, detections, flight) as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn parse_point(s: &str) -> Result<Point2<f32>, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    let p = Point2::new(parse(x)?, parse(y)?);
    if !(p.x.is_finite() && p.y.is_finite()) {
        return Err(format!("non-finite point {s:?}"));
    }
    Ok(p)
}

fn parse_correspondence(s: &str) -> Result<(Point2<f32>, Point2<f32>), String> {
    let (cam, map) = s
        .split_once('=')
        .ok_or_else(|| format!("expected cx,cy=mx,my, got {s:?}"))?;
    Ok((parse_point(cam)?, parse_point(map)?))
}

fn init_logging(cli: &Cli) {
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        geotouch::core::init_tracing(cli.log_json);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let level = geotouch::core::level_from_verbosity(cli.verbose);
        if let Err(err) = geotouch::core::init_with_level(level) {
            eprintln!("logger already installed: {err}");
        }
    }
}

/// Resolved settings: config file plus command-line overrides.
struct Settings {
    config: GeoTouchConfig,
    regions_path: PathBuf,
    calibration_path: PathBuf,
}

impl Settings {
    fn resolve(cli: &Cli) -> CliResult<Self> {
        let config = match &cli.config {
            Some(path) => GeoTouchConfig::load_json(path)
                .map_err(|e| -> CliError { format!("config {}: {e}", path.display()).into() })?,
            None => GeoTouchConfig::default(),
        };
        Ok(Self {
            regions_path: cli
                .regions
                .clone()
                .unwrap_or_else(|| config.regions_path.clone()),
            calibration_path: cli
                .calibration
                .clone()
                .unwrap_or_else(|| config.calibration_path.clone()),
            config,
        })
    }

    /// Load the region store; refuse to continue on a corrupt file so a
    /// later save does not overwrite it.
    fn load_regions_for_edit(&self) -> CliResult<RegionStore> {
        let (store, outcome) = RegionStore::load_with_outcome(&self.regions_path);
        if let LoadOutcome::Corrupt { reason } = outcome {
            return Err(format!(
                "region file {} is corrupt ({reason}); fix or remove it first",
                self.regions_path.display()
            )
            .into());
        }
        Ok(store)
    }

    fn transform(&self) -> Result<MapTransform, PipelineError> {
        let calibration = CalibrationStore::load(&self.calibration_path);
        let Some(quad) = calibration.quad() else {
            return Err(PipelineError::NotCalibrated {
                got: calibration.len(),
            });
        };
        Ok(MapTransform::from_calibration(&quad, self.config.map_size())?)
    }

    fn flight_service(&self) -> CliResult<Option<FlightInfoService<TimeoutGeocoder<Gazetteer>>>> {
        let Some(path) = &self.config.gazetteer_path else {
            return Ok(None);
        };
        let gazetteer = Gazetteer::load_json(path)?;
        let geocoder = TimeoutGeocoder::new(gazetteer, self.config.lookup_timeout());
        Ok(Some(
            FlightInfoService::new(geocoder).with_retry_after(self.config.lookup_retry()),
        ))
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    let settings = Settings::resolve(&cli)?;

    match cli.command {
        Commands::Calibrate { points, checks } => run_calibrate(&settings, &points, &checks),
        Commands::AddRegion { name, points } => run_add_region(&settings, &name, points),
        Commands::Undo => run_undo(&settings),
        Commands::List { json } => run_list(&settings, json),
        Commands::Locate { points, camera } => run_locate(&settings, &points, camera),
        Commands::Warp { input, output } => run_warp(&settings, &input, &output),
        Commands::Render {
            input,
            output,
            points,
            report,
        } => run_render(&settings, &input, &output, points, report.as_deref()),
    }
}

// ── calibrate ──────────────────────────────────────────────────────────

fn run_calibrate(
    settings: &Settings,
    points: &[Point2<f32>],
    checks: &[(Point2<f32>, Point2<f32>)],
) -> CliResult<()> {
    let map_size = settings.config.map_size();
    let t = MapTransform::from_points(points, map_size)?;

    let mut store = CalibrationStore::new();
    for &p in points {
        store.record_point(p);
    }
    store.persist(&settings.calibration_path)?;
    println!(
        "calibration saved to {} (map {}x{})",
        settings.calibration_path.display(),
        map_size.width,
        map_size.height
    );

    if checks.is_empty() {
        return Ok(());
    }

    let mut worst = 0.0f32;
    for (cam, expected) in checks {
        let got = t.camera_to_map(*cam)?;
        let err = (got - *expected).norm();
        worst = worst.max(err);
        println!(
            "check {:.1},{:.1}: map {:.2},{:.2} (expected {:.2},{:.2}, error {:.2} px)",
            cam.x, cam.y, got.x, got.y, expected.x, expected.y, err
        );
    }

    // least-squares fit over corners and checks, for comparison
    let mut src = points.to_vec();
    let mut dst = map_corners(map_size).to_vec();
    for (cam, map) in checks {
        src.push(*cam);
        dst.push(*map);
    }
    let fit = estimate_homography(&src, &dst)?;
    let rms = (src
        .iter()
        .zip(&dst)
        .map(|(s, d)| (fit.apply(*s) - *d).norm_squared())
        .sum::<f32>()
        / src.len() as f32)
        .sqrt();
    println!("max check error {worst:.2} px, least-squares rms {rms:.2} px");
    Ok(())
}

// ── regions ────────────────────────────────────────────────────────────

fn run_add_region(settings: &Settings, name: &str, points: Vec<Point2<f32>>) -> CliResult<()> {
    let mut store = settings.load_regions_for_edit()?;
    let count = points.len();
    let region = store.add_region(name, points)?;
    println!("added {:?} ({count} vertices)", region.name());
    store.save(&settings.regions_path)?;
    info!(
        "{} region(s) in {}",
        store.len(),
        settings.regions_path.display()
    );
    Ok(())
}

fn run_undo(settings: &Settings) -> CliResult<()> {
    let mut store = settings.load_regions_for_edit()?;
    match store.remove_last() {
        Some(region) => {
            store.save(&settings.regions_path)?;
            println!("removed {:?}", region.name());
        }
        None => println!("no regions to remove"),
    }
    Ok(())
}

fn run_list(settings: &Settings, json: bool) -> CliResult<()> {
    let store = RegionStore::load(&settings.regions_path);
    if json {
        println!("{}", serde_json::to_string_pretty(store.all())?);
        return Ok(());
    }
    if store.is_empty() {
        println!("no regions");
    }
    for (i, region) in store.all().iter().enumerate() {
        println!("{i}\t{}\t{} vertices", region.name(), region.polygon().len());
    }
    Ok(())
}

// ── locate ─────────────────────────────────────────────────────────────

fn run_locate(settings: &Settings, points: &[Point2<f32>], camera: bool) -> CliResult<()> {
    let store = RegionStore::load(&settings.regions_path);
    let transform = if camera {
        Some(settings.transform()?)
    } else {
        None
    };

    let mut matches = Vec::with_capacity(points.len());
    for &p in points {
        let map = match &transform {
            Some(t) => t.camera_to_map(p)?,
            None => p,
        };
        let names: Vec<String> = store.classify(map).into_iter().map(str::to_string).collect();
        let shown = if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        };
        println!("{:.2},{:.2}\t{shown}", map.x, map.y);
        matches.push(names);
    }

    if let [a, b] = matches.as_slice() {
        if let ([from], [to]) = (a.as_slice(), b.as_slice()) {
            if from != to {
                match settings.flight_service()? {
                    Some(mut service) => match service.lookup(from, to) {
                        Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
                        None => println!("no flight info for {from} -> {to}"),
                    },
                    None => warn!("no gazetteer configured, skipping flight info"),
                }
            }
        }
    }
    Ok(())
}

// ── images ─────────────────────────────────────────────────────────────

fn run_warp(settings: &Settings, input: &Path, output: &Path) -> CliResult<()> {
    let t = settings.transform()?;
    let frame = load_frame(input)?;
    let warped = warp_frame(&frame.view(), &t.map_from_camera, t.map_size)?;
    save_frame(warped, output)?;
    println!("wrote {}", output.display());
    Ok(())
}

fn run_render(
    settings: &Settings,
    input: &Path,
    output: &Path,
    points: Vec<Point2<f32>>,
    report_path: Option<&Path>,
) -> CliResult<()> {
    let t = settings.transform()?;
    let store = RegionStore::load(&settings.regions_path);
    let frame = load_frame(input)?;

    let mut pipeline = FramePipeline::new(settings.config.style()).with_transform(t);
    if let Some(service) = settings.flight_service()? {
        pipeline = pipeline.with_flights(service);
    }
    let mut tracker = FixtureTracker::constant(points);
    let report = pipeline.process(&frame.view(), &store, &mut tracker);

    for d in &report.detections {
        let names = if d.regions.is_empty() {
            "-".to_string()
        } else {
            d.regions.join(", ")
        };
        println!("{:.1},{:.1}\t{names}", d.camera[0], d.camera[1]);
    }
    if let Some(path) = report_path {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("report written to {}", path.display());
    }
    save_frame(report.frame, output)?;
    println!("wrote {}", output.display());
    Ok(())
}
