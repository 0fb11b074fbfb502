use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod export;
mod slicing;

use config::Config;
use error::SliceError;
use export::{EdgePolicy, ExportReport, ExportedSlice, Exporter};
use slicing::{Pipeline, SliceResult};

#[derive(Parser, Debug)]
#[command(name = "page-slicer")]
#[command(about = "Cut a tall screenshot into sections along blank bands")]
#[command(version)]
pub struct Args {
    /// Input image file path
    #[arg(
        long = "input_file",
        alias = "input-file",
        env = "SLICER_INPUT_FILE",
        default_value = "sample.png"
    )]
    pub input_file: PathBuf,

    /// Output folder path
    #[arg(
        long = "output_path",
        alias = "output-path",
        env = "SLICER_OUTPUT_PATH",
        default_value = "save"
    )]
    pub output_path: PathBuf,

    /// Minimum height of a blank band, in rows, that separates two sections
    #[arg(
        long = "minimum_white",
        alias = "minimum-white",
        env = "SLICER_MINIMUM_WHITE",
        default_value = "30",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub minimum_white: u32,

    /// How the 1px padding is handled at the top and bottom of the image
    #[arg(long, env = "SLICER_EDGE", value_enum, default_value_t = EdgePolicy::Clamp)]
    pub edge: EdgePolicy,

    /// Compute the sections without writing any files
    #[arg(long)]
    pub dry_run: bool,

    /// Print a JSON summary instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

/// Machine-readable run summary
#[derive(Serialize)]
struct Summary<'a> {
    input: &'a Path,
    width: u32,
    height: u32,
    minimum_white: usize,
    edge: EdgePolicy,
    dry_run: bool,
    #[serde(flatten)]
    slicing: &'a SliceResult,
    slices: &'a [ExportedSlice],
    count: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from(args);
    tracing::info!("Starting page-slicer v{}", env!("CARGO_PKG_VERSION"));

    run(&config)
}

/// Decode an image, picking the format from its contents rather than its extension
fn load_image(path: &Path) -> Result<DynamicImage, SliceError> {
    let open_err = |e: std::io::Error| SliceError::from_open(path, image::ImageError::IoError(e));
    image::ImageReader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?
        .decode()
        .map_err(|e| SliceError::from_open(path, e))
}

fn run(config: &Config) -> anyhow::Result<()> {
    let image = load_image(&config.input_file)?;
    tracing::info!(
        path = %config.input_file.display(),
        width = image.width(),
        height = image.height(),
        "loaded input"
    );

    let pipeline = Pipeline::new(config.minimum_white);
    let result = pipeline
        .process(&image)
        .with_context(|| format!("slicing {}", config.input_file.display()))?;
    tracing::info!(
        ranges = result.ranges.len(),
        blank_rows = result.blank_rows,
        blank_rows_smoothed = result.blank_rows_smoothed,
        time_ms = result.total_time_ms,
        "computed sections"
    );

    let report = if config.dry_run {
        ExportReport::default()
    } else {
        let exporter = Exporter::new(&config.output_path, config.edge);
        if exporter.prepare()? && !config.json {
            println!("mkdir {}", exporter.output_dir().display());
        }
        exporter.export(&image, &result.ranges)?
    };

    if config.json {
        let summary = Summary {
            input: &config.input_file,
            width: image.width(),
            height: result.rows,
            minimum_white: pipeline.min_true_run(),
            edge: config.edge,
            dry_run: config.dry_run,
            slicing: &result,
            slices: &report.slices,
            count: report.count(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if config.dry_run {
        for (i, range) in result.ranges.iter().enumerate() {
            println!("{} rows {}..={}", export::slice_file_name(i), range.start, range.end);
        }
        println!("Dry run: {} images", result.ranges.len());
    } else {
        println!("Cropping finished: {} images", report.count());
    }

    Ok(())
}
