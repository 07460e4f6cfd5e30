use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use bd17_core::detection::face_detection::Detection;
use bd17_core::imaging::image_file_reader::{read_frame, ColorMode};
use bd17_core::imaging::overlay_writer::write_overlay;
use bd17_core::native::infrastructure::library_locator::LibraryLocator;
use bd17_core::native::infrastructure::native_library;
use bd17_core::shared::constants::{DEFAULT_MAX_DETECTIONS, IMAGE_EXTENSIONS};
use bd17_core::Detector;

/// Face detection on images with the brodmann17 native library.
#[derive(Parser, Debug)]
#[command(name = "bd17-detect")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Write a copy of the input with detections outlined.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Detector orientation in degrees: 0, 90, 180 or 270.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    rotate: i32,

    /// Capacity of the detection buffer.
    #[arg(long, default_value_t = DEFAULT_MAX_DETECTIONS)]
    max_detections: usize,

    /// Run detection on the grayscale image instead of BGR.
    #[arg(long)]
    gray: bool,

    /// Print detections as JSON.
    #[arg(long)]
    json: bool,

    /// Directory whose `../lib/<arch>/` holds the native library.
    #[arg(long)]
    install_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut locator = LibraryLocator::from_env();
    if let Some(dir) = &cli.install_dir {
        locator = locator.with_install_dir(dir);
    }
    let library = native_library::global_with(&locator)?;
    log::info!("Using native library {}", library.path().display());

    let mode = if cli.gray {
        ColorMode::Gray
    } else {
        ColorMode::Bgr
    };
    let frame = read_frame(&cli.input, mode)?;

    let mut detector = Detector::create_with(library)?;
    if cli.rotate != 0 {
        detector.rotate(cli.rotate)?;
    }
    let detections = detector.detect_with_limit(frame.as_image_buffer(), cli.max_detections)?;
    detector.release()?;

    log::info!(
        "Found {} faces in {}",
        detections.len(),
        cli.input.display()
    );
    print_detections(&detections, cli.json)?;

    if let Some(output) = &cli.output {
        write_overlay(output, &frame, &detections)?;
        log::info!("Output written to {}", output.display());
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Input must be an image ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.input.display()
        )
        .into());
    }
    if let Some(output) = &cli.output {
        if !is_image(output) {
            return Err(format!("Unsupported output format: {}", output.display()).into());
        }
    }
    if cli.max_detections == 0 {
        return Err("Max detections must be a positive integer".into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn print_detections(
    detections: &[Detection],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(detections)?);
    } else {
        for d in detections {
            println!("{}", format_detection(d));
        }
    }
    Ok(())
}

fn format_detection(d: &Detection) -> String {
    format!(
        "{:.1} {:.1} {:.1} {:.1} {:.4}",
        d.x, d.y, d.w, d.h, d.confidence
    )
}
