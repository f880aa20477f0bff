//! rotate-crop - rotate an image and cut out the largest border-free area
//!
//! Writes the original, rotated and cropped surfaces as PNG files.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use elacrop_cli::commands::DemoCommand;
use elacrop_cli::config::Config;
use elacrop_cli::io::{load_image, save_png};
use elacrop_cli::logging;
use elacrop_cli::sink::DirectorySink;
use elacrop_core::sweep::{rotate_and_crop, run_sweep, AngleSweep};
use elacrop_core::{DecodedImage, InterpolationFilter};

#[derive(Parser)]
#[command(name = "rotate-crop")]
#[command(version, about = "Rotate an image and crop the largest inscribed rectangle")]
#[command(long_about = "
Rotates an image about its center onto a canvas large enough to hold it,
then crops the largest axis-aligned rectangle that contains no border.

Examples:
  rotate-crop photo.jpg --angle 30              # One frame
  rotate-crop photo.jpg --every 60              # Full turn, every 30 degrees
  rotate-crop photo.jpg --start -45 --end 45 --step 5
  rotate-crop photo.jpg --interactive           # s = start, q = quit
")]
struct Cli {
    /// Input image
    input: PathBuf,

    /// Directory for the output PNG files
    #[arg(short, long, default_value = "rotate-crop-out")]
    out_dir: PathBuf,

    /// Render a single angle (degrees, counter-clockwise)
    #[arg(short, long, allow_hyphen_values = true)]
    angle: Option<f64>,

    /// First angle of the sweep
    #[arg(long, allow_hyphen_values = true)]
    start: Option<f64>,

    /// End of the sweep (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    end: Option<f64>,

    /// Degrees between frames
    #[arg(long)]
    step: Option<f64>,

    /// Save every Nth frame of the sweep
    #[arg(short, long)]
    every: Option<usize>,

    /// Nearest-neighbour sampling instead of bilinear
    #[arg(long)]
    nearest: bool,

    /// Wait for [s] / [q] on stdin
    #[arg(short, long)]
    interactive: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("Warning: {:#}", err);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let image = load_image(&cli.input)?;

    let filter = if cli.nearest {
        InterpolationFilter::Nearest
    } else {
        InterpolationFilter::Bilinear
    };

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Failed to create: {}", cli.out_dir.display()))?;

    if let Some(angle) = cli.angle {
        return single_frame(&image, angle, filter, &cli.out_dir);
    }

    let sweep = AngleSweep::new(
        cli.start.unwrap_or(config.sweep.start),
        cli.end.unwrap_or(config.sweep.end),
        cli.step.unwrap_or(config.sweep.step),
    );
    if sweep.is_empty() {
        bail!(
            "Sweep from {} to {} in steps of {} has no frames",
            sweep.start,
            sweep.end,
            sweep.step
        );
    }
    let every = cli.every.unwrap_or(config.sweep.every);

    if cli.interactive {
        interactive(&image, &sweep, filter, &cli.out_dir, every)
    } else {
        sweep_once(&image, &sweep, filter, &cli.out_dir, every)
    }
}

fn single_frame(
    image: &DecodedImage,
    angle: f64,
    filter: InterpolationFilter,
    out_dir: &Path,
) -> Result<()> {
    let frame = rotate_and_crop(image, angle, filter).context("Rotate-crop failed")?;

    save_png(&out_dir.join("rotated.png"), &frame.rotated)?;
    save_png(&out_dir.join("cropped.png"), &frame.cropped)?;

    tracing::info!(
        angle,
        rotated = %format!("{}x{}", frame.rotated.width, frame.rotated.height),
        cropped = %format!("{}x{}", frame.cropped.width, frame.cropped.height),
        "saved frame"
    );
    Ok(())
}

fn sweep_once(
    image: &DecodedImage,
    sweep: &AngleSweep,
    filter: InterpolationFilter,
    out_dir: &Path,
    every: usize,
) -> Result<()> {
    let mut sink = DirectorySink::new(out_dir, every);
    tracing::info!(frames = sweep.len(), dir = %sink.dir().display(), "starting sweep");

    run_sweep(image, sweep, filter, &mut sink).context("Rotate-crop failed")?;
    let saved = sink.finish()?;

    tracing::info!(saved, "sweep complete");
    Ok(())
}

/// Prompt loop. The sweep runs to completion once started; `q` is read
/// between sweeps.
fn interactive(
    image: &DecodedImage,
    sweep: &AngleSweep,
    filter: InterpolationFilter,
    out_dir: &Path,
    every: usize,
) -> Result<()> {
    println!("Press [s] to begin or restart the demo");
    println!("Press [q] to quit");

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        match DemoCommand::parse(&line) {
            Some(DemoCommand::Start) => sweep_once(image, sweep, filter, out_dir, every)?,
            Some(DemoCommand::Quit) => break,
            None => tracing::debug!(input = %line.trim(), "ignored key"),
        }
    }
    Ok(())
}
