//! ela - Error Level Analysis
//!
//! Recompresses a JPEG at a known quality and writes the amplified
//! difference, which highlights regions edited after the last save.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use elacrop_cli::commands::ElaCommand;
use elacrop_cli::config::Config;
use elacrop_cli::io::{load_image, save_png, write_bytes};
use elacrop_cli::logging;
use elacrop_core::ela::{ElaOutput, ElaParams, ElaSession, MAX_PARAM};
use elacrop_core::AmplifyMode;

#[derive(Parser)]
#[command(name = "ela")]
#[command(version, about = "Error Level Analysis of a JPEG image")]
#[command(long_about = "
Recompresses the input at --quality and writes |original - recompressed|
multiplied by --scale. Regions edited after the last save tend to show up
brighter than their surroundings.

Examples:
  ela photo.jpg                          # scale 15, quality 75
  ela photo.jpg --scale 40 -o ela.png
  ela photo.jpg --interactive            # scale N / quality N / q
")]
struct Cli {
    /// Input image
    input: PathBuf,

    /// Amplification of the difference (0-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=MAX_PARAM as i64))]
    scale: Option<u8>,

    /// JPEG quality used for recompression (0-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=MAX_PARAM as i64))]
    quality: Option<u8>,

    /// Output PNG file
    #[arg(short, long, default_value = "ela.png")]
    output: PathBuf,

    /// Let amplified values wrap around instead of clamping at 255
    #[arg(long)]
    wrap: bool,

    /// Also write the recompressed JPEG
    #[arg(long, value_name = "FILE")]
    save_recompressed: Option<PathBuf>,

    /// Read slider changes from stdin
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

    let params = ElaParams::new(
        cli.scale.unwrap_or(config.ela.scale),
        cli.quality.unwrap_or(config.ela.quality),
    )?;
    let mode = if cli.wrap {
        AmplifyMode::Wrap
    } else {
        config.ela.mode()
    };

    let source = load_image(&cli.input)?;
    let mut session = ElaSession::new(source, params, mode)?;

    let output = session.render().context("Error level analysis failed")?;
    write_output(&cli, &output)?;

    if !cli.interactive {
        return Ok(());
    }

    println!("Commands: scale N | quality N | q");
    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let result = match ElaCommand::parse(&line) {
            Ok(ElaCommand::Quit) => break,
            Ok(ElaCommand::Scale(value)) => session.set_scale(value),
            Ok(ElaCommand::Quality(value)) => session.set_quality(value),
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        match result {
            Ok(output) => write_output(&cli, &output)?,
            // Out-of-range sliders keep the previous state.
            Err(err @ elacrop_core::ElaError::ParamOutOfRange { .. }) => println!("{}", err),
            Err(err) => return Err(err).context("Error level analysis failed"),
        }
    }
    Ok(())
}

fn write_output(cli: &Cli, output: &ElaOutput) -> Result<()> {
    save_png(&cli.output, &output.image)?;
    if let Some(path) = &cli.save_recompressed {
        write_bytes(path, &output.recompressed_jpeg)?;
    }
    report(&cli.output, output);
    Ok(())
}

fn report(path: &Path, output: &ElaOutput) {
    println!(
        "{}: max difference {}, mean {:.3}",
        path.display(),
        output.stats.max_difference,
        output.stats.mean_difference
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_come_from_config() {
        let cli = Cli::try_parse_from(["ela", "in.jpg"]).unwrap();
        assert_eq!(cli.scale, None);
        assert_eq!(cli.quality, None);
        assert_eq!(cli.output, PathBuf::from("ela.png"));
        assert!(!cli.wrap);
    }

    #[test]
    fn test_slider_range() {
        assert!(Cli::try_parse_from(["ela", "in.jpg", "--scale", "100"]).is_ok());
        assert!(Cli::try_parse_from(["ela", "in.jpg", "--scale", "101"]).is_err());
        assert!(Cli::try_parse_from(["ela", "in.jpg", "--quality", "0"]).is_ok());
    }
}
