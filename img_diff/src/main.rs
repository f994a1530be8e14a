// Command-line front end for the `img_diff` library.
//
// Decodes two images, compares them, prints a report, and (in batch mode) exits
// with the verdict: 0 when the largest difference is within `--max`, 1 when it is
// not, 2 when something went wrong before a verdict could be reached.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use image::DynamicImage;
use img_diff::core_modules::utils::image_helper;
use img_diff::{DEFAULT_MAX_DIFFERENCE, DiffConfig, DiffPipeline};
use log::{LevelFilter, info, warn};

const ERROR_EXIT_CODE: u8 = 2;

/// Perceptual image difference in the YIQ color space
///
/// Prints `diff=[<min>, <max>]` where min is the smallest non-zero per-pixel
/// difference and max the largest, both normalized to [0, 1].
#[derive(Parser, Debug)]
#[command(name = "img-diff")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXIT CODES:
    0 - Success (max difference within --max in batch mode)
    1 - Max difference exceeded --max (batch mode only)
    2 - Error (file not found, unknown extension, undecodable image)")]
struct Cli {
    /// Enable batch mode: print the one-line report and exit with the verdict
    #[arg(short, long)]
    batch: bool,

    /// Maximum allowed difference in batch mode
    #[arg(
        long = "max",
        value_name = "DIFF",
        default_value_t = DEFAULT_MAX_DIFFERENCE,
        env = "IMG_DIFF_MAX"
    )]
    max: f64,

    /// Save the 16-bit grayscale difference map to this PNG file
    #[arg(short, long, value_name = "FILE")]
    diffmap: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Reference image (.png, .jpg, .jpeg, .gif, .tif, .tiff)
    #[arg(value_name = "IMAGE_A")]
    reference: PathBuf,

    /// Image to compare against the reference
    #[arg(value_name = "IMAGE_B")]
    candidate: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("img-diff: {err:#}");
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let (reference, candidate) =
        futures::try_join!(decode(cli.reference.clone()), decode(cli.candidate.clone()))?;

    let pipeline = DiffPipeline::new(DiffConfig {
        max_difference: cli.max,
    });
    let report = pipeline
        .compare_images(reference, candidate)
        .context("could not normalize input images")?;

    if let Some(path) = &cli.diffmap {
        image_helper::save_difference_map(path, report.difference_map())?;
        info!("difference map written to {}", path.display());
    }

    if cli.json {
        println!("{}", report.to_json().context("could not serialize report")?);
    } else if cli.batch {
        println!("{}", report.summary());
    } else {
        print!("{}", report.details());
    }

    if !cli.batch {
        return Ok(ExitCode::SUCCESS);
    }

    if !report.has_overlap() {
        warn!(
            "{} and {} do not overlap; batch verdict is {}",
            cli.reference.display(),
            cli.candidate.display(),
            report.verdict
        );
    }
    info!(
        "max difference {} against threshold {}: {}",
        report.dmax(),
        report.threshold,
        report.verdict
    );
    Ok(ExitCode::from(report.verdict.exit_code()))
}

/// Decodes one image on the blocking pool.
async fn decode(path: PathBuf) -> Result<DynamicImage> {
    let shown = path.display().to_string();
    let image = tokio::task::spawn_blocking(move || image_helper::load(&path))
        .await
        .with_context(|| format!("decoding task for {shown:?} did not complete"))?
        .with_context(|| format!("could not load image {shown:?}"))?;
    Ok(image)
}
