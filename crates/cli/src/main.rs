//! burntrace CLI - NDVI change detection for burn-scar mapping

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use burntrace_algorithms::imagery::{
    change_mask, classify_change, difference, nbr, ndvi, ChangeClassParams, MASK_CHANGED,
};
use burntrace_core::io::{read_geotiff, write_geotiff, GeoTiffOptions};
use burntrace_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "burntrace")]
#[command(author, version, about = "NDVI change detection for burn-scar mapping", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Compute NDVI from NIR and red bands
    Ndvi {
        /// Near-infrared band file
        nir: PathBuf,
        /// Red band file
        red: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// Compute NBR (Normalized Burn Ratio) from NIR and SWIR bands
    Nbr {
        /// Near-infrared band file
        nir: PathBuf,
        /// Shortwave infrared band file
        swir: PathBuf,
        /// Output file
        output: PathBuf,
    },
    /// Difference two index rasters (after - before) into a severity raster
    Diff {
        /// Index raster at the earlier date
        before: PathBuf,
        /// Index raster at the later date
        after: PathBuf,
        /// Output severity file
        output: PathBuf,
    },
    /// Threshold a severity raster into a binary change mask
    Mask {
        /// Severity raster from `diff`
        severity: PathBuf,
        /// Output mask file
        output: PathBuf,
        /// Pixels with severity below this value are marked changed
        #[arg(short, long, allow_hyphen_values = true)]
        threshold: f64,
    },
    /// Classify a severity raster into decrease / no change / increase
    Classify {
        /// Severity raster from `diff`
        severity: PathBuf,
        /// Output class file
        output: PathBuf,
        /// Threshold for significant decrease
        #[arg(short, long, default_value = "-0.1", allow_hyphen_values = true)]
        decrease: f64,
        /// Threshold for significant increase
        #[arg(short, long, default_value = "0.1", allow_hyphen_values = true)]
        increase: f64,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_band(path: &PathBuf) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn write_result(raster: &Raster<f64>, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn write_result_u8(raster: &Raster<u8>, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let raster = read_band(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len() as f64
            );
        }

        Commands::Ndvi { nir, red, output } => {
            let nir_r = read_band(&nir)?;
            let red_r = read_band(&red)?;
            let start = Instant::now();
            let result = ndvi(&nir_r, &red_r).context("Failed to calculate NDVI")?;
            let elapsed = start.elapsed();
            write_result(&result, &output)?;
            done("NDVI", &output, elapsed);
        }

        Commands::Nbr { nir, swir, output } => {
            let nir_r = read_band(&nir)?;
            let swir_r = read_band(&swir)?;
            let start = Instant::now();
            let result = nbr(&nir_r, &swir_r).context("Failed to calculate NBR")?;
            let elapsed = start.elapsed();
            write_result(&result, &output)?;
            done("NBR", &output, elapsed);
        }

        Commands::Diff {
            before,
            after,
            output,
        } => {
            let before_r = read_band(&before)?;
            let after_r = read_band(&after)?;
            let start = Instant::now();
            let result =
                difference(&before_r, &after_r).context("Failed to difference rasters")?;
            let elapsed = start.elapsed();
            write_result(&result, &output)?;
            done("Severity", &output, elapsed);
        }

        Commands::Mask {
            severity,
            output,
            threshold,
        } => {
            let severity_r = read_band(&severity)?;
            let start = Instant::now();
            let result =
                change_mask(&severity_r, threshold).context("Failed to compute change mask")?;
            let elapsed = start.elapsed();

            let changed = result.data().iter().filter(|&&v| v == MASK_CHANGED).count();
            info!(
                "Changed pixels: {} of {} ({:.1}%)",
                changed,
                result.len(),
                100.0 * changed as f64 / result.len() as f64
            );

            write_result_u8(&result, &output)?;
            done("Change mask", &output, elapsed);
        }

        Commands::Classify {
            severity,
            output,
            decrease,
            increase,
        } => {
            let severity_r = read_band(&severity)?;
            let start = Instant::now();
            let result = classify_change(
                &severity_r,
                ChangeClassParams {
                    decrease_threshold: decrease,
                    increase_threshold: increase,
                },
            )
            .context("Failed to classify change")?;
            let elapsed = start.elapsed();
            write_result_u8(&result, &output)?;
            done("Change classes", &output, elapsed);
        }
    }

    Ok(())
}
