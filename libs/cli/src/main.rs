//! `img2stl` - turn a logo, sketch or photo into a printable relief.
//!
//! Decodes the image, runs the conversion pipeline and writes a binary STL
//! next to the input (or to `-o`). The summary goes to stdout; diagnostics go
//! through `log` and are shown with `-v` or `RUST_LOG`.

mod args;
mod decode;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use img2stl::{convert, read_binary_stl, Conversion, ConversionReport};

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let output = cli.output_path();

    let pixels = decode::load_pixels(&cli.input)?;
    // the whole file is built in memory so a failed conversion leaves nothing on disk
    let conversion = convert(&pixels, &config)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    fs::write(&output, &conversion.stl)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("wrote {}", output.display());

    if cli.verify {
        verify(&output, &conversion)?;
    }

    println!("{}", summary(&conversion.report));
    Ok(())
}

/// Re-reads the written file and checks it against the in-memory result.
fn verify(path: &Path, conversion: &Conversion) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read back {}", path.display()))?;
    let model = read_binary_stl(&bytes)
        .with_context(|| format!("{} is not a valid binary STL", path.display()))?;
    if model.triangle_count() != conversion.report.triangle_count {
        bail!(
            "{} holds {} triangles, expected {}",
            path.display(),
            model.triangle_count(),
            conversion.report.triangle_count
        );
    }
    log::info!("verified {} triangles", model.triangle_count());
    Ok(())
}

fn summary(report: &ConversionReport) -> String {
    let mut lines = vec![
        format!(
            "size:      {:.2} x {:.2} x {:.2} mm",
            report.width_mm, report.height_mm, report.thickness_mm
        ),
        format!("scale:     {:.4} mm/pixel", report.scale_mm_per_pixel),
        format!("triangles: {}", report.triangle_count),
        format!(
            "bytes:     {} ({:.2} MB)",
            report.byte_len,
            report.byte_len as f64 / config::constants::BYTES_PER_MEGABYTE
        ),
    ];
    if report.resampled {
        lines.push(format!(
            "resampled: {}x{} -> {}x{} cells",
            report.image_width, report.image_height, report.mask_width, report.mask_height
        ));
    }
    lines.join("\n")
}
