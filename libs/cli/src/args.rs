//! Command line arguments and their mapping onto [`ConversionConfig`].

use std::path::{Path, PathBuf};

use clap::Parser;
use config::constants::{DEFAULT_MODEL_NAME, DEFAULT_THICKNESS_MM, DEFAULT_THRESHOLD};
use config::ConversionConfig;

/// Convert a raster image into an extruded binary STL model.
///
/// Dark pixels become solid columns, light and transparent pixels become
/// empty space.
#[derive(Debug, Parser)]
#[command(name = "img2stl")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Image to convert (PNG, JPEG, GIF, BMP or WebP)
    #[arg(name = "INPUT")]
    pub input: PathBuf,

    /// Output STL path [default: INPUT with a .stl extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extrusion depth in millimeters
    #[arg(long, default_value_t = DEFAULT_THICKNESS_MM)]
    pub thickness: f64,

    /// Gray level below which a pixel counts as ink (0-255)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,

    /// Physical model width in millimeters
    #[arg(long)]
    pub width_mm: Option<f64>,

    /// Physical model height in millimeters (ignored when --width-mm is set)
    #[arg(long)]
    pub height_mm: Option<f64>,

    /// Downsample so the longest side has at most this many cells
    #[arg(long)]
    pub max_px: Option<u32>,

    /// Aim for an output of roughly this many megabytes
    #[arg(long)]
    pub target_size_mb: Option<f64>,

    /// Model name stored in the STL header
    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    pub name: String,

    /// Extrude rows on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Read the written file back and check its triangle count
    #[arg(long)]
    pub verify: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the conversion options from the flags.
    pub fn config(&self) -> ConversionConfig {
        ConversionConfig {
            thickness: self.thickness,
            threshold: self.threshold,
            width_mm: self.width_mm,
            height_mm: self.height_mm,
            max_px: self.max_px,
            target_size_mb: self.target_size_mb,
            name: self.name.clone(),
            parallel: self.parallel,
        }
    }

    /// Where the STL goes.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output(&self.input))
    }
}

/// `INPUT` with its extension replaced by `.stl`.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("stl")
}
