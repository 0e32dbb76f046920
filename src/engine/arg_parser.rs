use clap::Parser;
use std::path::PathBuf;

/// Convert every image in a directory to a single-channel grayscale PNG.
#[derive(Clone, Parser)]
#[command(name = "graypipe")]
#[command(about = "Load images from SOURCE, convert them to grayscale, write PNGs to DEST.")]
pub struct Cli {
    /// Directory of input images. Default: `images` (or `source` in .graypipe.toml).
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Output directory, created if missing. Default: `output` (or `dest` in .graypipe.toml).
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Follow symbolic links in SOURCE.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// First N in the `grayscale_image<N>.png` output names.
    #[arg(long, short = 's', value_parser = clap::value_parser!(usize))]
    pub start_index: Option<usize>,

    /// Replace existing output files instead of reporting them as failures.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub overwrite: Option<bool>,

    /// Show a counter of written images.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}
