//! Path utilities for source enumeration and output naming.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::utils::config::OutputNaming;

/// Output path for the `index`-th written image: `<dest>/grayscale_image<index>.png`.
pub fn output_path(dest: &Path, index: usize) -> PathBuf {
    dest.join(output_filename(index))
}

pub fn output_filename(index: usize) -> String {
    format!(
        "{}{}.{}",
        OutputNaming::STEM,
        index,
        OutputNaming::EXTENSION
    )
}

/// Parse the number back out of an output filename. None for anything else.
pub fn parse_output_index(name: &str) -> Option<usize> {
    name.strip_prefix(OutputNaming::STEM)?
        .strip_suffix(OutputNaming::EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

/// Create the destination directory (and parents) if missing.
pub fn ensure_dest_dir(dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("create destination directory {}", dest.display()))
}
