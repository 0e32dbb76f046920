//! Graypipe: three-stage concurrent grayscale conversion of an image directory.
//!
//! A loader, a converter and a writer run on their own threads, connected by two
//! channels. Each [`WorkItem`] is owned by exactly one stage at a time and moves through
//! the channels; a stage terminates when its input channel is closed and drained.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::StageError;
pub use types::*;

use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::utils::config::PackagePaths;

/// Result alias used by public graypipe API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Convert every image in `source` to `dest/grayscale_image<N>.png` and return the run report.
///
/// Per-image failures do not make this return `Err`; inspect [`PipelineReport::failures`].
/// `Err` means the run could not start (e.g. `dest` cannot be created).
pub fn grayscale_dir(source: &Path, dest: &Path, opts: &GrayOpts) -> Result<PipelineReport> {
    grayscale_dir_with_cancel(source, dest, opts, Arc::new(AtomicBool::new(false)))
}

/// Same as [`grayscale_dir`], with a caller-owned cancel flag. Setting it makes the
/// loader stop and the other stages discard what is still queued.
pub fn grayscale_dir_with_cancel(
    source: &Path,
    dest: &Path,
    opts: &GrayOpts,
    cancel: Arc<AtomicBool>,
) -> Result<PipelineReport> {
    let opts = opts.to_opts(source.to_path_buf(), dest.to_path_buf());
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );
    pipeline::process_dir(&opts, cancel, None)
}
