//! Public and internal types for the graypipe API and pipeline.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::StageError;

/// Interleaved channel layout of a [`WorkItem`] buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Channels {
    /// 3 bytes per pixel (R, G, B). Produced by the loader.
    Rgb,
    /// 1 byte per pixel. Produced by the converter.
    Gray,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Gray => 1,
        }
    }
}

/// Created/released counters shared by every stage of one run.
///
/// Each [`WorkItem`] bumps `created` when built and `released` when dropped, so after
/// all stage threads are joined the two must match.
#[derive(Debug, Default)]
pub struct ItemLedger {
    created: AtomicUsize,
    released: AtomicUsize,
}

impl ItemLedger {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Items created but not yet released.
    pub fn in_flight(&self) -> usize {
        self.created().saturating_sub(self.released())
    }
}

/// Proof of ownership registered in an [`ItemLedger`]; releases on drop.
#[derive(Debug)]
struct LedgerToken(Arc<ItemLedger>);

impl LedgerToken {
    fn issue(ledger: &Arc<ItemLedger>) -> Self {
        ledger.created.fetch_add(1, Ordering::SeqCst);
        LedgerToken(Arc::clone(ledger))
    }
}

impl Drop for LedgerToken {
    fn drop(&mut self) {
        self.0.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// One raster buffer in flight between stages.
///
/// Move-only: sending it on a channel hands the buffer to the receiving stage, and
/// dropping it is the release.
#[derive(Debug)]
pub struct WorkItem {
    width: u32,
    height: u32,
    channels: Channels,
    pixels: Vec<u8>,
    _token: LedgerToken,
}

impl WorkItem {
    /// Build an item from an owned buffer. Returns `None` when a dimension is zero or
    /// the buffer length is not `width * height * channels`.
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        pixels: Vec<u8>,
        ledger: &Arc<ItemLedger>,
    ) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(channels.count())?;
        if pixels.len() != expected {
            return None;
        }
        Some(WorkItem {
            width,
            height,
            channels,
            pixels,
            _token: LedgerToken::issue(ledger),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Lib-only options for [`grayscale_dir`](crate::grayscale_dir). Source and destination are passed separately.
#[derive(Clone, Debug, Default)]
pub struct GrayOpts {
    /// Follow symbolic links in the source directory (otherwise symlinks are skipped).
    pub follow_links: bool,
    /// First number used in `grayscale_image<N>.png`.
    pub start_index: usize,
    /// Replace existing output files. When false an existing file is a persist failure.
    pub overwrite: bool,
}

impl GrayOpts {
    /// Full options for a run from `source` into `dest`.
    pub fn to_opts(&self, source: PathBuf, dest: PathBuf) -> Opts {
        Opts {
            source,
            dest,
            follow_links: self.follow_links,
            start_index: self.start_index,
            overwrite: self.overwrite,
            ..Opts::default()
        }
    }
}

/// Full options (CLI and lib). Use [`GrayOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Directory of input images (depth 1, regular files only).
    pub source: PathBuf,
    /// Directory that receives the single-channel PNGs. Created if missing.
    pub dest: PathBuf,
    /// Debug-level logging and per-failure listing in the summary.
    pub verbose: bool,
    /// Follow symbolic links in the source directory.
    pub follow_links: bool,
    /// First output number.
    pub start_index: usize,
    /// Replace existing output files.
    pub overwrite: bool,
    /// Show a counter of written images.
    pub progress: bool,
    /// Print the final report as JSON on stdout.
    pub json: bool,
}

/// Counts for one stage, returned by its thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    /// Items the stage finished (loaded, converted, or written).
    pub processed: usize,
    /// Items dropped unprocessed after cancellation.
    pub discarded: usize,
}

/// Aggregate result of one pipeline run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PipelineReport {
    pub loaded: usize,
    pub converted: usize,
    pub written: usize,
    pub discarded: usize,
    pub items_created: usize,
    pub items_released: usize,
    pub cancelled: bool,
    pub failures: Vec<StageError>,
}

impl PipelineReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when nothing failed and the run was not cancelled.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}
