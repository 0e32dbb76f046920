//! Loader stage: enumerate regular files in the source directory, decode each to RGB and
//! push it to queue A.

use crossbeam_channel::Sender;
use log::{debug, error, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use crate::engine::codec::decode_rgb;
use crate::error::StageError;
use crate::types::{Channels, ItemLedger, StageOutcome, WorkItem};

use super::context::PipelineContext;

/// One result from enumerating the source directory.
pub enum WalkOutcome {
    /// A regular file to decode.
    File(PathBuf),
    /// Directory, symlink, or other non-regular entry.
    Skipped(PathBuf),
    /// `fatal` is set when the source directory itself could not be opened.
    Err {
        msg: String,
        path: Option<PathBuf>,
        fatal: bool,
    },
}

/// Convert a walkdir result into [`WalkOutcome`]. Errors at depth 0 concern the root.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(entry) => WalkOutcome::Skipped(entry.into_path()),
        Err(err) => WalkOutcome::Err {
            msg: err
                .io_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| err.to_string()),
            path: err.path().map(PathBuf::from),
            fatal: err.depth() == 0,
        },
    }
}

fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    Box::new(
        WalkDir::new(&ctx.source)
            .min_depth(1)
            .max_depth(1)
            .follow_links(ctx.follow_links)
            .into_iter()
            .map(to_outcome_walkdir),
    )
}

/// Decode one file into an RGB [`WorkItem`] registered in `ledger`.
pub fn load_item(path: &Path, ledger: &Arc<ItemLedger>) -> Result<WorkItem, StageError> {
    let raster = decode_rgb(path).map_err(|reason| StageError::Decode {
        path: path.to_path_buf(),
        reason,
    })?;
    let (width, height) = (raster.width, raster.height);
    WorkItem::new(width, height, Channels::Rgb, raster.pixels, ledger).ok_or_else(|| {
        StageError::Decode {
            path: path.to_path_buf(),
            reason: format!("invalid raster dimensions {width}x{height}"),
        }
    })
}

/// Spawn the loader. A missing source directory is recorded as fatal and yields no items;
/// either way `raw_tx` is dropped when the thread returns.
pub fn spawn_loader_thread(
    raw_tx: Sender<WorkItem>,
    ctx: PipelineContext,
) -> JoinHandle<StageOutcome> {
    thread::spawn(move || {
        if !ctx.source.is_dir() {
            let err = StageError::DirectoryOpen {
                path: ctx.source.clone(),
                reason: "not a directory or does not exist".to_string(),
            };
            error!("{}", err);
            ctx.record(err);
            return StageOutcome::default();
        }
        let iter = walkdir_iter(&ctx);
        run_loader_loop(raw_tx, &ctx, iter)
    })
}

/// Run the loader loop: consume `iter` of [`WalkOutcome`], decode regular files and send
/// them on `raw_tx`. Decode failures are recorded and skipped; a fatal walk error or a
/// cancel request stops the loop. `raw_tx` is dropped on return, which closes queue A.
pub fn run_loader_loop<I>(
    raw_tx: Sender<WorkItem>,
    ctx: &PipelineContext,
    iter: I,
) -> StageOutcome
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut outcome = StageOutcome::default();
    for walked in iter {
        if ctx.is_cancelled() {
            debug!("cancel requested, stopping enumeration");
            break;
        }
        match walked {
            WalkOutcome::File(path) => {
                match load_item(&path, &ctx.ledger) {
                    Ok(item) => {
                        debug!(
                            "{} ({}x{})",
                            path.display(),
                            item.width(),
                            item.height()
                        );
                        // A send error hands the item back and drops it: the converter is gone.
                        if raw_tx.send(item).is_err() {
                            debug!("converter hung up, stopping");
                            break;
                        }
                        outcome.processed += 1;
                    }
                    Err(err) => {
                        warn!("{}", err);
                        ctx.record(err);
                    }
                }
            }
            WalkOutcome::Skipped(path) => {
                debug!("skipping non-regular entry {}", path.display());
            }
            WalkOutcome::Err { msg, path, fatal } => {
                let path = path.unwrap_or_else(|| ctx.source.clone());
                if fatal {
                    let err = StageError::DirectoryOpen { path, reason: msg };
                    error!("{}", err);
                    ctx.record(err);
                    break;
                }
                let err = StageError::Decode { path, reason: msg };
                warn!("{}", err);
                ctx.record(err);
            }
        }
    }
    drop(raw_tx);
    debug!("done, {} images queued", outcome.processed);
    outcome
}
