//! Writer stage: queue B → `grayscale_image<N>.png` in the destination directory.

use crossbeam_channel::Receiver;
use log::{debug, warn};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};

use crate::engine::codec::encode_gray_png;
use crate::engine::progress::ProgressCallback;
use crate::engine::tools::output_path;
use crate::error::StageError;
use crate::types::{StageOutcome, WorkItem};
use crate::utils::tempfiles::{publish_temp, remove_temp, temp_path_for};

use super::context::PipelineContext;

/// Encode `item` to a temp file next to `path`, then move it into place. The temp file
/// is removed on any failure. With `overwrite` unset an existing `path` is an error, also
/// when it appears while the encoder is running.
pub fn persist_item(path: &Path, item: &WorkItem, overwrite: bool) -> Result<(), StageError> {
    let fail = |reason: String| StageError::Persist {
        path: path.to_path_buf(),
        reason,
    };
    if !overwrite && path.exists() {
        return Err(fail("output file already exists".to_string()));
    }
    let temp = temp_path_for(path);
    if let Err(reason) = encode_gray_png(&temp, item) {
        remove_temp(&temp);
        return Err(fail(reason));
    }
    publish_temp(&temp, path, overwrite).map_err(|e| {
        remove_temp(&temp);
        fail(format!("{e:#}"))
    })
}

/// Receive until queue B is closed and drained. Every item gets the next output number,
/// is persisted once (no retry), and is released whether or not the write succeeded.
fn writer_loop(
    gray_rx: Receiver<WorkItem>,
    ctx: PipelineContext,
    on_written: Option<ProgressCallback>,
) -> StageOutcome {
    let mut outcome = StageOutcome::default();
    while let Ok(item) = gray_rx.recv() {
        if ctx.is_cancelled() {
            drop(item);
            outcome.discarded += 1;
            continue;
        }
        let index = ctx.next_index.fetch_add(1, Ordering::Relaxed);
        let path = output_path(&ctx.dest, index);
        match persist_item(&path, &item, ctx.overwrite) {
            Ok(()) => {
                debug!("saved {}", path.display());
                outcome.processed += 1;
                if let Some(ref cb) = on_written {
                    cb(1);
                }
            }
            Err(err) => {
                warn!("{}", err);
                ctx.record(err);
            }
        }
        drop(item);
    }
    debug!(
        "done, {} written, {} discarded",
        outcome.processed, outcome.discarded
    );
    outcome
}

pub fn spawn_writer_thread(
    gray_rx: Receiver<WorkItem>,
    ctx: PipelineContext,
    on_written: Option<ProgressCallback>,
) -> JoinHandle<StageOutcome> {
    thread::spawn(move || writer_loop(gray_rx, ctx, on_written))
}
