//! Converter stage: queue A → grayscale → queue B.

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::grayscale::rgb_to_gray;
use crate::error::StageError;
use crate::types::{Channels, ItemLedger, StageOutcome, WorkItem};

use super::context::PipelineContext;

/// Convert an RGB item into a new single-channel item of the same size.
/// The input is only borrowed; the caller releases it.
pub fn to_gray_item(item: &WorkItem, ledger: &Arc<ItemLedger>) -> Result<WorkItem, StageError> {
    let (width, height) = (item.width(), item.height());
    if item.channels() != Channels::Rgb {
        return Err(StageError::Conversion {
            width,
            height,
            reason: format!("expected 3 channels, got {}", item.channels().count()),
        });
    }
    let pixels =
        rgb_to_gray(item.pixels()).map_err(|_| StageError::Allocation { width, height })?;
    let len = pixels.len();
    WorkItem::new(width, height, Channels::Gray, pixels, ledger).ok_or_else(|| {
        StageError::Conversion {
            width,
            height,
            reason: format!("gray buffer has {len} bytes"),
        }
    })
}

/// Receive until queue A is closed and drained, converting each item with `convert`.
/// Each RGB item is released right after its gray copy exists. A per-item failure is
/// recorded and skipped; a fatal one (allocation) ends the stage, and dropping `raw_rx`
/// then makes the loader's next send fail so it stops too.
pub fn run_converter_loop<F>(
    raw_rx: Receiver<WorkItem>,
    gray_tx: Sender<WorkItem>,
    ctx: &PipelineContext,
    convert: F,
) -> StageOutcome
where
    F: Fn(&WorkItem, &Arc<ItemLedger>) -> Result<WorkItem, StageError>,
{
    let mut outcome = StageOutcome::default();
    while let Ok(item) = raw_rx.recv() {
        if ctx.is_cancelled() {
            drop(item);
            outcome.discarded += 1;
            continue;
        }
        match convert(&item, &ctx.ledger) {
            Ok(gray) => {
                drop(item);
                if gray_tx.send(gray).is_err() {
                    debug!("writer hung up, stopping");
                    break;
                }
                outcome.processed += 1;
            }
            Err(err) if err.is_fatal() => {
                error!("{}", err);
                ctx.record(err);
                break;
            }
            Err(err) => {
                warn!("{}", err);
                ctx.record(err);
            }
        }
    }
    // Closes queue B; the writer sees it only after draining what was sent.
    drop(gray_tx);
    debug!(
        "done, {} converted, {} discarded",
        outcome.processed, outcome.discarded
    );
    outcome
}

/// Spawn the converter. Takes ownership of the only `gray_tx`, so queue B closes
/// exactly when this thread returns.
pub fn spawn_converter_thread(
    raw_rx: Receiver<WorkItem>,
    gray_tx: Sender<WorkItem>,
    ctx: PipelineContext,
) -> JoinHandle<StageOutcome> {
    thread::spawn(move || run_converter_loop(raw_rx, gray_tx, &ctx, to_gray_item))
}
