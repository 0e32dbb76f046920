//! Pipeline context: shared coordination state handed to each stage thread, plus the
//! two queues between the stages.

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::Opts;
use crate::error::StageError;
use crate::types::{ItemLedger, StageOutcome, WorkItem};

/// Shared context for one run. Cloned into every stage thread; all mutable state is
/// behind `Arc` so the clones observe the same ledger, failures, counter, and cancel flag.
#[derive(Clone)]
pub struct PipelineContext {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub follow_links: bool,
    pub overwrite: bool,
    pub cancel: Arc<AtomicBool>,
    pub ledger: Arc<ItemLedger>,
    pub failures: Arc<Mutex<Vec<StageError>>>,
    /// Next output number. Only the writer increments it.
    pub next_index: Arc<AtomicUsize>,
}

impl PipelineContext {
    pub fn new(opts: &Opts, cancel: Arc<AtomicBool>) -> Self {
        PipelineContext {
            source: opts.source.clone(),
            dest: opts.dest.clone(),
            follow_links: opts.follow_links,
            overwrite: opts.overwrite,
            cancel,
            ledger: Arc::new(ItemLedger::default()),
            failures: Arc::new(Mutex::new(Vec::new())),
            next_index: Arc::new(AtomicUsize::new(opts.start_index)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Record a failure for the final report. A poisoned lock is still usable: the
    /// vector is only ever pushed to.
    pub fn record(&self, err: StageError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err);
    }

    pub fn take_failures(&self) -> Vec<StageError> {
        std::mem::take(&mut *self.failures.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Queue A (loader → converter) and queue B (converter → writer).
///
/// Each stage gets exactly the ends it needs; dropping the last sender is the
/// "no more items" signal and `recv()` reports it only once the queue is drained.
pub struct PipelineChannels {
    pub raw_tx: Sender<WorkItem>,
    pub raw_rx: Receiver<WorkItem>,
    pub gray_tx: Sender<WorkItem>,
    pub gray_rx: Receiver<WorkItem>,
}

pub fn create_pipeline_channels() -> PipelineChannels {
    let (raw_tx, raw_rx) = unbounded::<WorkItem>();
    let (gray_tx, gray_rx) = unbounded::<WorkItem>();
    PipelineChannels {
        raw_tx,
        raw_rx,
        gray_tx,
        gray_rx,
    }
}

/// Handles returned by [`run_pipeline`](super::run_pipeline); join them with
/// [`collect_pipeline_results`](super::collect_pipeline_results).
pub struct PipelineHandles {
    pub loader_handle: JoinHandle<StageOutcome>,
    pub converter_handle: JoinHandle<StageOutcome>,
    pub writer_handle: JoinHandle<StageOutcome>,
    pub ctx: PipelineContext,
}
