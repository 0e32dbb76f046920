use anyhow::Result;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::JoinHandle;

use crate::Opts;
use crate::engine::progress::ProgressCallback;
use crate::engine::tools::ensure_dest_dir;
use crate::error::StageError;
use crate::pipeline;
use crate::types::{PipelineReport, StageOutcome};

/// Start the loader → converter → writer pipeline. Returns handles; the caller must pass
/// them to [`collect_pipeline_results`] to join the stages and build the report.
///
/// Each stage owns exactly one end of each queue it touches, so closure chains forward:
/// queue A closes when the loader returns, queue B when the converter returns.
pub fn run_pipeline(
    opts: &Opts,
    cancel: Arc<AtomicBool>,
    on_written: Option<ProgressCallback>,
) -> Result<pipeline::PipelineHandles> {
    ensure_dest_dir(&opts.dest)?;
    debug!(
        "{} -> {}",
        opts.source.display(),
        opts.dest.display()
    );

    let ctx = pipeline::PipelineContext::new(opts, cancel);
    let pipeline::PipelineChannels {
        raw_tx,
        raw_rx,
        gray_tx,
        gray_rx,
    } = pipeline::create_pipeline_channels();

    let writer_handle = pipeline::spawn_writer_thread(gray_rx, ctx.clone(), on_written);
    let converter_handle = pipeline::spawn_converter_thread(raw_rx, gray_tx, ctx.clone());
    let loader_handle = pipeline::spawn_loader_thread(raw_tx, ctx.clone());

    Ok(pipeline::PipelineHandles {
        loader_handle,
        converter_handle,
        writer_handle,
        ctx,
    })
}

/// Join one stage; a panic is recorded as a failure instead of propagating.
fn join_stage(
    handle: JoinHandle<StageOutcome>,
    stage: &'static str,
    ctx: &pipeline::PipelineContext,
) -> StageOutcome {
    handle.join().unwrap_or_else(|_| {
        let err = StageError::StagePanicked { stage };
        log::error!("{}", err);
        ctx.record(err);
        StageOutcome::default()
    })
}

/// Join all stages (loader first, writer last) and build the [`PipelineReport`].
/// Ledger counts are read after every thread has exited, so they are final.
pub fn collect_pipeline_results(handles: pipeline::PipelineHandles) -> PipelineReport {
    let pipeline::PipelineHandles {
        loader_handle,
        converter_handle,
        writer_handle,
        ctx,
    } = handles;

    let loaded = join_stage(loader_handle, "loader", &ctx);
    let converted = join_stage(converter_handle, "converter", &ctx);
    let written = join_stage(writer_handle, "writer", &ctx);

    let report = PipelineReport {
        loaded: loaded.processed,
        converted: converted.processed,
        written: written.processed,
        discarded: converted.discarded + written.discarded,
        items_created: ctx.ledger.created(),
        items_released: ctx.ledger.released(),
        cancelled: ctx.is_cancelled(),
        failures: ctx.take_failures(),
    };
    debug!("report: {:?}", report);
    report
}

/// Run the whole pipeline to completion and return its report.
pub fn process_dir(
    opts: &Opts,
    cancel: Arc<AtomicBool>,
    on_written: Option<ProgressCallback>,
) -> Result<PipelineReport> {
    let handles = run_pipeline(opts, cancel, on_written)?;
    Ok(collect_pipeline_results(handles))
}
