use anyhow::Result;
use log::{info, warn};

use crate::Opts;
use crate::types::PipelineReport;
use crate::utils::Colors;

/// Log the end-of-run summary and turn recorded failures or cancellation into an error,
/// so the process exit status reflects them. Call after [`collect_pipeline_results`](super::collect_pipeline_results).
pub fn check_for_failures(opts: &Opts, report: &PipelineReport) -> Result<()> {
    info!(
        "{} | {} | {}",
        Colors::colorize(Colors::OK, &format!("Written: {}", report.written)),
        Colors::colorize(
            Colors::FAILED,
            &format!("Failed: {}", report.failure_count())
        ),
        Colors::colorize(Colors::SKIPPED, &format!("Discarded: {}", report.discarded))
    );
    if report.items_created != report.items_released {
        warn!(
            "{} image buffers created but {} released",
            report.items_created, report.items_released
        );
    }
    if report.failure_count() > 0 && opts.verbose {
        for failure in &report.failures {
            eprintln!("  failed: {}", failure);
        }
    }
    if report.cancelled {
        return Err(anyhow::anyhow!(
            "Cancelled by user; {} images were written before stopping",
            report.written
        ));
    }
    if report.failure_count() > 0 {
        return Err(anyhow::anyhow!(
            "{} failures recorded during the run",
            report.failure_count()
        ));
    }
    Ok(())
}
