//! Console reporting of step progress.
//!
//! Every line goes through the `log` facade; the binaries route it to the
//! terminal with `env_logger`.

use log::{info, warn};

use super::step::{ChunkSummary, StepExecution};

pub(crate) fn chunk_started(summary: &ChunkSummary) {
    info!(
        "Processing chunk {} (items {}-{})",
        summary.number, summary.first_item, summary.last_item
    );
}

pub(crate) fn chunk_finished(summary: &ChunkSummary, step_execution: &StepExecution, total: usize) {
    if summary.fallback {
        info!(
            "Chunk {} written item by item: {} successful, {} errors",
            summary.number,
            summary.written,
            summary.error_count()
        );
    } else {
        info!(
            "Chunk {} committed: {} successful, {} errors",
            summary.number,
            summary.written,
            summary.error_count()
        );
    }

    info!(
        "Overall progress: {}/{} ({:.1}%) - success: {}, errors: {}",
        summary.last_item,
        total,
        percentage(summary.last_item, total),
        step_execution.write_count,
        step_execution.error_count()
    );
}

/// Logs the final totals of a finished step.
pub fn report_summary(step_execution: &StepExecution) {
    info!(
        "Upload completed in {:.2?}: {} documents uploaded in {} chunks",
        step_execution.duration,
        step_execution.write_count,
        step_execution.chunks.len()
    );

    if step_execution.error_count() > 0 {
        warn!(
            "Failed uploads: {} documents ({} rejected before writing, {} failed to write)",
            step_execution.error_count(),
            step_execution.process_error_count,
            step_execution.write_error_count
        );
    } else {
        info!("All documents uploaded successfully");
    }
}

fn percentage(done: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}
