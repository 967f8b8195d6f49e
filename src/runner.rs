// src/runner.rs
// =============================================================================
// Drives a full check run: batches the target list, probes each batch
// concurrently, streams every result to the log, paces between batches, and
// reports aggregate timing.
//
// Batches run strictly one after another - a batch's probing and logging
// fully completes before the next batch starts, which bounds peak
// concurrency and open-connection count to one batch size. The pacing sleep
// between batches is a deliberate throughput throttle to avoid hammering
// the target server or exhausting local ephemeral ports.
//
// Fatal errors (bad configuration, unwritable log) abort the run before any
// request is issued; once probing has started, only a log write failure can
// stop it. Per-URL failures are absorbed into their log line.
// =============================================================================

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::batch;
use crate::error::CheckError;
use crate::logger::RunLog;
use crate::probe::{self, RequestOptions};

/// Everything a run needs, fixed up front. No process-wide state: two
/// runners with different configs can coexist.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Where result lines are appended.
    pub log_path: PathBuf,
    /// How many URLs are in flight at once.
    pub batch_size: usize,
    /// Sleep between consecutive batches.
    pub pacing: Duration,
    /// Shared request configuration for every probe.
    pub request: RequestOptions,
}

/// What a completed run reports back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// The log file holding one line per checked URL.
    pub log_path: PathBuf,
    /// Wall-clock seconds from before the first batch to after the last.
    pub total_elapsed_secs: f64,
    /// Number of URLs checked (always equals the target count).
    pub checked: usize,
    /// Checks that failed classification: transport failures, plus HTTP
    /// errors when the run counts those as failures.
    pub failed: usize,
}

pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Runner { config }
    }

    /// Check every target and return the aggregate summary.
    ///
    /// Validates configuration and opens the log before anything touches
    /// the network: an empty target list, a zero batch size, or an
    /// unwritable log path all fail without a single request being issued
    /// (and the first two without the log file being created at all).
    pub async fn execute(&self, targets: &[String]) -> Result<RunSummary, CheckError> {
        if targets.is_empty() {
            return Err(CheckError::config("no URLs to check"));
        }
        if self.config.batch_size == 0 {
            return Err(CheckError::config("batch size must be greater than zero"));
        }

        let client = self.config.request.build_client()?;

        let mut log = RunLog::open(&self.config.log_path)?;
        log.write_start()?;

        let batches = batch::chunk(targets, self.config.batch_size)?;
        let batch_count = batches.len();

        let mut checked = 0;
        let mut failed = 0;
        let started = Instant::now();

        for (index, urls) in batches.iter().enumerate() {
            debug!(
                batch = index + 1,
                batches = batch_count,
                size = urls.len(),
                "probing batch"
            );

            let results = probe::run_batch(&client, &self.config.request, urls).await;

            // All of this batch's results hit the log before the next batch
            // starts; a write failure aborts mid-run with earlier lines
            // intact.
            for result in &results {
                log.write_result(result)?;
                checked += 1;
                if !result.succeeded(self.config.request.fail_on_http_error) {
                    failed += 1;
                }
            }

            if index + 1 < batch_count && !self.config.pacing.is_zero() {
                tokio::time::sleep(self.config.pacing).await;
            }
        }

        let total_elapsed_secs = started.elapsed().as_secs_f64();
        debug!(checked, failed, total_elapsed_secs, "run complete");

        Ok(RunSummary {
            log_path: self.config.log_path.clone(),
            total_elapsed_secs,
            checked,
            failed,
        })
    }
}
