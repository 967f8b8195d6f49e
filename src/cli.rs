// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Two ways to supply targets (the subcommands), plus the shared run flags:
// log file, batch size, timeouts, user agent, pacing. Doc comments on the
// fields become the --help text.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logger::DEFAULT_LOG_FILE;
use crate::probe::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

#[derive(Parser, Debug)]
#[command(
    name = "url-checker",
    version,
    about = "Check large batches of URLs for response codes and latency",
    long_about = "url-checker issues HTTP HEAD checks against a list of URLs in bounded \
                  concurrent batches, appending each URL's status code and response time \
                  to a log file and reporting the total run time."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log file the results are appended to
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// How many URLs to check concurrently per batch
    #[arg(long, global = true, default_value_t = 100)]
    pub batch_size: usize,

    /// Total per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Connection establishment timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pause between batches, in milliseconds
    #[arg(long, global = true, default_value_t = 1)]
    pub pacing_ms: u64,

    /// Issue GET requests instead of bodyless HEAD requests
    #[arg(long, global = true)]
    pub get: bool,

    /// Print the run summary as JSON instead of plain text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every URL listed in a file, one per line
    ///
    /// Example: url-checker file urls.txt --batch-size 50
    File {
        /// Path to the URL list; blank and malformed lines are skipped
        path: PathBuf,
    },

    /// Check a range of numeric-ID URLs built from a base URL
    ///
    /// Example: url-checker range http://localhost:8000/ --from 1000 --to 21000 --query '?style=red'
    Range {
        /// Base URL each ID is appended to (e.g. http://localhost:8000/)
        base_url: String,

        /// First ID in the range (inclusive)
        #[arg(long)]
        from: u64,

        /// Last ID in the range (exclusive)
        #[arg(long)]
        to: u64,

        /// Query string appended after the ID
        #[arg(long, default_value = "")]
        query: String,
    },
}
