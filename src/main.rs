// src/main.rs
// =============================================================================
// Entry point.
//
// 1. Parse command-line arguments with clap
// 2. Build the target list (from a file or a templated ID range)
// 3. Hand the list to the Runner, which batches, probes, and logs
// 4. Print the summary and exit:
//      0 = every check succeeded
//      1 = one or more checks failed (see the log)
//      2 = fatal error (bad configuration, unwritable log)
// =============================================================================

mod batch;
mod cli;
mod error;
mod logger;
mod probe;
mod runner;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

use cli::{Cli, Commands};
use error::CheckError;
use probe::RequestOptions;
use runner::{RunConfig, Runner, RunSummary};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // Diagnostics are opt-in via RUST_LOG; the result log file is separate
    // and always written.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let targets = match &cli.command {
        Commands::File { path } => read_targets(path)?,
        Commands::Range {
            base_url,
            from,
            to,
            query,
        } => expand_range(base_url, *from, *to, query)?,
    };

    let mut request = RequestOptions::new(cli.timeout, cli.connect_timeout, cli.user_agent.clone())?;
    if cli.get {
        request.head_only = false;
    }

    let runner = Runner::new(RunConfig {
        log_path: cli.log_file.clone(),
        batch_size: cli.batch_size,
        pacing: Duration::from_millis(cli.pacing_ms),
        request,
    });

    let summary = runner.execute(&targets).await?;
    print_summary(&summary, cli.json)?;

    Ok(if summary.failed > 0 { 1 } else { 0 })
}

// Read one URL per line, skipping blanks and warning on lines that do not
// parse as URLs.
fn read_targets(path: &Path) -> Result<Vec<String>, CheckError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CheckError::config(format!("cannot read URL list {}: {e}", path.display()))
    })?;

    let mut targets = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if Url::parse(line).is_err() {
            warn!(url = line, "skipping invalid URL");
            continue;
        }
        targets.push(line.to_string());
    }

    if targets.is_empty() {
        return Err(CheckError::config(format!(
            "no valid URLs found in {}",
            path.display()
        )));
    }

    Ok(targets)
}

// Generate `base<id><query>` for every id in [from, to), e.g. iterating a
// numeric API endpoint.
fn expand_range(base: &str, from: u64, to: u64, query: &str) -> Result<Vec<String>, CheckError> {
    Url::parse(base).map_err(|e| CheckError::config(format!("invalid base URL {base}: {e}")))?;

    if from >= to {
        return Err(CheckError::config(format!("empty ID range {from}..{to}")));
    }

    Ok((from..to).map(|id| format!("{base}{id}{query}")).collect())
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "URL check run complete, see log file {}",
        summary.log_path.display()
    );
    if summary.failed > 0 {
        println!(
            "{} of {} checks failed, see the log for status codes",
            summary.failed, summary.checked
        );
    }
    println!("Total time taken: {:.3} s", summary.total_elapsed_secs);

    Ok(())
}
