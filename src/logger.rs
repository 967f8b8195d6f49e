// src/logger.rs
// =============================================================================
// Append-only result log.
//
// One RunLog owns the log file for the whole run. The runner serializes all
// writes through it, so concurrent probes can never interleave lines. Each
// record is a single newline-terminated line:
//
//   2019-01-07 09:15:02 +00:00 +00:00 | start
//   http://localhost:8000/1000?style=red | 200 | 0.012
//   http://localhost:8000/1001?style=red | 0 | 5.003
//
// The file is opened in append mode and never truncated - earlier runs stay
// intact. Any open or write failure is fatal to the run.
// =============================================================================

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::CheckError;
use crate::probe::ProbeResult;

/// Default log filename when the caller does not supply one.
pub const DEFAULT_LOG_FILE: &str = "url_checker.log";

// Local date/time with UTC offset and zone field, e.g.
// "2019-01-07 09:15:02 +00:00 +00:00"
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z %Z";

/// Exclusive writer for one run's log file.
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Open (or create) the log file for appending. Pre-existing content is
    /// preserved.
    pub fn open(path: &Path) -> Result<Self, CheckError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| CheckError::Log {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(RunLog {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the timestamped start-of-run marker.
    pub fn write_start(&mut self) -> Result<(), CheckError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        self.write_line(&format!("{timestamp} | start"))
    }

    /// Append one result line: URL, HTTP status (0 on transport failure),
    /// elapsed seconds.
    pub fn write_result(&mut self, result: &ProbeResult) -> Result<(), CheckError> {
        self.write_line(&format!(
            "{} | {} | {:.3}",
            result.url, result.status, result.elapsed_secs
        ))
    }

    fn write_line(&mut self, line: &str) -> Result<(), CheckError> {
        writeln!(self.file, "{line}")
            .and_then(|_| self.file.flush())
            .map_err(|source| CheckError::Log {
                path: self.path.clone(),
                source,
            })
    }
}
