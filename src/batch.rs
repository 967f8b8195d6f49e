// src/batch.rs
// =============================================================================
// Splits the ordered target list into fixed-size batches.
//
// Batching bounds how many requests are in flight at once: the runner
// processes one batch at a time, so peak concurrency equals batch size.
//
// The split is purely positional - no filtering, no deduplication, no
// reordering. Concatenating the batches in order reproduces the input list
// exactly. Malformed URLs pass through untouched; they fail later at the
// probe level, not here.
// =============================================================================

use crate::error::CheckError;

/// Partition `targets` into consecutive batches of at most `size` URLs.
///
/// The last batch may be smaller. A batch size of zero is a configuration
/// error. Deterministic: the same input always produces the same partition.
pub fn chunk(targets: &[String], size: usize) -> Result<Vec<&[String]>, CheckError> {
    if size == 0 {
        return Err(CheckError::config("batch size must be greater than zero"));
    }

    Ok(targets.chunks(size).collect())
}
