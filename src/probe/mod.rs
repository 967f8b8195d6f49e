// src/probe/mod.rs
// =============================================================================
// Outbound HTTP checking.
//
// Submodules:
// - options: immutable per-run request configuration
// - http: concurrent batch execution and failure classification
//
// This file re-exports the public API so callers write `probe::run_batch`
// instead of reaching into submodules.
// =============================================================================

mod http;
mod options;

pub use http::{run_batch, ErrorKind, ProbeResult};
pub use options::{
    IpVersion, RequestOptions, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
