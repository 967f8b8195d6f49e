// src/probe/options.rs
// =============================================================================
// Immutable request configuration shared by every probe in a run.
//
// Constructed once before the first batch and never reconfigured mid-run,
// so all concurrent requests in a run behave identically. The defaults
// mirror a lightweight benchmarking setup: bodyless HEAD requests, HTTP
// errors counted as failures, redirects not followed, IPv4 resolution.
// =============================================================================

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Hard ceiling on total request duration, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ceiling on the connection establishment phase, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Sent as the User-Agent header on every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:64.0) Gecko/20100101 Firefox/64.0";

/// Which address family DNS resolution may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpVersion {
    V4,
    V6,
    Any,
}

/// Configuration for every outbound check in a run.
///
/// Invariant: `timeout_secs > connect_timeout_secs`, checked at
/// construction - a connect phase that can outlast the whole request makes
/// the total timeout meaningless.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Hard ceiling on total request duration.
    pub timeout_secs: u64,
    /// Ceiling on connection establishment.
    pub connect_timeout_secs: u64,
    /// User-Agent header value.
    pub user_agent: String,
    /// Address family restriction for DNS resolution.
    pub ip_version: IpVersion,
    /// Issue bodyless HEAD requests instead of GET.
    pub head_only: bool,
    /// Count HTTP status >= 400 as a failed check. Classification only:
    /// the real status code is always recorded and logged.
    pub fail_on_http_error: bool,
    /// Whether redirects are followed.
    pub follow_location: bool,
}

impl RequestOptions {
    /// Build options with the given timeouts and user agent; everything
    /// else takes the run defaults. Fails with a configuration error when
    /// the timeout invariant does not hold.
    pub fn new(
        timeout_secs: u64,
        connect_timeout_secs: u64,
        user_agent: String,
    ) -> Result<Self, CheckError> {
        if timeout_secs <= connect_timeout_secs {
            return Err(CheckError::config(format!(
                "timeout ({timeout_secs}s) must be greater than connect timeout ({connect_timeout_secs}s)"
            )));
        }

        Ok(RequestOptions {
            timeout_secs,
            connect_timeout_secs,
            user_agent,
            ip_version: IpVersion::V4,
            head_only: true,
            fail_on_http_error: true,
            follow_location: false,
        })
    }

    /// Build the shared HTTP client all probes in the run clone from.
    pub fn build_client(&self) -> Result<Client, CheckError> {
        let redirect_policy = if self.follow_location {
            reqwest::redirect::Policy::limited(5)
        } else {
            reqwest::redirect::Policy::none()
        };

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .user_agent(self.user_agent.clone())
            .redirect(redirect_policy);

        // Binding the local address to the unspecified address of one
        // family restricts resolution and connection to that family.
        builder = match self.ip_version {
            IpVersion::V4 => builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            IpVersion::V6 => builder.local_address(IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
            IpVersion::Any => builder,
        };

        builder
            .build()
            .map_err(|e| CheckError::config(format!("cannot build HTTP client: {e}")))
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ip_version: IpVersion::V4,
            head_only: true,
            fail_on_http_error: true,
            follow_location: false,
        }
    }
}
