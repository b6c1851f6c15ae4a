// # ZDNS Record Source
//
// This crate provides the DNS-management API record source for rrsync.
//
// ## Behavior
//
// - ✅ One HTTP request per run: `GET {host}/shared-rrs` with basic auth
// - ✅ Response decoded into typed structs and converted to `RawRecord`
// - ✅ HTTP timeout configured (from `RRSYNC_HTTP_TIMEOUT_SECS`)
// - ✅ Specific error mapping for HTTP status codes (401/403, 404, 429, 5xx)
// - ✅ Optional acceptance of self-signed appliance certificates
// - ❌ NO pagination parameters (the listing returns the full collection)
// - ❌ NO retry logic (a failed fetch fails the run)
// - ❌ NO filtering (owned by the normalizer in rrsync-core)
//
// ## Security Requirements
//
// - Password NEVER appears in logs or Debug output
// - Credentials are provided via environment variables only
//
// ## API Reference
//
// - List shared resource records: GET `/shared-rrs`
//
// ```json
// {
//   "total_size": 2,
//   "resources": [
//     { "id": "rr-1", "name": "www.example.com.", "type": "A",
//       "rdata": "10.0.0.1", "ttl": 3600, "is_enable": "yes" }
//   ]
// }
// ```

use async_trait::async_trait;
use rrsync_core::config::DnsSourceConfig;
use rrsync_core::traits::RecordSource;
use rrsync_core::{Error, FetchedRecords, RawRecord, Result};
use serde::Deserialize;
use std::time::Duration;

/// Service name used in errors and logs
const SERVICE: &str = "zdns";

/// Path of the shared resource record listing
const SHARED_RRS_PATH: &str = "shared-rrs";

/// One record as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
struct WireRecord {
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    rdata: String,
    /// Records without the flag are treated as disabled
    #[serde(default)]
    is_enable: String,
}

impl From<WireRecord> for RawRecord {
    fn from(wire: WireRecord) -> Self {
        RawRecord::new(wire.name, wire.record_type, wire.rdata, wire.is_enable)
    }
}

/// Body of `GET /shared-rrs`
#[derive(Debug, Deserialize)]
struct SharedRrsResponse {
    #[serde(default)]
    resources: Vec<WireRecord>,
    total_size: Option<usize>,
}

/// Decode a listing body into raw records
///
/// When the service omits `total_size`, the number of returned records is
/// used instead.
pub fn parse_listing(body: &str) -> Result<FetchedRecords> {
    let response: SharedRrsResponse = serde_json::from_str(body).map_err(|e| {
        Error::record_source(format!("{SERVICE}: invalid shared-rrs response: {e}"))
    })?;

    let total = response.total_size.unwrap_or(response.resources.len());
    let records: Vec<RawRecord> = response.resources.into_iter().map(Into::into).collect();

    Ok(FetchedRecords { records, total })
}

/// ZDNS record source
///
/// Stateless: every call performs a fresh listing.
pub struct ZdnsRecordSource {
    /// API base URL without trailing slash
    host: String,

    user: String,

    /// ⚠️ NEVER log this value
    password: String,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ZdnsRecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZdnsRecordSource")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl ZdnsRecordSource {
    /// Create a new record source
    ///
    /// # Parameters
    ///
    /// - `config`: Host and credentials
    /// - `timeout`: Per-request timeout
    pub fn new(config: &DnsSourceConfig, timeout: Duration) -> Result<Self> {
        if config.user.is_empty() || config.password.is_empty() {
            return Err(Error::config("ZDNS user and password are required"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        if config.accept_invalid_certs {
            tracing::warn!("ZDNS certificate verification is disabled");
        }

        Ok(Self {
            host: config.host.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            password: config.password.clone(),
            client,
        })
    }

    fn listing_url(&self) -> String {
        format!("{}/{}", self.host, SHARED_RRS_PATH)
    }
}

#[async_trait]
impl RecordSource for ZdnsRecordSource {
    /// Fetch the full shared record collection
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /shared-rrs
    /// Authorization: Basic <user:password>
    /// ```
    async fn fetch_records(&self) -> Result<FetchedRecords> {
        let url = self.listing_url();
        tracing::debug!("Fetching shared resource records from {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("{SERVICE}: request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("{SERVICE}: failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Error::from_status(
                SERVICE,
                status.as_u16(),
                "shared-rrs listing",
                &body,
            ));
        }

        let fetched = parse_listing(&body)?;
        tracing::debug!(
            "Received {} record(s), reported total {}",
            fetched.records.len(),
            fetched.total
        );
        Ok(fetched)
    }

    fn source_name(&self) -> &'static str {
        SERVICE
    }
}
