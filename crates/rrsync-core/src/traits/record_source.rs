// # Record Source Trait
//
// Defines the interface for fetching DNS resource records from a
// DNS-management API.
//
// ## Implementations
//
// - ZDNS-style shared RRS listing: `rrsync-source-zdns` crate
//
// ## Usage
//
// ```rust,ignore
// use rrsync_core::RecordSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* RecordSource implementation */;
//
//     let fetched = source.fetch_records().await?;
//     println!("{} of {} records", fetched.records.len(), fetched.total);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::FetchedRecords;

/// Trait for DNS record sources
///
/// A source returns the complete record collection in one call. It does
/// not filter, merge or retry; those decisions belong to the pipeline.
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (a failed fetch fails the run)
/// - ❌ Filter records (owned by the normalizer)
/// - ❌ Cache records between runs
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every shared resource record
    ///
    /// # Returns
    ///
    /// - `Ok(FetchedRecords)`: The raw records plus the total reported by the API
    /// - `Err(Error)`: Network, authentication or decoding failure
    async fn fetch_records(&self) -> Result<FetchedRecords, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
