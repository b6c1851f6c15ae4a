// # Sheet Store Trait
//
// Defines the interface to the spreadsheet that mirrors the DNS records.
//
// ## Implementations
//
// - WeCom smart sheet: `rrsync-sheet-wecom` crate
//
// ## Usage
//
// ```rust,ignore
// use rrsync_core::SheetStore;
//
// let rows = sheet.list_rows().await?;
// let added = sheet.insert_rows(&new_rows).await?;
// let updated = sheet.update_rows(&updates).await?;
// sheet.delete_rows(&stale_ids).await?;
// ```

use async_trait::async_trait;

use crate::model::{NewRow, RowUpdate, SheetRow};

/// Trait for the target sheet
///
/// Each mutating method is exactly one batch API call. Implementations
/// convert their wire shapes into [`SheetRow`] before returning, so the
/// reconciler never touches provider JSON.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// List every row currently in the sheet
    async fn list_rows(&self) -> Result<Vec<SheetRow>, crate::Error>;

    /// Create rows in one batch
    ///
    /// # Returns
    ///
    /// The number of rows the service reports as inserted
    async fn insert_rows(&self, rows: &[NewRow]) -> Result<usize, crate::Error>;

    /// Overwrite both fields of existing rows in one batch
    ///
    /// # Returns
    ///
    /// The number of rows the service reports as updated
    async fn update_rows(&self, rows: &[RowUpdate]) -> Result<usize, crate::Error>;

    /// Delete rows by id in one batch
    async fn delete_rows(&self, record_ids: &[String]) -> Result<(), crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}
