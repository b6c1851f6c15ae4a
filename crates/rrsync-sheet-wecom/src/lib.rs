// # WeCom Smart Sheet Store
//
// This crate provides the `SheetStore` implementation over the WeCom
// document API.
//
// ## Behavior
//
// - ✅ Access token obtained once per store instance from corp id + secret
// - ✅ Rows listed page by page until the API reports no more
// - ✅ One request per batch mutation (add, update, delete)
// - ✅ Values keyed by field title, written as single text fragments
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (a failed call fails the run)
// - ❌ NO diffing (owned by the reconciler in rrsync-core)
//
// ## Security Requirements
//
// - Corp secret and access token NEVER appear in logs or Debug output
//
// ## API Reference
//
// - Token: GET `/cgi-bin/gettoken?corpid=...&corpsecret=...`
// - List: POST `/cgi-bin/wedoc/smartsheet/get_records?access_token=...`
// - Add: POST `/cgi-bin/wedoc/smartsheet/add_records?access_token=...`
// - Update: POST `/cgi-bin/wedoc/smartsheet/update_records?access_token=...`
// - Delete: POST `/cgi-bin/wedoc/smartsheet/delete_records?access_token=...`

pub mod wire;

use async_trait::async_trait;
use rrsync_core::config::SheetConfig;
use rrsync_core::traits::SheetStore;
use rrsync_core::{Error, FieldNames, NewRow, Result, RowUpdate, SheetRow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::OnceCell;

use wire::{
    AddRecord, AddRecordsRequest, DeleteRecordsRequest, GetRecordsRequest, GetRecordsResponse,
    KEY_TYPE_FIELD_TITLE, MutationResponse, TokenResponse, UpdateRecord, UpdateRecordsRequest,
};

/// Service name used in errors and logs
const SERVICE: &str = "wecom";

/// Rows requested per get_records page
const PAGE_SIZE: u64 = 1000;

const TOKEN_PATH: &str = "cgi-bin/gettoken";
const SMARTSHEET_PATH: &str = "cgi-bin/wedoc/smartsheet";

/// WeCom smart sheet store
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the store will:
/// - Perform all reads (token, row listing)
/// - Log the intended mutation payloads
/// - **NOT** send add/update/delete requests
pub struct WecomSheetStore {
    /// API base URL without trailing slash
    api_base: String,

    corp_id: String,

    /// ⚠️ NEVER log this value
    corp_secret: String,

    doc_id: String,

    sheet_id: String,

    fields: FieldNames,

    client: reqwest::Client,

    /// Access token, fetched on first use
    token: OnceCell<String>,

    dry_run: bool,
}

// Custom Debug implementation that hides the secret and token
impl std::fmt::Debug for WecomSheetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WecomSheetStore")
            .field("api_base", &self.api_base)
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"<REDACTED>")
            .field("doc_id", &self.doc_id)
            .field("sheet_id", &self.sheet_id)
            .field("fields", &self.fields)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl WecomSheetStore {
    /// Create a new sheet store
    ///
    /// # Parameters
    ///
    /// - `config`: API base, credentials, document and sheet ids, field titles
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform reads but skip mutations
    pub fn new(config: &SheetConfig, timeout: Duration, dry_run: bool) -> Result<Self> {
        if config.corp_id.is_empty() || config.corp_secret.is_empty() {
            return Err(Error::config("WeCom corp id and secret are required"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        if dry_run {
            tracing::warn!("WeCom sheet store running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            corp_id: config.corp_id.clone(),
            corp_secret: config.corp_secret.clone(),
            doc_id: config.doc_id.clone(),
            sheet_id: config.sheet_id.clone(),
            fields: config.fields.clone(),
            client,
            token: OnceCell::new(),
            dry_run,
        })
    }

    /// Get the access token, requesting it on first use
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /cgi-bin/gettoken?corpid=...&corpsecret=...
    /// ```
    async fn access_token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                let url = format!("{}/{}", self.api_base, TOKEN_PATH);
                tracing::debug!("Requesting WeCom access token for corp {}", self.corp_id);

                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("corpid", self.corp_id.as_str()),
                        ("corpsecret", self.corp_secret.as_str()),
                    ])
                    .send()
                    .await
                    .map_err(|e| Error::http(format!("{SERVICE}: token request failed: {e}")))?;

                let body = read_body(response, "gettoken").await?;
                wire::check_status(SERVICE, "gettoken", &body)?;
                let parsed: TokenResponse = parse(&body, "gettoken")?;
                parsed
                    .access_token
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| Error::auth(format!("{SERVICE}: gettoken returned no token")))
            })
            .await?;
        Ok(token.as_str())
    }

    /// POST a smart-sheet action and decode the typed response
    async fn post<B, R>(&self, action: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let token = self.access_token().await?;
        let url = format!("{}/{}/{}", self.api_base, SMARTSHEET_PATH, action);
        tracing::debug!("[{}] POST {}", SERVICE, action);

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", token)])
            .json(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("{SERVICE}: {action} request failed: {e}")))?;

        let text = read_body(response, action).await?;
        wire::check_status(SERVICE, action, &text)?;
        parse(&text, action)
    }

    fn log_dry_run<B: Serialize>(&self, action: &str, body: &B) {
        tracing::info!(
            "[DRY-RUN] Would send {} with payload: {}",
            action,
            serde_json::to_string(body).unwrap_or_else(|e| format!("<unserializable: {e}>"))
        );
    }
}

async fn read_body(response: reqwest::Response, action: &str) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::http(format!("{SERVICE}: failed to read {action} response: {e}")))?;

    if !status.is_success() {
        return Err(Error::from_status(SERVICE, status.as_u16(), action, &body));
    }
    Ok(body)
}

fn parse<R: DeserializeOwned>(body: &str, action: &str) -> Result<R> {
    let parsed: R = serde_json::from_str(body)
        .inspect_err(|e| tracing::debug!("{}: invalid {} response: {}", SERVICE, action, e))?;
    Ok(parsed)
}

#[async_trait]
impl SheetStore for WecomSheetStore {
    async fn list_rows(&self) -> Result<Vec<SheetRow>> {
        let mut rows = Vec::new();
        let mut offset = 0;

        loop {
            let request = GetRecordsRequest {
                docid: &self.doc_id,
                sheet_id: &self.sheet_id,
                key_type: KEY_TYPE_FIELD_TITLE,
                offset,
                limit: PAGE_SIZE,
            };
            let page: GetRecordsResponse = self.post("get_records", &request).await?;
            tracing::debug!("get_records offset {} returned {}", offset, page.records.len());

            rows.extend(
                page.records
                    .into_iter()
                    .map(|record| wire::decode_row(&self.fields, record)),
            );

            if !page.has_more {
                break;
            }
            if page.next <= offset {
                return Err(Error::sheet(format!(
                    "{SERVICE}: get_records pagination did not advance past offset {offset}"
                )));
            }
            offset = page.next;
        }

        Ok(rows)
    }

    async fn insert_rows(&self, rows: &[NewRow]) -> Result<usize> {
        let request = AddRecordsRequest {
            docid: &self.doc_id,
            sheet_id: &self.sheet_id,
            key_type: KEY_TYPE_FIELD_TITLE,
            records: rows
                .iter()
                .map(|row| AddRecord {
                    record_id: &row.temp_id,
                    values: wire::encode_values(&self.fields, &row.name, &row.rdata),
                })
                .collect(),
        };

        if self.dry_run {
            self.log_dry_run("add_records", &request);
            return Ok(rows.len());
        }

        let response: MutationResponse = self.post("add_records", &request).await?;
        Ok(response.records.len())
    }

    async fn update_rows(&self, rows: &[RowUpdate]) -> Result<usize> {
        let request = UpdateRecordsRequest {
            docid: &self.doc_id,
            sheet_id: &self.sheet_id,
            key_type: KEY_TYPE_FIELD_TITLE,
            records: rows
                .iter()
                .map(|row| UpdateRecord {
                    record_id: &row.record_id,
                    values: wire::encode_values(&self.fields, &row.name, &row.rdata),
                })
                .collect(),
        };

        if self.dry_run {
            self.log_dry_run("update_records", &request);
            return Ok(rows.len());
        }

        let response: MutationResponse = self.post("update_records", &request).await?;
        Ok(response.records.len())
    }

    async fn delete_rows(&self, record_ids: &[String]) -> Result<()> {
        let request = DeleteRecordsRequest {
            docid: &self.doc_id,
            sheet_id: &self.sheet_id,
            record_ids,
        };

        if self.dry_run {
            self.log_dry_run("delete_records", &request);
            return Ok(());
        }

        let _: wire::ApiStatus = self.post("delete_records", &request).await?;
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        SERVICE
    }
}
