//! Configuration types for the sync pipeline
//!
//! All run parameters come from the process environment. Eleven values are
//! mandatory; the rest fall back to defaults. Loading collects every missing
//! name before failing so an operator sees the whole list at once.

use crate::error::{Error, Result};
use crate::model::{DEFAULT_NAME_FIELD, DEFAULT_RDATA_FIELD, FieldNames};
use std::fmt;

pub const ENV_DNS_HOST: &str = "RRSYNC_DNS_HOST";
pub const ENV_DNS_USER: &str = "RRSYNC_DNS_USER";
pub const ENV_DNS_PASSWORD: &str = "RRSYNC_DNS_PASSWORD";
pub const ENV_SHEET_API_BASE: &str = "RRSYNC_SHEET_API_BASE";
pub const ENV_SHEET_CORP_ID: &str = "RRSYNC_SHEET_CORP_ID";
pub const ENV_SHEET_CORP_SECRET: &str = "RRSYNC_SHEET_CORP_SECRET";
pub const ENV_SHEET_DOC_ID: &str = "RRSYNC_SHEET_DOC_ID";
pub const ENV_SHEET_ID: &str = "RRSYNC_SHEET_ID";
pub const ENV_AUDIT_ENDPOINT: &str = "RRSYNC_AUDIT_ENDPOINT";
pub const ENV_AUDIT_API_KEY: &str = "RRSYNC_AUDIT_API_KEY";
pub const ENV_AUDIT_COLLECTION: &str = "RRSYNC_AUDIT_COLLECTION";

pub const ENV_FIELD_NAME: &str = "RRSYNC_FIELD_NAME";
pub const ENV_FIELD_RDATA: &str = "RRSYNC_FIELD_RDATA";
pub const ENV_DELETE_ENABLED: &str = "RRSYNC_DELETE_ENABLED";
pub const ENV_AUDIT_ENABLED: &str = "RRSYNC_AUDIT_ENABLED";
pub const ENV_DNS_ACCEPT_INVALID_CERTS: &str = "RRSYNC_DNS_ACCEPT_INVALID_CERTS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "RRSYNC_HTTP_TIMEOUT_SECS";
pub const ENV_MODE: &str = "RRSYNC_MODE";
pub const ENV_LOG_LEVEL: &str = "RRSYNC_LOG_LEVEL";

/// The mandatory variables, in the order they are reported when missing
pub const REQUIRED_VARS: [&str; 11] = [
    ENV_DNS_HOST,
    ENV_DNS_USER,
    ENV_DNS_PASSWORD,
    ENV_SHEET_API_BASE,
    ENV_SHEET_CORP_ID,
    ENV_SHEET_CORP_SECRET,
    ENV_SHEET_DOC_ID,
    ENV_SHEET_ID,
    ENV_AUDIT_ENDPOINT,
    ENV_AUDIT_API_KEY,
    ENV_AUDIT_COLLECTION,
];

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Complete run configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// DNS-management API access
    pub dns: DnsSourceConfig,

    /// Smart-sheet API access and target
    pub sheet: SheetConfig,

    /// Audit collection access
    pub audit: AuditConfig,

    /// Behavior switches
    pub options: SyncOptions,
}

/// DNS-management API configuration
#[derive(Clone)]
pub struct DnsSourceConfig {
    pub host: String,
    pub user: String,
    /// ⚠️ NEVER log this value
    pub password: String,
    /// Accept self-signed certificates (appliances often ship them)
    pub accept_invalid_certs: bool,
}

impl fmt::Debug for DnsSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsSourceConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Smart-sheet API configuration
#[derive(Clone)]
pub struct SheetConfig {
    pub api_base: String,
    pub corp_id: String,
    /// ⚠️ NEVER log this value
    pub corp_secret: String,
    pub doc_id: String,
    pub sheet_id: String,
    pub fields: FieldNames,
}

impl fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetConfig")
            .field("api_base", &self.api_base)
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"<REDACTED>")
            .field("doc_id", &self.doc_id)
            .field("sheet_id", &self.sheet_id)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Audit collection configuration
#[derive(Clone)]
pub struct AuditConfig {
    pub endpoint: String,
    /// ⚠️ NEVER log this value
    pub api_key: String,
    pub collection: String,
    pub enabled: bool,
}

impl fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<REDACTED>")
            .field("collection", &self.collection)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Whether sheet mutations are sent or only logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Live,
    DryRun,
}

impl RunMode {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "live" => Ok(Self::Live),
            "dry-run" | "dry_run" | "dryrun" => Ok(Self::DryRun),
            other => Err(Error::config(format!(
                "{ENV_MODE} '{other}' is not valid. Valid modes: live, dry-run"
            ))),
        }
    }

    pub fn is_dry_run(self) -> bool {
        self == Self::DryRun
    }
}

/// Behavior switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Delete sheet rows whose name no longer has a DNS record
    pub delete_enabled: bool,

    /// Live or dry-run
    pub mode: RunMode,

    /// Per-request HTTP timeout (in seconds)
    pub http_timeout_secs: u64,

    /// tracing max level name
    pub log_level: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            delete_enabled: true,
            mode: RunMode::Live,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingConfig(missing));
        }

        let required = |key: &'static str| get(key).unwrap_or_default();

        let options = SyncOptions {
            delete_enabled: parse_flag(ENV_DELETE_ENABLED, get(ENV_DELETE_ENABLED), true)?,
            mode: get(ENV_MODE)
                .map(|v| RunMode::parse(&v))
                .transpose()?
                .unwrap_or_default(),
            http_timeout_secs: match get(ENV_HTTP_TIMEOUT_SECS) {
                Some(v) => v.trim().parse().map_err(|_| {
                    Error::config(format!("{ENV_HTTP_TIMEOUT_SECS} must be a number. Got: {v}"))
                })?,
                None => DEFAULT_HTTP_TIMEOUT_SECS,
            },
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| "info".to_string()),
        };

        let config = Self {
            dns: DnsSourceConfig {
                host: required(ENV_DNS_HOST),
                user: required(ENV_DNS_USER),
                password: required(ENV_DNS_PASSWORD),
                accept_invalid_certs: parse_flag(
                    ENV_DNS_ACCEPT_INVALID_CERTS,
                    get(ENV_DNS_ACCEPT_INVALID_CERTS),
                    false,
                )?,
            },
            sheet: SheetConfig {
                api_base: required(ENV_SHEET_API_BASE),
                corp_id: required(ENV_SHEET_CORP_ID),
                corp_secret: required(ENV_SHEET_CORP_SECRET),
                doc_id: required(ENV_SHEET_DOC_ID),
                sheet_id: required(ENV_SHEET_ID),
                fields: FieldNames {
                    name: get(ENV_FIELD_NAME).unwrap_or_else(|| DEFAULT_NAME_FIELD.to_string()),
                    rdata: get(ENV_FIELD_RDATA)
                        .unwrap_or_else(|| DEFAULT_RDATA_FIELD.to_string()),
                },
            },
            audit: AuditConfig {
                endpoint: required(ENV_AUDIT_ENDPOINT),
                api_key: required(ENV_AUDIT_API_KEY),
                collection: required(ENV_AUDIT_COLLECTION),
                enabled: parse_flag(ENV_AUDIT_ENABLED, get(ENV_AUDIT_ENABLED), true)?,
            },
            options,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate value formats
    pub fn validate(&self) -> Result<()> {
        validate_url(ENV_DNS_HOST, &self.dns.host)?;
        validate_url(ENV_SHEET_API_BASE, &self.sheet.api_base)?;
        validate_url(ENV_AUDIT_ENDPOINT, &self.audit.endpoint)?;

        if self.sheet.fields.name == self.sheet.fields.rdata {
            return Err(Error::config(format!(
                "{ENV_FIELD_NAME} and {ENV_FIELD_RDATA} must differ. Both are '{}'",
                self.sheet.fields.name
            )));
        }

        if !(1..=600).contains(&self.options.http_timeout_secs) {
            return Err(Error::config(format!(
                "{ENV_HTTP_TIMEOUT_SECS} must be between 1 and 600 seconds. Got: {}",
                self.options.http_timeout_secs
            )));
        }

        match self.options.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config(format!(
                    "{ENV_LOG_LEVEL} '{}' is not valid. \
                     Valid levels: trace, debug, info, warn, error",
                    self.options.log_level
                )));
            }
        }

        Ok(())
    }
}

fn validate_url(key: &str, url: &str) -> Result<()> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(Error::config(format!(
            "{key} must use HTTP or HTTPS scheme. Got: {url}"
        )));
    }
    Ok(())
}

fn parse_flag(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => Err(Error::config(format!(
            "{key} must be a boolean (true/false). Got: {other}"
        ))),
    }
}
