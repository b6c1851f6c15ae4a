// # rrsyncd - DNS record → smart sheet runner
//
// A THIN integration layer: all sync logic lives in rrsync-core.
//
// The runner is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Building the record source, sheet store and audit sink
// 4. Running the sync engine once and mapping the outcome to an exit code
//
// A scheduler (cron, systemd timer, serverless trigger) starts one process
// per run. Nothing is kept between runs.
//
// ## Configuration
//
// ### Mandatory
// - `RRSYNC_DNS_HOST`, `RRSYNC_DNS_USER`, `RRSYNC_DNS_PASSWORD`
// - `RRSYNC_SHEET_API_BASE`, `RRSYNC_SHEET_CORP_ID`, `RRSYNC_SHEET_CORP_SECRET`
// - `RRSYNC_SHEET_DOC_ID`, `RRSYNC_SHEET_ID`
// - `RRSYNC_AUDIT_ENDPOINT`, `RRSYNC_AUDIT_API_KEY`, `RRSYNC_AUDIT_COLLECTION`
//
// ### Optional
// - `RRSYNC_FIELD_NAME`, `RRSYNC_FIELD_RDATA`: sheet field titles
// - `RRSYNC_DELETE_ENABLED`: remove rows without a DNS record (default true)
// - `RRSYNC_AUDIT_ENABLED`: write run reports (default true)
// - `RRSYNC_DNS_ACCEPT_INVALID_CERTS`: trust self-signed DNS API certs (default false)
// - `RRSYNC_HTTP_TIMEOUT_SECS`: per-request timeout (default 30)
// - `RRSYNC_MODE`: `live` or `dry-run`
// - `RRSYNC_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export RRSYNC_DNS_HOST=https://10.0.0.53:20120
// export RRSYNC_DNS_USER=sync
// export RRSYNC_DNS_PASSWORD=...
// export RRSYNC_SHEET_API_BASE=https://qyapi.weixin.qq.com
// # ...remaining mandatory variables
// export RRSYNC_MODE=dry-run
//
// rrsyncd
// ```

use anyhow::Result;
use rrsync_core::harness::{self, Response};
use rrsync_core::{SyncConfig, SyncEngine, TracingLog};
use rrsync_sheet_wecom::WecomSheetStore;
use rrsync_source_zdns::ZdnsRecordSource;
use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Run completed
/// - 1: Configuration or startup error (no network call was made)
/// - 2: Runtime error (fetch or sheet failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunExitCode {
    /// Run completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<RunExitCode> for ExitCode {
    fn from(code: RunExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Response that turns the harness's empty success into an exit code
#[derive(Clone, Default)]
struct ExitResponse {
    completed: Rc<Cell<bool>>,
}

impl ExitResponse {
    fn exit_code(&self) -> RunExitCode {
        if self.completed.get() {
            RunExitCode::Success
        } else {
            RunExitCode::RuntimeError
        }
    }
}

impl Response for ExitResponse {
    fn empty(self) {
        self.completed.set(true);
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> ExitCode {
    // Load and validate configuration from environment
    let config = match SyncConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RunExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&config.options.log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RunExitCode::ConfigError.into();
    }

    info!("Starting rrsyncd");

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            return RunExitCode::ConfigError.into();
        }
    };

    // Single-threaded: every call is awaited in sequence
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RunExitCode::RuntimeError.into();
        }
    };

    let response = ExitResponse::default();
    let outcome = rt.block_on(harness::handle(&engine, response.clone(), &TracingLog));

    if let Err(e) = outcome {
        error!("Run failed: {}", e);
    }

    response.exit_code().into()
}

/// Build the engine from configuration
fn build_engine(config: &SyncConfig) -> Result<SyncEngine> {
    let timeout = Duration::from_secs(config.options.http_timeout_secs);

    let source = ZdnsRecordSource::new(&config.dns, timeout)?;
    let sheet = WecomSheetStore::new(&config.sheet, timeout, config.options.mode.is_dry_run())?;

    info!(
        "Target sheet {} in document {} (deletion {})",
        config.sheet.sheet_id,
        config.sheet.doc_id,
        if config.options.delete_enabled { "enabled" } else { "disabled" }
    );

    let engine = SyncEngine::new(Box::new(source), Box::new(sheet), &config.options);

    attach_audit(engine, config)
}

#[cfg(feature = "audit")]
fn attach_audit(engine: SyncEngine, config: &SyncConfig) -> Result<SyncEngine> {
    if !config.audit.enabled {
        info!("Run reporting disabled");
        return Ok(engine);
    }

    let timeout = Duration::from_secs(config.options.http_timeout_secs);
    let sink = rrsync_audit_http::HttpAuditSink::new(&config.audit, timeout)?;
    Ok(engine.with_audit(Box::new(sink)))
}

#[cfg(not(feature = "audit"))]
fn attach_audit(engine: SyncEngine, _config: &SyncConfig) -> Result<SyncEngine> {
    tracing::warn!("Built without the audit feature, run reports are not written");
    Ok(engine)
}
