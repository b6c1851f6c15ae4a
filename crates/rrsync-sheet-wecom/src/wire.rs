//! Request and response shapes of the smart-sheet API
//!
//! Cells arrive as lists of typed fragments. Only the text of `text`
//! fragments (or of any fragment carrying a `text` key) is kept; the
//! fragments of one cell are concatenated in order.

use rrsync_core::{Error, FieldNames, Result, SheetRow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Values are keyed by field title rather than field id
pub(crate) const KEY_TYPE_FIELD_TITLE: &str = "CELL_VALUE_KEY_TYPE_FIELD_TITLE";

/// Status envelope shared by every response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetRecordsRequest<'a> {
    pub docid: &'a str,
    pub sheet_id: &'a str,
    pub key_type: &'static str,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRecord {
    pub record_id: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetRecordsResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddRecord<'a> {
    /// Client-chosen temporary id
    pub record_id: &'a str,
    pub values: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddRecordsRequest<'a> {
    pub docid: &'a str,
    pub sheet_id: &'a str,
    pub key_type: &'static str,
    pub records: Vec<AddRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRecord<'a> {
    pub record_id: &'a str,
    pub values: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRecordsRequest<'a> {
    pub docid: &'a str,
    pub sheet_id: &'a str,
    pub key_type: &'static str,
    pub records: Vec<UpdateRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRecordsRequest<'a> {
    pub docid: &'a str,
    pub sheet_id: &'a str,
    pub record_ids: &'a [String],
}

/// Body of add_records / update_records
#[derive(Debug, Deserialize)]
pub(crate) struct MutationResponse {
    #[serde(default)]
    pub records: Vec<Value>,
}

/// Fail on a non-zero `errcode`
pub(crate) fn check_status(service: &str, action: &str, body: &str) -> Result<()> {
    let status: ApiStatus = serde_json::from_str(body)
        .map_err(|e| Error::sheet(format!("{service}: invalid {action} response: {e}")))?;
    if status.errcode != 0 {
        return Err(Error::api(
            service,
            status.errcode,
            format!("{action}: {}", status.errmsg),
        ));
    }
    Ok(())
}

/// Plain text of one cell
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(fragments) => fragments
            .iter()
            .filter_map(|f| f.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    }
}

/// One plain-text fragment, the shape written for both fields
pub fn text_cell(text: &str) -> Value {
    json!([{ "type": "text", "text": text }])
}

/// Values map for a row with the given name and rdata
pub fn encode_values(fields: &FieldNames, name: &str, rdata: &str) -> Map<String, Value> {
    let mut values = Map::new();
    values.insert(fields.name.clone(), text_cell(name));
    values.insert(fields.rdata.clone(), text_cell(rdata));
    values
}

/// Convert a wire record into a sheet row; absent fields read as empty
pub(crate) fn decode_row(fields: &FieldNames, record: WireRecord) -> SheetRow {
    let text_of = |field: &str| record.values.get(field).map(cell_text).unwrap_or_default();
    let name = text_of(&fields.name);
    let rdata = text_of(&fields.rdata);
    SheetRow {
        record_id: record.record_id,
        name,
        rdata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_fragments() {
        let cell = json!([
            {"type": "text", "text": "www."},
            {"type": "url", "text": "example.com", "link": "https://example.com"}
        ]);
        assert_eq!(cell_text(&cell), "www.example.com");
    }

    #[test]
    fn empty_and_odd_cells_read_as_empty() {
        assert_eq!(cell_text(&json!([])), "");
        assert_eq!(cell_text(&json!(42)), "");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!("plain")), "plain");
    }

    #[test]
    fn decodes_configured_fields() {
        let fields = FieldNames::default();
        let record: WireRecord = serde_json::from_value(json!({
            "record_id": "r1",
            "values": {
                "信息系统域名": [{"type": "text", "text": "a.com"}],
                "域名解析记录": [{"type": "text", "text": "1.1.1.1,::1"}],
                "负责人": [{"type": "user", "user_id": "u1"}]
            }
        }))
        .unwrap();

        assert_eq!(
            decode_row(&fields, record),
            SheetRow::new("r1", "a.com", "1.1.1.1,::1")
        );
    }

    #[test]
    fn missing_field_decodes_to_empty_name() {
        let record: WireRecord =
            serde_json::from_value(json!({"record_id": "r2", "values": {}})).unwrap();
        let row = decode_row(&FieldNames::default(), record);
        assert_eq!(row.name, "");
        assert_eq!(row.rdata, "");
    }

    #[test]
    fn encodes_single_text_fragments() {
        let fields = FieldNames {
            name: "Host".to_string(),
            rdata: "Target".to_string(),
        };
        let values = encode_values(&fields, "a.com", "1.1.1.1");

        assert_eq!(
            Value::Object(values),
            json!({
                "Host": [{"type": "text", "text": "a.com"}],
                "Target": [{"type": "text", "text": "1.1.1.1"}]
            })
        );
    }

    #[test]
    fn nonzero_errcode_is_an_api_error() {
        let err = check_status("wecom", "get_records", r#"{"errcode": 40014, "errmsg": "invalid access_token"}"#)
            .unwrap_err();
        match err {
            Error::Api { code, message, .. } => {
                assert_eq!(code, 40014);
                assert_eq!(message, "get_records: invalid access_token");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(check_status("wecom", "get_records", r#"{"errcode": 0, "errmsg": "ok"}"#).is_ok());
    }
}
