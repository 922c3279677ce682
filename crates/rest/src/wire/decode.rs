//! Response bodies

use base64::Engine;
use hellotable_core::{Error, RowError, RowKey, SampleKey, TableInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Decode error types
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Body is not the JSON we expected
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// A bytes field is not valid base64
    #[error("invalid base64 in {field}: {reason}")]
    InvalidBase64 {
        /// Field being decoded
        field: &'static str,
        /// Decoder message
        reason: String,
    },

    /// Response refers to an entry that was never sent
    #[error("entry index {index} out of range for {len} entries")]
    IndexOutOfRange {
        /// Reported index
        index: i64,
        /// Entries in the request
        len: usize,
    },
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Protocol(e.to_string())
    }
}

/// Decode a base64 bytes field
pub fn decode_bytes(field: &'static str, encoded: &str) -> Result<Vec<u8>, DecodeError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| DecodeError::InvalidBase64 {
            field,
            reason: e.to_string(),
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Int64Repr {
    Num(i64),
    Str(String),
}

/// int64 fields arrive as strings, but tolerate plain numbers
fn de_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<Int64Repr>::deserialize(d)? {
        None => Ok(None),
        Some(Int64Repr::Num(n)) => Ok(Some(n)),
        Some(Int64Repr::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// `GET .../tables`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTablesResponse {
    /// Tables on this page
    #[serde(default)]
    pub tables: Vec<TableResource>,
    /// Token for the next page; absent or empty on the last one
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A table resource; families are only present in schema views
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResource {
    /// Full resource name
    pub name: String,
    /// Family name to family settings
    #[serde(default)]
    pub column_families: BTreeMap<String, serde_json::Value>,
}

impl TableResource {
    /// Last path segment of `projects/p/instances/i/tables/<id>`
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Status of one bulk entry; code 0 is success
#[derive(Debug, Default, Deserialize)]
pub struct WireStatus {
    /// Canonical status code
    #[serde(default)]
    pub code: i32,
    /// Service message
    #[serde(default)]
    pub message: String,
}

/// Outcome of one `mutateRows` entry
#[derive(Debug, Deserialize)]
pub struct MutateEntry {
    /// Position of the entry in the request
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub index: Option<i64>,
    /// Result of the entry
    #[serde(default)]
    pub status: Option<WireStatus>,
}

/// One message of the `mutateRows` stream
#[derive(Debug, Default, Deserialize)]
pub struct MutateRowsResponse {
    /// Entries reported in this message
    #[serde(default)]
    pub entries: Vec<MutateEntry>,
}

/// A cell fragment of the `readRows` stream
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireChunk {
    /// Base64 row key, set on the first chunk of a row
    #[serde(default)]
    pub row_key: Option<String>,
    /// Family, set when it changes
    #[serde(default)]
    pub family_name: Option<String>,
    /// Base64 qualifier, set when it changes
    #[serde(default)]
    pub qualifier: Option<String>,
    /// Cell version
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub timestamp_micros: Option<i64>,
    /// Base64 value, or one part of it
    #[serde(default)]
    pub value: Option<String>,
    /// Full value size while the value is split, else 0
    #[serde(default)]
    pub value_size: i32,
    /// Discard the row in progress
    #[serde(default)]
    pub reset_row: bool,
    /// The row in progress is complete
    #[serde(default)]
    pub commit_row: bool,
}

/// One message of the `readRows` stream
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRowsResponse {
    /// Cell chunks in stream order
    #[serde(default)]
    pub chunks: Vec<WireChunk>,
}

/// One message of the `sampleRowKeys` stream
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRowKeysResponse {
    /// Base64 split key; empty or absent at the end of the table
    #[serde(default)]
    pub row_key: Option<String>,
    /// Approximate bytes before the key
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub offset_bytes: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Parse a streamed response: a JSON array of messages, a lone message, or nothing
pub fn decode_stream<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, DecodeError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    let messages = match value {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };
    messages
        .into_iter()
        .map(|m| serde_json::from_value(m).map_err(|e| DecodeError::InvalidJson(e.to_string())))
        .collect()
}

/// Short names of the listed tables
pub fn table_names(page: &ListTablesResponse) -> Vec<String> {
    page.tables.iter().map(|t| t.short_name().to_string()).collect()
}

/// Schema summary of a table resource
pub fn table_info(table: &TableResource) -> TableInfo {
    TableInfo {
        name: table.short_name().to_string(),
        families: table.column_families.keys().cloned().collect(),
    }
}

/// Per-row failures of a `mutateRows` call
///
/// Entries the service never reported on are counted as failed.
pub fn bulk_errors(
    responses: &[MutateRowsResponse],
    keys: &[RowKey],
) -> Result<Vec<RowError>, DecodeError> {
    let mut statuses: Vec<Option<Error>> = vec![
        Some(Error::Internal("no status reported for entry".into()));
        keys.len()
    ];
    for entry in responses.iter().flat_map(|r| &r.entries) {
        let index = entry.index.unwrap_or(0);
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| statuses.get_mut(i))
            .ok_or(DecodeError::IndexOutOfRange {
                index,
                len: keys.len(),
            })?;
        *slot = match &entry.status {
            Some(status) if status.code != 0 => {
                Some(Error::from_code(status.code, status.message.clone()))
            }
            _ => None,
        };
    }
    Ok(statuses
        .into_iter()
        .enumerate()
        .filter_map(|(index, status)| {
            status.map(|error| RowError {
                index,
                key: keys[index].clone(),
                error,
            })
        })
        .collect())
}

/// Sampled split points
pub fn sample_keys(responses: &[SampleRowKeysResponse]) -> Result<Vec<SampleKey>, DecodeError> {
    responses
        .iter()
        .map(|r| {
            let key = match &r.row_key {
                Some(encoded) => decode_bytes("rowKey", encoded)?,
                None => Vec::new(),
            };
            Ok(SampleKey {
                key: RowKey::from_bytes(key),
                offset_bytes: r.offset_bytes.unwrap_or(0).max(0) as u64,
            })
        })
        .collect()
}

/// Turn a non-success HTTP response into a client error
///
/// Prefers the canonical status in the error envelope and falls back to the
/// HTTP status code when the body is not an envelope.
pub fn error_from_response(http_status: u16, body: &str) -> Error {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = if envelope.error.message.is_empty() {
        format!("HTTP {}: {}", http_status, body.trim())
    } else {
        envelope.error.message
    };
    if !envelope.error.status.is_empty() {
        return Error::from_status(&envelope.error.status, message);
    }
    let status = match http_status {
        400 => "INVALID_ARGUMENT",
        401 => "UNAUTHENTICATED",
        403 => "PERMISSION_DENIED",
        404 => "NOT_FOUND",
        409 => "ALREADY_EXISTS",
        429 | 502 | 503 | 504 => "UNAVAILABLE",
        _ => "INTERNAL",
    };
    Error::from_status(status, message)
}
