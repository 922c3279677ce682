//! Request bodies

use base64::Engine;
use hellotable_core::{Mutation, MutationOp, RowFilter, RowKey, RowSet};
use serde_json::{json, Map, Value};

/// Base64 (standard alphabet, padded) as used for every bytes field
pub fn encode_bytes(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Value of the `x-goog-request-params` routing header
pub fn routing_header(param: &str, resource: &str) -> String {
    format!("{}={}", param, resource.replace('/', "%2F"))
}

fn with_app_profile(mut body: Map<String, Value>, app_profile_id: Option<&str>) -> Value {
    if let Some(profile) = app_profile_id {
        body.insert("appProfileId".into(), Value::String(profile.to_string()));
    }
    Value::Object(body)
}

/// `POST .../tables`
pub fn create_table_request(table: &str) -> Value {
    json!({ "tableId": table, "table": {} })
}

/// `POST .../tables/{t}:modifyColumnFamilies`
pub fn create_family_request(family: &str) -> Value {
    json!({ "modifications": [{ "id": family, "create": {} }] })
}

/// `POST .../tables/{t}:dropRowRange`
pub fn drop_row_range_request(prefix: &[u8]) -> Value {
    json!({ "rowKeyPrefix": encode_bytes(prefix) })
}

fn encode_mutation_op(op: &MutationOp) -> Value {
    match op {
        MutationOp::SetCell {
            family,
            qualifier,
            timestamp,
            value,
        } => json!({
            "setCell": {
                "familyName": family,
                "columnQualifier": encode_bytes(qualifier.as_bytes()),
                "timestampMicros": timestamp.as_micros().to_string(),
                "value": encode_bytes(value),
            }
        }),
        MutationOp::DeleteFromColumn { family, qualifier } => json!({
            "deleteFromColumn": {
                "familyName": family,
                "columnQualifier": encode_bytes(qualifier.as_bytes()),
            }
        }),
        MutationOp::DeleteFromFamily { family } => json!({
            "deleteFromFamily": { "familyName": family }
        }),
        MutationOp::DeleteFromRow => json!({ "deleteFromRow": {} }),
    }
}

/// `POST .../tables/{t}:mutateRows`
pub fn mutate_rows_request(
    keys: &[RowKey],
    mutations: &[Mutation],
    app_profile_id: Option<&str>,
) -> Value {
    let entries: Vec<Value> = keys
        .iter()
        .zip(mutations)
        .map(|(key, mutation)| {
            json!({
                "rowKey": encode_bytes(key.as_bytes()),
                "mutations": mutation.ops().iter().map(encode_mutation_op).collect::<Vec<_>>(),
            })
        })
        .collect();
    let mut body = Map::new();
    body.insert("entries".into(), Value::Array(entries));
    with_app_profile(body, app_profile_id)
}

fn encode_filter(filter: &RowFilter) -> Value {
    match filter {
        RowFilter::PassAll => json!({ "passAllFilter": true }),
        RowFilter::ColumnQualifierRegex(p) => {
            json!({ "columnQualifierRegexFilter": encode_bytes(p.as_bytes()) })
        }
        RowFilter::FamilyNameRegex(p) => json!({ "familyNameRegexFilter": p }),
        RowFilter::CellsPerColumnLimit(n) => json!({ "cellsPerColumnLimitFilter": n }),
        RowFilter::Chain(filters) => json!({
            "chain": { "filters": filters.iter().map(encode_filter).collect::<Vec<_>>() }
        }),
    }
}

fn encode_row_set(rows: &RowSet) -> Option<Value> {
    match rows {
        RowSet::All => None,
        RowSet::Keys(keys) => Some(json!({
            "rowKeys": keys.iter().map(|k| encode_bytes(k.as_bytes())).collect::<Vec<_>>()
        })),
        RowSet::Range(range) => {
            let mut r = Map::new();
            if !range.start.is_empty() {
                r.insert("startKeyClosed".into(), Value::String(encode_bytes(&range.start)));
            }
            if let Some(end) = &range.end {
                r.insert("endKeyOpen".into(), Value::String(encode_bytes(end)));
            }
            Some(json!({ "rowRanges": [Value::Object(r)] }))
        }
    }
}

/// `POST .../tables/{t}:readRows`
pub fn read_rows_request(
    rows: &RowSet,
    filter: Option<&RowFilter>,
    app_profile_id: Option<&str>,
) -> Value {
    let mut body = Map::new();
    if let Some(rows) = encode_row_set(rows) {
        body.insert("rows".into(), rows);
    }
    if let Some(filter) = filter {
        body.insert("filter".into(), encode_filter(filter));
    }
    with_app_profile(body, app_profile_id)
}
