//! JSON wire encoding for the service's v2 API
//!
//! The JSON mapping of the service's messages follows the usual rules:
//!
//! | Field type | JSON encoding |
//! |------------|---------------|
//! | bytes | base64 string |
//! | int64 / uint64 | decimal string (numbers accepted on decode) |
//! | enum | name string |
//! | message | object, camelCase field names |
//!
//! Server-streaming methods (`readRows`, `mutateRows`, `sampleRowKeys`)
//! answer with a JSON array of messages.

mod decode;
mod encode;

pub use decode::{
    bulk_errors, decode_bytes, decode_stream, error_from_response, sample_keys, table_info, table_names,
    DecodeError, ListTablesResponse, MutateRowsResponse, ReadRowsResponse, SampleRowKeysResponse,
    TableResource, WireChunk,
};
pub use encode::{
    create_family_request, create_table_request, drop_row_range_request, encode_bytes,
    mutate_rows_request, read_rows_request, routing_header,
};
