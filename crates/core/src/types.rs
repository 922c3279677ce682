//! Data model types
//!
//! This module defines the fundamental types used throughout the system:
//! - [`RowKey`]: Byte-string key, rows are sorted by it
//! - [`Timestamp`]: Cell version in microseconds
//! - [`Cell`] / [`Row`]: What a read returns
//! - [`TableInfo`] / [`SampleKey`]: Admin and sampling results

use serde::{Serialize, Serializer};
use std::fmt;

/// Key identifying a row
///
/// Keys are arbitrary bytes and rows are ordered lexicographically by them.
/// Most keys in practice are UTF-8, so conversions from `&str` and `String`
/// are provided and [`Display`](fmt::Display) renders lossily.
///
/// # Examples
///
/// ```
/// use hellotable_core::RowKey;
///
/// let a = RowKey::from("testColumn0");
/// let b = RowKey::from("testColumn1");
/// assert!(a < b);
/// assert_eq!(a.to_string(), "testColumn0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowKey(Vec<u8>);

impl RowKey {
    /// Create a key from raw bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        RowKey(bytes.into())
    }

    /// Raw bytes of the key
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the key, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// True for the empty key, which the service uses as "end of table"
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether this key starts with `prefix`
    pub fn has_prefix(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey(s.as_bytes().to_vec())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        RowKey(s.into_bytes())
    }
}

impl From<Vec<u8>> for RowKey {
    fn from(bytes: Vec<u8>) -> Self {
        RowKey(bytes)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for RowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Cell version, in microseconds since the Unix epoch
///
/// The service only accepts millisecond granularity, so [`Timestamp::now`]
/// truncates to a whole millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current wall-clock time truncated to the millisecond
    pub fn now() -> Self {
        Self::from_micros(chrono::Utc::now().timestamp_micros()).truncate_to_millis()
    }

    /// Wrap a raw microsecond value
    pub fn from_micros(micros: i64) -> Self {
        Timestamp(micros)
    }

    /// Microseconds since the epoch
    pub fn as_micros(&self) -> i64 {
        self.0
    }

    /// Drop the sub-millisecond part
    pub fn truncate_to_millis(self) -> Self {
        Timestamp(self.0 - self.0.rem_euclid(1000))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One versioned value at (row, family, qualifier)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Column family name
    pub family: String,
    /// Column qualifier
    pub qualifier: String,
    /// Version of this value
    pub timestamp: Timestamp,
    /// Stored bytes
    pub value: Vec<u8>,
}

impl Cell {
    /// Value rendered as text, replacing invalid UTF-8
    pub fn value_lossy(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

/// A row as returned by a read
///
/// Cells are grouped by family, then qualifier, newest version first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Key of the row
    pub key: RowKey,
    /// Cells that survived the read filter
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a row, putting `cells` into canonical order
    pub fn new(key: RowKey, mut cells: Vec<Cell>) -> Self {
        cells.sort_by(|a, b| {
            a.family
                .cmp(&b.family)
                .then_with(|| a.qualifier.cmp(&b.qualifier))
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        Self { key, cells }
    }

    /// Cells of one family, in canonical order
    pub fn family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.iter().filter(move |c| c.family == family)
    }

    /// First value of a family (newest version of its first column)
    pub fn first_value(&self, family: &str) -> Option<&[u8]> {
        self.cells
            .iter()
            .find(|c| c.family == family)
            .map(|c| c.value.as_slice())
    }

    /// True when the filter left nothing in this row
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Schema summary of a table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TableInfo {
    /// Short table name (without the project/instance path)
    pub name: String,
    /// Column family names, sorted
    pub families: Vec<String>,
}

/// Approximate split point reported by `sample_row_keys`
///
/// `offset_bytes` is the approximate amount of data stored before `key`.
/// The last sample of a table has an empty key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleKey {
    /// Row key at the split point
    pub key: RowKey,
    /// Approximate bytes stored before `key`
    pub offset_bytes: u64,
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.offset_bytes)
    }
}
