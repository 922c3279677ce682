//! Row selection for reads
//!
//! - [`RowRange`]: half-open key interval `[start, end)`
//! - [`RowSet`]: explicit keys, a range, or the whole table

use crate::types::RowKey;

/// Smallest key greater than every key starting with `prefix`
///
/// Trailing `0xFF` bytes are stripped and the last remaining byte is
/// incremented. Returns `None` when no such key exists (empty prefix or a
/// prefix of only `0xFF`), meaning the range is unbounded above.
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(&last) = end.last() {
        if last == 0xFF {
            end.pop();
        } else {
            let idx = end.len() - 1;
            end[idx] = last + 1;
            return Some(end);
        }
    }
    None
}

/// Half-open interval of row keys
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowRange {
    /// Inclusive lower bound (empty = start of table)
    pub start: Vec<u8>,
    /// Exclusive upper bound (`None` = end of table)
    pub end: Option<Vec<u8>>,
}

impl RowRange {
    /// Range `[start, end)`
    pub fn new(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            end: Some(end.into()),
        }
    }

    /// Every key `>= start`
    pub fn infinite(start: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            end: None,
        }
    }

    /// Every key starting with `prefix`
    ///
    /// # Examples
    ///
    /// ```
    /// use hellotable_core::{RowKey, RowRange};
    ///
    /// let range = RowRange::prefix("testColumn");
    /// assert!(range.contains(&RowKey::from("testColumn0")));
    /// assert!(!range.contains(&RowKey::from("testColumo")));
    /// ```
    pub fn prefix(prefix: impl AsRef<[u8]>) -> Self {
        let prefix = prefix.as_ref();
        Self {
            start: prefix.to_vec(),
            end: prefix_successor(prefix),
        }
    }

    /// Check whether `key` falls inside the range
    pub fn contains(&self, key: &RowKey) -> bool {
        let key = key.as_bytes();
        if key < self.start.as_slice() {
            return false;
        }
        match &self.end {
            Some(end) => key < end.as_slice(),
            None => true,
        }
    }

    /// True when the range cannot contain any key
    pub fn is_empty(&self) -> bool {
        matches!(&self.end, Some(end) if end.as_slice() <= self.start.as_slice())
    }
}

/// Rows a read should visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSet {
    /// Exactly these keys
    Keys(Vec<RowKey>),
    /// Every key in the range
    Range(RowRange),
    /// Every row of the table
    All,
}

impl RowSet {
    /// A single key
    pub fn single(key: impl Into<RowKey>) -> Self {
        RowSet::Keys(vec![key.into()])
    }

    /// Check whether `key` is selected
    pub fn contains(&self, key: &RowKey) -> bool {
        match self {
            RowSet::Keys(keys) => keys.contains(key),
            RowSet::Range(range) => range.contains(key),
            RowSet::All => true,
        }
    }
}

impl From<RowRange> for RowSet {
    fn from(range: RowRange) -> Self {
        RowSet::Range(range)
    }
}
