//! Row mutations
//!
//! A [`Mutation`] is an ordered list of edits applied atomically to one row.

use crate::types::Timestamp;

/// A single edit inside a [`Mutation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOp {
    /// Write `value` at (family, qualifier, timestamp)
    SetCell {
        /// Column family
        family: String,
        /// Column qualifier
        qualifier: String,
        /// Version to write
        timestamp: Timestamp,
        /// Bytes to store
        value: Vec<u8>,
    },

    /// Remove every version of one column
    DeleteFromColumn {
        /// Column family
        family: String,
        /// Column qualifier
        qualifier: String,
    },

    /// Remove every column of one family
    DeleteFromFamily {
        /// Column family
        family: String,
    },

    /// Remove the whole row
    DeleteFromRow,
}

/// Ordered edits for one row
///
/// # Examples
///
/// ```
/// use hellotable_core::{Mutation, Timestamp};
///
/// let mut m = Mutation::new();
/// m.set("cf1", "testColumn", Timestamp::now(), b"Hello World!".to_vec());
/// assert_eq!(m.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mutation {
    ops: Vec<MutationOp>,
}

impl Mutation {
    /// Create an empty mutation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell write
    pub fn set(
        &mut self,
        family: impl Into<String>,
        qualifier: impl Into<String>,
        timestamp: Timestamp,
        value: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.ops.push(MutationOp::SetCell {
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp,
            value: value.into(),
        });
        self
    }

    /// Append a column delete
    pub fn delete_column(
        &mut self,
        family: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(MutationOp::DeleteFromColumn {
            family: family.into(),
            qualifier: qualifier.into(),
        });
        self
    }

    /// Append a family delete
    pub fn delete_family(&mut self, family: impl Into<String>) -> &mut Self {
        self.ops.push(MutationOp::DeleteFromFamily {
            family: family.into(),
        });
        self
    }

    /// Append a whole-row delete
    pub fn delete_row(&mut self) -> &mut Self {
        self.ops.push(MutationOp::DeleteFromRow);
        self
    }

    /// Edits in application order
    pub fn ops(&self) -> &[MutationOp] {
        &self.ops
    }

    /// Number of edits
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
