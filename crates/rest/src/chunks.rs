//! Reassembly of `readRows` cell chunks into rows
//!
//! The service streams each row as a run of chunks. A chunk either starts a
//! cell (carrying any of row key, family, qualifier that changed), continues
//! a cell whose value was split (`valueSize > 0` on every part but the last),
//! commits the row, or resets it. Rows arrive in strictly increasing key
//! order.
//!
//! # State
//!
//! - `NewRow`: next chunk must start a row (key, family, qualifier all set)
//! - `RowInProgress`: next chunk starts a cell of the current row or resets it
//! - `CellInProgress`: next chunk must continue the split value

use crate::wire::{decode_bytes, WireChunk};
use hellotable_core::{Cell, Error, Result, Row, RowKey, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NewRow,
    RowInProgress,
    CellInProgress,
}

/// Incremental chunk-to-row assembler
#[derive(Debug)]
pub struct ChunkMerger {
    state: State,
    last_key: Option<RowKey>,
    key: Option<RowKey>,
    family: Option<String>,
    qualifier: Option<String>,
    timestamp: Timestamp,
    value: Vec<u8>,
    cells: Vec<Cell>,
}

fn protocol(message: &str) -> Error {
    Error::Protocol(format!("invalid chunk sequence: {}", message))
}

impl ChunkMerger {
    pub fn new() -> Self {
        Self {
            state: State::NewRow,
            last_key: None,
            key: None,
            family: None,
            qualifier: None,
            timestamp: Timestamp::from_micros(0),
            value: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Feed one chunk; returns the row it completes, if any
    pub fn push(&mut self, chunk: &WireChunk) -> Result<Option<Row>> {
        if chunk.reset_row {
            return self.reset(chunk).map(|_| None);
        }

        match self.state {
            State::NewRow => self.start_row(chunk)?,
            State::RowInProgress => self.start_cell(chunk)?,
            State::CellInProgress => {
                if chunk.row_key.is_some()
                    || chunk.family_name.is_some()
                    || chunk.qualifier.is_some()
                    || chunk.timestamp_micros.is_some()
                {
                    return Err(protocol("cell continuation changes coordinates"));
                }
            }
        }

        if let Some(value) = &chunk.value {
            self.value.extend(decode_bytes("value", value)?);
        }

        if chunk.value_size > 0 {
            self.state = State::CellInProgress;
            if chunk.commit_row {
                return Err(protocol("commit inside a split value"));
            }
            return Ok(None);
        }

        self.finish_cell()?;
        self.state = State::RowInProgress;

        if chunk.commit_row {
            return self.commit().map(Some);
        }
        Ok(None)
    }

    /// Check that the stream did not stop in the middle of a row
    pub fn finish(&self) -> Result<()> {
        if self.state != State::NewRow {
            return Err(protocol("response ended before the row was committed"));
        }
        Ok(())
    }

    fn reset(&mut self, chunk: &WireChunk) -> Result<()> {
        if self.state == State::NewRow {
            return Err(protocol("reset outside of a row"));
        }
        if chunk.row_key.is_some()
            || chunk.family_name.is_some()
            || chunk.qualifier.is_some()
            || chunk.value.is_some()
            || chunk.timestamp_micros.is_some()
        {
            return Err(protocol("reset chunk carries data"));
        }
        self.clear_row();
        Ok(())
    }

    fn start_row(&mut self, chunk: &WireChunk) -> Result<()> {
        let encoded = chunk
            .row_key
            .as_deref()
            .ok_or_else(|| protocol("new row without a key"))?;
        let key = RowKey::from_bytes(decode_bytes("rowKey", encoded)?);
        if key.is_empty() {
            return Err(protocol("new row with an empty key"));
        }
        if matches!(&self.last_key, Some(last) if key <= *last) {
            return Err(protocol("row keys out of order"));
        }
        if chunk.family_name.is_none() || chunk.qualifier.is_none() {
            return Err(protocol("new row without family and qualifier"));
        }
        self.key = Some(key);
        self.family = None;
        self.qualifier = None;
        self.start_cell(chunk)
    }

    fn start_cell(&mut self, chunk: &WireChunk) -> Result<()> {
        if let Some(encoded) = &chunk.row_key {
            let key = RowKey::from_bytes(decode_bytes("rowKey", encoded)?);
            if self.key.as_ref() != Some(&key) {
                return Err(protocol("row key changed mid-row"));
            }
        }
        if let Some(family) = &chunk.family_name {
            if chunk.qualifier.is_none() {
                return Err(protocol("family without qualifier"));
            }
            self.family = Some(family.clone());
        }
        if let Some(encoded) = &chunk.qualifier {
            let raw = decode_bytes("qualifier", encoded)?;
            self.qualifier = Some(String::from_utf8_lossy(&raw).into_owned());
        }
        self.timestamp = Timestamp::from_micros(chunk.timestamp_micros.unwrap_or(0));
        self.value.clear();
        Ok(())
    }

    fn finish_cell(&mut self) -> Result<()> {
        let (family, qualifier) = match (&self.family, &self.qualifier) {
            (Some(f), Some(q)) => (f.clone(), q.clone()),
            _ => return Err(protocol("cell without family and qualifier")),
        };
        self.cells.push(Cell {
            family,
            qualifier,
            timestamp: self.timestamp,
            value: std::mem::take(&mut self.value),
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<Row> {
        let key = self
            .key
            .take()
            .ok_or_else(|| protocol("commit without a row"))?;
        let cells = std::mem::take(&mut self.cells);
        self.last_key = Some(key.clone());
        self.clear_row();
        Ok(Row::new(key, cells))
    }

    fn clear_row(&mut self) {
        self.state = State::NewRow;
        self.key = None;
        self.family = None;
        self.qualifier = None;
        self.value.clear();
        self.cells.clear();
    }
}

impl Default for ChunkMerger {
    fn default() -> Self {
        Self::new()
    }
}
