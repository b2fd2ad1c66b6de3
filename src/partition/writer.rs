//! Partition writer.

use std::sync::Arc;

use bytes::BytesMut;

use crate::row::{Row, Schema};

use super::error::PartitionError;
use super::handle::Partition;
use super::manager::ManagerShared;

/// Appends serialized rows into a not-yet-registered partition.
///
/// Rows are packed back to back with no framing; readers recover row
/// boundaries by decoding with the partition's schema.
pub struct PartitionWriter {
    owner: Arc<ManagerShared>,
    schema: Schema,
    capacity: usize,
    buf: BytesMut,
    num_rows: usize,
}

impl PartitionWriter {
    pub(super) fn new(owner: Arc<ManagerShared>, schema: Schema, capacity: usize) -> Self {
        Self {
            owner,
            schema,
            capacity,
            buf: BytesMut::new(),
            num_rows: 0,
        }
    }

    /// Returns the schema every appended row must carry.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the number of rows appended so far.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns true if no rows have been appended.
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Returns the number of bytes still free.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.buf.len())
    }

    /// Serializes `row` at the end of the partition.
    ///
    /// # Errors
    ///
    /// - `PartitionError::SchemaMismatch` if the row's schema differs
    /// - `PartitionError::PartitionFull` if the row does not fit; the writer is unchanged
    pub fn append(&mut self, row: &Row) -> Result<(), PartitionError> {
        if row.schema() != &self.schema {
            return Err(PartitionError::SchemaMismatch {
                expected: self.schema.clone(),
                actual: row.schema().clone(),
            });
        }

        let required = row.serialized_len();
        let available = self.remaining();
        if required > available {
            return Err(PartitionError::PartitionFull {
                required,
                available,
            });
        }

        let start = self.buf.len();
        self.buf.resize(start + required, 0);
        if let Err(e) = row.serialize(&mut self.buf[start..]) {
            self.buf.truncate(start);
            return Err(e.into());
        }
        self.num_rows += 1;
        Ok(())
    }

    /// Appends pre-encoded bytes without validation, for corrupt-input tests.
    #[cfg(test)]
    pub(crate) fn append_raw(&mut self, bytes: &[u8], num_rows: usize) {
        self.buf.extend_from_slice(bytes);
        self.num_rows += num_rows;
    }

    /// Registers the partition with the manager.
    ///
    /// # Errors
    ///
    /// Returns `PartitionError::OutOfMemory` if the manager's budget is exhausted.
    pub fn finish(self) -> Result<Partition, PartitionError> {
        self.owner
            .register(self.schema, self.num_rows, self.capacity, self.buf.freeze())
    }
}
