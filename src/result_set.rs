//! Ordered, bounded delivery of query results.
//!
//! A [`ResultSet`] owns the partitions a query produced and turns them into
//! a single row stream for a consumer. Rows come from two places:
//!
//! - **Partitions**, decoded lazily one row at a time with the result schema
//! - **Fallback rows**, `(origin index, object)` pairs produced by the
//!   interpreter for input rows the compiled path could not handle
//!
//! Fallback rows are merged back by origin index. The result set keeps a
//! logical row counter that advances once per partition row and once per
//! distinct fallback index; a fallback entry is emitted as soon as its index
//! is not ahead of that counter. Several entries may share an index (one
//! input row expanding into many output rows), and all of them are emitted
//! before the counter moves on.
//!
//! ```text
//! partitions:   [r0 r1] [r3 r4]          logical:  0  1  2  3  4
//! fallback:     (2, o2)                  emitted:  r0 r1 o2 r3 r4
//! ```
//!
//! Error partitions are held only so they are released with the result set;
//! their rows are reported through a separate path and never merged here.
//!
//! # Example
//!
//! ```
//! use resultset::datum::{Type, Value};
//! use resultset::fallback::{FallbackObject, FallbackValue};
//! use resultset::partition::PartitionManager;
//! use resultset::result_set::{ResultSet, RowLimit};
//! use resultset::row::{Row, Schema};
//!
//! let manager = PartitionManager::default();
//! let schema = Schema::new(vec![Type::Int8]);
//! let rows: Vec<Row> = [0, 1, 3]
//!     .into_iter()
//!     .map(|n| Row::new(schema.clone(), vec![Value::Int64(n)]).unwrap())
//!     .collect();
//! let partitions = manager.partition_rows(&schema, &rows).unwrap();
//! let fallback = vec![(2, FallbackObject::new(FallbackValue::Int(2)))];
//!
//! let mut result = ResultSet::new(schema, partitions, Vec::new(), fallback, RowLimit::Unbounded);
//! let values: Vec<Value> = result
//!     .rows()
//!     .map(|row| row.unwrap().values()[0].clone())
//!     .collect();
//! assert_eq!(values, [0, 1, 2, 3].map(Value::Int64));
//! assert_eq!(manager.stats().live_partitions, 0);
//! ```

mod cursor;
mod error;
mod iter;
mod limit;

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::datum::SerializationError;
use crate::fallback::{self, FallbackObject};
use crate::partition::Partition;
use crate::row::{Row, Schema};

use cursor::Cursor;

pub use error::ResultSetError;
pub use iter::{Partitions, Rows};
pub use limit::RowLimit;

/// Single-consumer cursor over a query's partitions and fallback rows.
///
/// Every partition handed to the result set is released exactly once: when
/// it has been fully read row by row, when [`clear`](Self::clear) runs, or
/// when the result set is dropped. Partitions with no rows are released
/// right away by [`new`](Self::new). Partitions taken with
/// [`get_next_partition`](Self::get_next_partition) belong to the caller.
///
/// # Thread Safety
///
/// The result set itself is not shared. Partition bytes are only accessed
/// through [`Partition::lock`] for the duration of one decode, and fallback
/// conversion holds the process-wide interpreter lock for one object.
#[derive(Debug)]
pub struct ResultSet {
    schema: Schema,
    partitions: VecDeque<Partition>,
    exceptions: Vec<Partition>,
    fallback_rows: VecDeque<(usize, FallbackObject)>,
    cursor: Cursor,
    max_rows: usize,
}

impl ResultSet {
    /// Creates a result set. No rows are decoded until they are pulled.
    ///
    /// # Arguments
    ///
    /// * `schema` - Schema every data partition must carry
    /// * `partitions` - Data partitions in output order
    /// * `exceptions` - Error partitions, held until release
    /// * `fallback_rows` - `(origin index, object)` pairs sorted by non-decreasing index
    /// * `max_rows` - Upper bound on delivered rows
    ///
    /// Data partitions without rows are released immediately.
    pub fn new(
        schema: Schema,
        partitions: impl IntoIterator<Item = Partition>,
        exceptions: impl IntoIterator<Item = Partition>,
        fallback_rows: impl IntoIterator<Item = (usize, FallbackObject)>,
        max_rows: impl Into<RowLimit>,
    ) -> Self {
        let mut queue = VecDeque::new();
        for partition in partitions {
            if partition.num_rows() == 0 {
                debug!(partition = %partition.id(), "releasing empty partition");
                partition.invalidate();
            } else {
                queue.push_back(partition);
            }
        }

        let fallback_rows: VecDeque<_> = fallback_rows.into_iter().collect();
        debug_assert!(
            fallback_rows
                .iter()
                .zip(fallback_rows.iter().skip(1))
                .all(|((a, _), (b, _))| a <= b),
            "fallback rows must be sorted by origin index"
        );

        Self {
            schema,
            partitions: queue,
            exceptions: exceptions.into_iter().collect(),
            fallback_rows,
            cursor: Cursor::default(),
            max_rows: max_rows.into().get(),
        }
    }

    /// Returns the result schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the row bound; `usize::MAX` when unbounded.
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Returns the number of rows delivered so far, counting whole
    /// partitions taken with [`get_next_partition`](Self::get_next_partition).
    pub fn rows_retrieved(&self) -> usize {
        self.cursor.rows_retrieved
    }

    /// Returns the number of fallback rows not yet merged.
    pub fn pending_fallback_rows(&self) -> usize {
        self.fallback_rows.len()
    }

    /// Returns the error partitions still held.
    pub fn exceptions(&self) -> &[Partition] {
        &self.exceptions
    }

    /// Hands the error partitions to the caller's reporting path.
    pub fn take_exceptions(&mut self) -> Vec<Partition> {
        std::mem::take(&mut self.exceptions)
    }

    /// Returns true if [`get_next_row`](Self::get_next_row) would produce a row.
    pub fn has_next_row(&self) -> bool {
        if self.cursor.rows_retrieved >= self.max_rows {
            return false;
        }

        match (self.partitions.front(), self.fallback_rows.is_empty()) {
            (None, true) => false,
            (None, false) => true,
            (Some(head), true) => self.cursor.row_in_partition < head.num_rows(),
            // A fallback row can always satisfy the pull.
            (Some(_), false) => true,
        }
    }

    /// Returns true if a partition can be taken with
    /// [`get_next_partition`](Self::get_next_partition).
    ///
    /// Fallback rows are not considered.
    pub fn has_next_partition(&self) -> bool {
        if self.cursor.rows_retrieved >= self.max_rows {
            return false;
        }

        self.partitions
            .front()
            .is_some_and(|head| self.cursor.row_in_partition < head.num_rows())
    }

    /// Removes the head partition and hands it to the caller.
    ///
    /// The partition's full row count is added to the delivered rows even
    /// though none of its rows were decoded here. Returns `None` if no
    /// partitions are queued.
    ///
    /// Partitions that held no rows were already released by
    /// [`new`](Self::new) and are never handed off.
    pub fn get_next_partition(&mut self) -> Option<Partition> {
        let head = self.partitions.pop_front()?;
        debug_assert_eq!(
            head.schema(),
            &self.schema,
            "partition schema does not match result set schema"
        );

        self.cursor.rows_retrieved = self.cursor.rows_retrieved.saturating_add(head.num_rows());
        self.cursor.reset_partition();

        debug!(partition = %head.id(), rows = head.num_rows(), "handing off partition");
        Some(head)
    }

    /// Pulls the next row of the merged stream.
    ///
    /// Returns `Ok(None)` when neither a fallback row nor a partition row is
    /// available. The row limit is not checked here; callers are expected to
    /// consult [`has_next_row`](Self::has_next_row) first.
    ///
    /// # Errors
    ///
    /// - `ResultSetError::Decode` if the head partition's bytes are malformed
    /// - `ResultSetError::Conversion` if a fallback object has no row form
    pub fn get_next_row(&mut self) -> Result<Option<Row>, ResultSetError> {
        if let Some((index, obj)) = self.pop_due_fallback_row() {
            return self.merge_fallback_row(index, obj).map(Some);
        }
        self.next_partition_row()
    }

    /// Pulls up to `limit` rows, stopping early when the stream ends.
    pub fn get_rows(&mut self, limit: usize) -> Result<Vec<Row>, ResultSetError> {
        let mut rows = Vec::new();
        while rows.len() < limit && self.has_next_row() {
            match self.get_next_row()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    /// Iterates over the merged row stream until [`has_next_row`](Self::has_next_row) is false.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows::new(self)
    }

    /// Iterates over whole partitions until
    /// [`has_next_partition`](Self::has_next_partition) is false.
    pub fn partitions(&mut self) -> Partitions<'_> {
        Partitions::new(self)
    }

    /// Returns the number of rows still queued: every queued partition's
    /// full row count plus the pending fallback rows.
    ///
    /// Independent of the row limit and of the error partitions. Reading a
    /// partition row by row does not lower the count until the partition is
    /// retired.
    pub fn row_count(&self) -> usize {
        let partition_rows: usize = self.partitions.iter().map(Partition::num_rows).sum();
        partition_rows + self.fallback_rows.len()
    }

    /// Releases every data and error partition and exhausts the result set.
    ///
    /// Pending fallback rows are kept but can no longer be pulled, since the
    /// row limit drops to zero.
    pub fn clear(&mut self) {
        let released = self.partitions.len() + self.exceptions.len();
        for partition in self.partitions.drain(..) {
            partition.invalidate();
        }
        for partition in self.exceptions.drain(..) {
            partition.invalidate();
        }

        self.cursor.reset_partition();
        self.cursor.rows_retrieved = 0;
        self.max_rows = 0;

        debug!(released, "cleared result set");
    }

    /// Pops the head fallback entry if it must be emitted before the next
    /// partition row.
    fn pop_due_fallback_row(&mut self) -> Option<(usize, FallbackObject)> {
        let &(index, _) = self.fallback_rows.front()?;
        if self.partitions.is_empty() || index <= self.cursor.logical_row {
            self.fallback_rows.pop_front()
        } else {
            None
        }
    }

    fn merge_fallback_row(
        &mut self,
        index: usize,
        obj: FallbackObject,
    ) -> Result<Row, ResultSetError> {
        let converted = {
            let guard = fallback::acquire();
            fallback::to_row(obj, &guard)
        };

        // Entries sharing an origin index all precede the next partition row.
        let next_shares_index = self
            .fallback_rows
            .front()
            .is_some_and(|&(next, _)| next == index);
        if !next_shares_index {
            self.cursor.logical_row += 1;
        }
        trace!(
            index,
            logical_row = self.cursor.logical_row,
            "merged fallback row"
        );

        let row = converted.map_err(|source| ResultSetError::Conversion { index, source })?;
        self.cursor.rows_retrieved += 1;
        Ok(row)
    }

    fn next_partition_row(&mut self) -> Result<Option<Row>, ResultSetError> {
        let Some(head) = self.partitions.front() else {
            return Ok(None);
        };
        debug_assert_eq!(
            head.schema(),
            &self.schema,
            "partition schema does not match result set schema"
        );

        let offset = self.cursor.byte_offset;
        let decoded = {
            let bytes = head.lock();
            match bytes.get(offset..) {
                Some(tail) => Row::from_bytes(&self.schema, tail),
                None => Err(SerializationError::BufferTooSmall {
                    required: offset,
                    available: bytes.len(),
                }),
            }
        };

        let row = decoded.map_err(|source| ResultSetError::Decode {
            partition: head.id(),
            row: self.cursor.row_in_partition,
            offset,
            source,
        })?;
        let num_rows = head.num_rows();

        self.cursor.advance_in_partition(row.serialized_len());
        if self.cursor.row_in_partition == num_rows {
            self.remove_first_partition();
        }

        Ok(Some(row))
    }

    /// Releases the fully read head partition and moves on to the next one.
    fn remove_first_partition(&mut self) {
        debug_assert!(!self.partitions.is_empty(), "no partition to retire");
        if let Some(head) = self.partitions.pop_front() {
            debug!(partition = %head.id(), rows = head.num_rows(), "retiring partition");
            head.invalidate();
        }
        self.cursor.reset_partition();
    }
}
