//! Read position of a result set.

/// Counters tracking how far a [`ResultSet`](super::ResultSet) has read.
///
/// `row_in_partition` and `byte_offset` always refer to the current head
/// partition and are zeroed whenever the head changes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct Cursor {
    /// Rows already decoded from the head partition.
    pub(super) row_in_partition: usize,
    /// Byte offset of the next row within the head partition.
    pub(super) byte_offset: usize,
    /// Logical input row used to order fallback rows against partition rows.
    pub(super) logical_row: usize,
    /// Rows handed to the caller, checked against the row limit.
    pub(super) rows_retrieved: usize,
}

impl Cursor {
    /// Records one row decoded from the head partition.
    pub(super) fn advance_in_partition(&mut self, serialized_len: usize) {
        self.byte_offset += serialized_len;
        self.row_in_partition += 1;
        self.rows_retrieved += 1;
        self.logical_row += 1;
    }

    /// Zeroes the per-partition counters.
    pub(super) fn reset_partition(&mut self) {
        self.row_in_partition = 0;
        self.byte_offset = 0;
    }
}
