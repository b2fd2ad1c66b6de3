//! Result set errors.

use thiserror::Error;

use crate::datum::SerializationError;
use crate::fallback::ConversionError;
use crate::partition::PartitionId;

/// Errors from pulling rows out of a [`ResultSet`](super::ResultSet).
///
/// Running out of rows is not an error; see
/// [`has_next_row`](super::ResultSet::has_next_row).
#[derive(Debug, Error)]
pub enum ResultSetError {
    /// The head partition's bytes could not be decoded with the schema.
    ///
    /// The cursor is left where it was, so the failing row is not skipped.
    #[error("failed to decode row {row} of {partition} at byte offset {offset}")]
    Decode {
        /// Partition being read.
        partition: PartitionId,
        /// Row position within the partition.
        row: usize,
        /// Byte offset of the row within the partition.
        offset: usize,
        /// Codec failure.
        #[source]
        source: SerializationError,
    },

    /// A fallback object could not be converted.
    ///
    /// The object has been consumed and will not be offered again.
    #[error("failed to convert fallback row for input row {index}")]
    Conversion {
        /// Origin index of the fallback entry.
        index: usize,
        /// Conversion failure.
        #[source]
        source: ConversionError,
    },
}
