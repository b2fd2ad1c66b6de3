//! Partition errors.

use thiserror::Error;

use crate::datum::SerializationError;
use crate::row::Schema;

/// Errors from building and registering partitions.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// A row's schema differs from the partition's schema.
    #[error("schema mismatch: partition expects {expected}, row has {actual}")]
    SchemaMismatch {
        /// Schema of the partition being written.
        expected: Schema,
        /// Schema of the rejected row.
        actual: Schema,
    },

    /// The row does not fit in the remaining capacity.
    #[error("partition full: need {required} bytes, have {available} available")]
    PartitionFull {
        /// Bytes needed by the row.
        required: usize,
        /// Bytes still free in the partition.
        available: usize,
    },

    /// Registering the partition would exceed the manager's memory budget.
    #[error("out of partition memory: requested {requested} bytes, {available} available")]
    OutOfMemory {
        /// Capacity of the partition being registered.
        requested: usize,
        /// Budget left before registration.
        available: usize,
    },

    /// Row serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}
