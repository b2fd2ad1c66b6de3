//! Partition identity and the owning partition handle.

use std::fmt;
use std::sync::Arc;

use crate::row::Schema;

use super::buffer::PartitionBuffer;
use super::guard::PartitionReadGuard;
use super::manager::ManagerShared;

/// Unique identifier for a partition within a [`PartitionManager`](super::PartitionManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionId(pub u64);

impl PartitionId {
    /// Creates a new PartitionId.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partition#{}", self.0)
    }
}

/// Owning handle to a filled partition.
///
/// A `Partition` is the only capability that can release its buffer. It is
/// deliberately not `Clone`: queues hold it by value, consumers receive it by
/// move, and the buffer is released exactly once when the handle is dropped
/// or explicitly [`invalidate`](Self::invalidate)d.
pub struct Partition {
    id: PartitionId,
    schema: Schema,
    num_rows: usize,
    capacity: usize,
    size: usize,
    buffer: Arc<PartitionBuffer>,
    owner: Arc<ManagerShared>,
}

impl Partition {
    pub(super) fn new(
        id: PartitionId,
        schema: Schema,
        num_rows: usize,
        capacity: usize,
        buffer: Arc<PartitionBuffer>,
        owner: Arc<ManagerShared>,
    ) -> Self {
        let size = buffer.len();
        Self {
            id,
            schema,
            num_rows,
            capacity,
            size,
            buffer,
            owner,
        }
    }

    /// Returns the partition's identity.
    pub fn id(&self) -> PartitionId {
        self.id
    }

    /// Returns the schema shared by every row in the partition.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the number of rows stored.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the byte capacity reserved for the partition.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes occupied by serialized rows.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Acquires exclusive access to the raw row bytes.
    ///
    /// Blocks while another holder (for example a reclaimer scanning live
    /// partitions) has the buffer locked.
    pub fn lock(&self) -> PartitionReadGuard<'_> {
        PartitionReadGuard::new(self.buffer.lock())
    }

    /// Releases the partition.
    ///
    /// Equivalent to dropping the handle; consuming `self` makes a second
    /// release impossible.
    pub fn invalidate(self) {
        drop(self);
    }
}

impl Drop for Partition {
    fn drop(&mut self) {
        tracing::debug!(
            partition = %self.id,
            rows = self.num_rows,
            capacity = self.capacity,
            "invalidating partition"
        );
        self.owner.release(self.id);
    }
}

impl fmt::Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partition")
            .field("id", &self.id)
            .field("schema", &self.schema)
            .field("num_rows", &self.num_rows)
            .field("capacity", &self.capacity)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_id() {
        let id = PartitionId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "partition#42");
        assert!(PartitionId::new(1) < PartitionId::new(2));
    }
}
