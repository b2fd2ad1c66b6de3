//! RAII guard for partition buffer access.

use std::ops::Deref;

use bytes::Bytes;
use parking_lot::MutexGuard;

/// Exclusive, read-only view of a partition's bytes.
///
/// While the guard is alive no other holder (the manager, a reclaimer, or
/// another reader) can touch the buffer. The lock is released when the
/// guard is dropped, including when a decode step bails out early with an
/// error, so keep guards scoped to a single operation.
///
/// # Example
///
/// ```
/// # use resultset::datum::{Type, Value};
/// # use resultset::partition::PartitionManager;
/// # use resultset::row::{Row, Schema};
/// # let manager = PartitionManager::default();
/// # let schema = Schema::new(vec![Type::Bool]);
/// # let mut writer = manager.writer(&schema);
/// # writer.append(&Row::new(schema.clone(), vec![Value::Boolean(true)]).unwrap()).unwrap();
/// # let partition = writer.finish().unwrap();
/// let row = {
///     let bytes = partition.lock();
///     Row::from_bytes(partition.schema(), &bytes).unwrap()
/// }; // access released here
/// assert_eq!(row.values(), &[Value::Boolean(true)]);
/// ```
pub struct PartitionReadGuard<'a> {
    data: MutexGuard<'a, Bytes>,
}

impl<'a> PartitionReadGuard<'a> {
    pub(super) fn new(data: MutexGuard<'a, Bytes>) -> Self {
        Self { data }
    }

    /// Access the partition data as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Deref for PartitionReadGuard<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}
