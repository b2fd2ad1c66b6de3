//! Shared partition storage.

use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};

/// The bytes behind a partition.
///
/// The buffer is shared between the owning [`Partition`](super::Partition)
/// and the manager's live table, so every access goes through the mutex.
/// Holders keep the lock only for the duration of a single decode or scan.
pub(super) struct PartitionBuffer {
    data: Mutex<Bytes>,
}

impl PartitionBuffer {
    pub(super) fn new(data: Bytes) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// Acquires exclusive access to the buffer.
    pub(super) fn lock(&self) -> MutexGuard<'_, Bytes> {
        self.data.lock()
    }

    /// Returns the number of stored bytes, briefly locking the buffer.
    pub(super) fn len(&self) -> usize {
        self.data.lock().len()
    }
}
