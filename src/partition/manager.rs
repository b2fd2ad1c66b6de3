//! Partition manager: registration, memory accounting, and release.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;

use crate::row::{Row, Schema};

use super::buffer::PartitionBuffer;
use super::error::PartitionError;
use super::handle::{Partition, PartitionId};
use super::writer::PartitionWriter;

/// Configuration for a [`PartitionManager`].
#[derive(Debug, Clone)]
pub struct PartitionManagerConfig {
    /// Byte capacity of partitions created by [`PartitionManager::writer`].
    pub partition_capacity: usize,
    /// Upper bound on the combined capacity of live partitions.
    /// `None` means unbounded.
    pub memory_budget: Option<usize>,
}

impl Default for PartitionManagerConfig {
    fn default() -> Self {
        Self {
            partition_capacity: 1024 * 1024,
            memory_budget: None,
        }
    }
}

/// Point-in-time counters for a [`PartitionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartitionStats {
    /// Partitions registered and not yet released.
    pub live_partitions: usize,
    /// Combined capacity of live partitions.
    pub live_bytes: usize,
    /// Partitions registered since the manager was created.
    pub allocated: u64,
    /// Partitions released since the manager was created.
    pub invalidated: u64,
}

/// Owner of every live partition buffer.
///
/// The manager is cheap to clone; clones share the same live table. Each
/// finished [`Partition`] keeps the shared state alive and unregisters
/// itself on drop.
///
/// # Latch Hierarchy
///
/// 1. Live-table mutex
/// 2. Partition buffer mutex
///
/// A buffer lock is never held while acquiring the live-table lock.
#[derive(Clone, Default)]
pub struct PartitionManager {
    shared: Arc<ManagerShared>,
}

/// State shared between the manager and the partitions it registered.
pub(super) struct ManagerShared {
    config: PartitionManagerConfig,
    next_id: AtomicU64,
    state: Mutex<ManagerState>,
}

#[derive(Default)]
struct ManagerState {
    live: HashMap<PartitionId, LiveEntry>,
    live_bytes: usize,
    allocated: u64,
    invalidated: u64,
}

struct LiveEntry {
    buffer: Arc<PartitionBuffer>,
    capacity: usize,
}

impl PartitionManager {
    /// Creates a manager with the given configuration.
    pub fn new(config: PartitionManagerConfig) -> Self {
        Self {
            shared: Arc::new(ManagerShared::new(config)),
        }
    }

    /// Returns the manager's configuration.
    pub fn config(&self) -> &PartitionManagerConfig {
        &self.shared.config
    }

    /// Starts a partition with the configured default capacity.
    pub fn writer(&self, schema: &Schema) -> PartitionWriter {
        self.writer_with_capacity(schema, self.shared.config.partition_capacity)
    }

    /// Starts a partition with an explicit byte capacity.
    pub fn writer_with_capacity(&self, schema: &Schema, capacity: usize) -> PartitionWriter {
        PartitionWriter::new(Arc::clone(&self.shared), schema.clone(), capacity)
    }

    /// Packs rows into as many partitions as needed, in order.
    ///
    /// A new partition is started whenever the next row does not fit.
    ///
    /// # Errors
    ///
    /// - `PartitionError::PartitionFull` if a single row exceeds the partition capacity
    /// - `PartitionError::SchemaMismatch` if a row does not match `schema`
    /// - `PartitionError::OutOfMemory` if the memory budget runs out
    pub fn partition_rows<'r>(
        &self,
        schema: &Schema,
        rows: impl IntoIterator<Item = &'r Row>,
    ) -> Result<Vec<Partition>, PartitionError> {
        let mut partitions = Vec::new();
        let mut writer = self.writer(schema);

        for row in rows {
            match writer.append(row) {
                Ok(()) => {}
                Err(PartitionError::PartitionFull { .. }) if !writer.is_empty() => {
                    let full = std::mem::replace(&mut writer, self.writer(schema));
                    partitions.push(full.finish()?);
                    writer.append(row)?;
                }
                Err(e) => return Err(e),
            }
        }

        if !writer.is_empty() {
            partitions.push(writer.finish()?);
        }
        Ok(partitions)
    }

    /// Returns true if the partition is registered and not yet released.
    pub fn is_live(&self, id: PartitionId) -> bool {
        self.shared.state.lock().live.contains_key(&id)
    }

    /// Returns the current counters.
    pub fn stats(&self) -> PartitionStats {
        let state = self.shared.state.lock();
        PartitionStats {
            live_partitions: state.live.len(),
            live_bytes: state.live_bytes,
            allocated: state.allocated,
            invalidated: state.invalidated,
        }
    }

    /// Sums the bytes actually occupied by live partitions.
    ///
    /// Each buffer is locked in turn, the same way a background reclaimer
    /// inspects partitions, so this contends with concurrent readers.
    pub fn resident_bytes(&self) -> usize {
        let buffers: Vec<Arc<PartitionBuffer>> = {
            let state = self.shared.state.lock();
            state
                .live
                .values()
                .map(|entry| Arc::clone(&entry.buffer))
                .collect()
        };
        buffers.iter().map(|buffer| buffer.len()).sum()
    }
}

impl ManagerShared {
    fn new(config: PartitionManagerConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(0),
            state: Mutex::new(ManagerState::default()),
        }
    }

    /// Registers a finished buffer and hands back its owning handle.
    pub(super) fn register(
        self: &Arc<Self>,
        schema: Schema,
        num_rows: usize,
        capacity: usize,
        data: Bytes,
    ) -> Result<Partition, PartitionError> {
        let buffer = Arc::new(PartitionBuffer::new(data));
        let id = PartitionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        {
            let mut state = self.state.lock();
            if let Some(budget) = self.config.memory_budget {
                let available = budget.saturating_sub(state.live_bytes);
                if capacity > available {
                    return Err(PartitionError::OutOfMemory {
                        requested: capacity,
                        available,
                    });
                }
            }
            state.live.insert(
                id,
                LiveEntry {
                    buffer: Arc::clone(&buffer),
                    capacity,
                },
            );
            state.live_bytes += capacity;
            state.allocated += 1;
        }

        tracing::debug!(partition = %id, rows = num_rows, capacity, "registered partition");
        Ok(Partition::new(
            id,
            schema,
            num_rows,
            capacity,
            buffer,
            Arc::clone(self),
        ))
    }

    /// Unregisters a partition. Only called from `Partition::drop`.
    pub(super) fn release(&self, id: PartitionId) {
        let mut state = self.state.lock();
        let removed = state.live.remove(&id);
        debug_assert!(removed.is_some(), "{} released twice", id);
        if let Some(entry) = removed {
            state.live_bytes -= entry.capacity;
            state.invalidated += 1;
        }
    }
}

impl Default for ManagerShared {
    fn default() -> Self {
        Self::new(PartitionManagerConfig::default())
    }
}
