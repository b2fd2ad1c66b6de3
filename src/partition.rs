//! Partitions: contiguous buffers of consecutively serialized rows.
//!
//! The partition layer stands in for the physical memory manager that
//! produces query output. It hands out partitions as move-only capabilities
//! and tracks which ones are still live.
//!
//! # Components
//!
//! - [`PartitionManager`]: registers finished partitions and accounts for their memory
//! - [`PartitionWriter`]: appends serialized rows and finishes into a [`Partition`]
//! - [`Partition`]: owning handle; dropping it (or calling
//!   [`Partition::invalidate`]) releases the buffer exactly once
//! - [`PartitionReadGuard`]: RAII guard for exclusive, short-lived buffer access
//!
//! # Lifecycle
//!
//! ```text
//! PartitionManager::writer ──append──▶ PartitionWriter ──finish──▶ Partition
//!                                                                     │
//!                         drop / invalidate ◀──────── consumer ◀──────┘
//! ```
//!
//! A partition has no `Clone` impl, so once it has been moved into a
//! consumer or released there is nothing left to release a second time.
//!
//! # Example
//!
//! ```
//! use resultset::datum::{Type, Value};
//! use resultset::partition::PartitionManager;
//! use resultset::row::{Row, Schema};
//!
//! let manager = PartitionManager::default();
//! let schema = Schema::new(vec![Type::Int8]);
//!
//! let mut writer = manager.writer(&schema);
//! writer.append(&Row::new(schema.clone(), vec![Value::Int64(1)]).unwrap()).unwrap();
//! let partition = writer.finish().unwrap();
//! assert_eq!(partition.num_rows(), 1);
//! assert_eq!(manager.stats().live_partitions, 1);
//!
//! partition.invalidate();
//! assert_eq!(manager.stats().live_partitions, 0);
//! ```

mod buffer;
mod error;
mod guard;
mod handle;
mod manager;
mod writer;

pub use error::PartitionError;
pub use guard::PartitionReadGuard;
pub use handle::{Partition, PartitionId};
pub use manager::{PartitionManager, PartitionManagerConfig, PartitionStats};
pub use writer::PartitionWriter;
