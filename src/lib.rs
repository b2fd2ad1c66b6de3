//! Result delivery for a partitioned query engine.
//!
//! Query output arrives as [`Partition`]s of serialized rows plus sparse
//! fallback rows computed by an interpreter. A [`ResultSet`] merges both into
//! one ordered, bounded row stream and releases every partition exactly once.
//!
//! - [`datum`]: column types, values, and the per-value codec
//! - [`row`]: [`Schema`] and [`Row`]
//! - [`partition`]: partition buffers, the manager that owns them, and scoped access
//! - [`fallback`]: interpreter objects and the process-wide interpreter lock
//! - [`result_set`]: the merged row cursor

pub mod datum;
pub mod fallback;
pub mod partition;
pub mod result_set;
pub mod row;

pub use partition::{Partition, PartitionManager};
pub use result_set::{ResultSet, ResultSetError, RowLimit};
pub use row::{Row, Schema};
