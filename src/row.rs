//! Rows and schemas.
//!
//! A [`Schema`] is the immutable column layout shared by every row of a
//! result; a [`Row`] is one decoded record together with the number of bytes
//! it occupies in serialized form.
//!
//! # Row Serialization
//!
//! Rows are serialized with a null bitmap followed by value data:
//!
//! ```text
//! +---------------------------+
//! | Null Bitmap (ceil(n/8) B) |  bit=1: NOT NULL, bit=0: NULL
//! +---------------------------+
//! | Value[0] (if not null)    |
//! | Value[1] (if not null)    |
//! | ...                       |
//! +---------------------------+
//! ```
//!
//! Rows are stored back to back inside a partition buffer, so the decoder
//! must learn each row's length from the encoding itself.

mod record;
mod schema;

pub use record::Row;
pub use schema::Schema;
