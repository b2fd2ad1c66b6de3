//! Row limit.

/// Upper bound on the number of rows a [`ResultSet`](super::ResultSet) delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLimit {
    /// No bound.
    #[default]
    Unbounded,
    /// Deliver at most this many rows.
    AtMost(usize),
}

impl RowLimit {
    /// Returns the bound as a row count; unbounded is `usize::MAX`.
    pub const fn get(self) -> usize {
        match self {
            RowLimit::Unbounded => usize::MAX,
            RowLimit::AtMost(n) => n,
        }
    }
}

/// Negative values mean unbounded.
impl From<i64> for RowLimit {
    fn from(n: i64) -> Self {
        match usize::try_from(n) {
            Ok(n) => RowLimit::AtMost(n),
            Err(_) if n < 0 => RowLimit::Unbounded,
            Err(_) => RowLimit::AtMost(usize::MAX),
        }
    }
}

impl From<usize> for RowLimit {
    fn from(n: usize) -> Self {
        RowLimit::AtMost(n)
    }
}

impl From<Option<usize>> for RowLimit {
    fn from(n: Option<usize>) -> Self {
        n.map_or(RowLimit::Unbounded, RowLimit::AtMost)
    }
}
