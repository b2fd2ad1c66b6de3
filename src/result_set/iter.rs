//! Iterator adapters over a result set.

use std::iter::FusedIterator;

use crate::partition::Partition;
use crate::row::Row;

use super::ResultSet;
use super::error::ResultSetError;

/// Iterator over the merged row stream. Created by [`ResultSet::rows`].
///
/// Stops when [`ResultSet::has_next_row`] reports false, or right after
/// the first failed pull is yielded as `Some(Err(_))`. A decode failure
/// leaves the cursor on the bad row, so retrying would fail forever; call
/// [`ResultSet::rows`] again to resume after a conversion failure.
#[derive(Debug)]
pub struct Rows<'a> {
    result_set: &'a mut ResultSet,
    failed: bool,
}

impl<'a> Rows<'a> {
    pub(super) fn new(result_set: &'a mut ResultSet) -> Self {
        Self {
            result_set,
            failed: false,
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, ResultSetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.result_set.has_next_row() {
            return None;
        }
        let pulled = self.result_set.get_next_row().transpose();
        self.failed = matches!(pulled, Some(Err(_)));
        pulled
    }
}

impl FusedIterator for Rows<'_> {}

/// Iterator handing off whole partitions. Created by [`ResultSet::partitions`].
#[derive(Debug)]
pub struct Partitions<'a> {
    result_set: &'a mut ResultSet,
}

impl<'a> Partitions<'a> {
    pub(super) fn new(result_set: &'a mut ResultSet) -> Self {
        Self { result_set }
    }
}

impl Iterator for Partitions<'_> {
    type Item = Partition;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.result_set.has_next_partition() {
            return None;
        }
        self.result_set.get_next_partition()
    }
}

impl FusedIterator for Partitions<'_> {}
