//! Per-row size store with lazily rebuilt prefix offsets.

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;

use crate::error::{check_index, Result};
use crate::row::{RowDescriptor, RowId};

use super::estimator::SizeEstimator;

/// Size bookkeeping for a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEntry {
    /// Row position.
    pub index: usize,
    /// Id of the row this entry was sized for.
    pub key: RowId,
    /// Size reported by the renderer, once known.
    pub measured: Option<u32>,
    /// Estimator output, authoritative until `measured` is set.
    pub estimated: u32,
}

impl SizeEntry {
    /// Effective size: measured if known, else estimated.
    pub fn size(&self) -> u32 {
        self.measured.unwrap_or(self.estimated)
    }
}

/// Measured/estimated row sizes plus cached cumulative offsets.
///
/// `offsets[i]` is the sum of the sizes of rows `0..i`, so the vector holds
/// `len + 1` entries and the last one is the total content size. Mutations
/// only flip `dirty`; the O(n) rebuild happens on the next read.
pub struct SizeCache {
    estimator: Arc<dyn SizeEstimator>,
    entries: Vec<SizeEntry>,
    offsets: Vec<u32>,
    dirty: bool,
    rebuilds: usize,
}

impl std::fmt::Debug for SizeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeCache")
            .field("len", &self.entries.len())
            .field("dirty", &self.dirty)
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}

impl SizeCache {
    /// Create an empty cache.
    pub fn new(estimator: Arc<dyn SizeEstimator>) -> Self {
        Self {
            estimator,
            entries: Vec::new(),
            offsets: vec![0],
            dirty: false,
            rebuilds: 0,
        }
    }

    /// Create a cache sized for `rows`.
    pub fn with_rows(estimator: Arc<dyn SizeEstimator>, rows: &[RowDescriptor]) -> Self {
        let mut cache = Self::new(estimator);
        cache.reset(rows);
        cache
    }

    /// Number of rows tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache tracks no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the prefix offsets are stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// How many times the prefix offsets have been rebuilt.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Replace the tracked rows.
    ///
    /// Measurements follow row ids, so rows that merely moved (after a sort,
    /// or an insert above them) keep their measured size. Rows with new ids
    /// start over from the estimator.
    pub fn reset(&mut self, rows: &[RowDescriptor]) {
        let previous: HashMap<RowId, u32> = self
            .entries
            .drain(..)
            .filter_map(|e| e.measured.map(|m| (e.key, m)))
            .collect();

        let mut kept = 0usize;
        self.entries = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let measured = previous.get(&row.id).copied();
                if measured.is_some() {
                    kept += 1;
                }
                SizeEntry {
                    index,
                    key: row.id.clone(),
                    measured,
                    estimated: self.estimator.estimate(row),
                }
            })
            .collect();
        self.dirty = true;
        trace!(
            "SizeCache reset: {} rows, {} measurements kept",
            self.entries.len(),
            kept
        );
    }

    /// Get the entry for `index`.
    pub fn entry(&self, index: usize) -> Result<&SizeEntry> {
        check_index(index, self.entries.len())?;
        Ok(&self.entries[index])
    }

    /// Effective size of `index`: measured if known, else the estimate.
    pub fn estimate_size(&self, index: usize) -> Result<u32> {
        self.entry(index).map(SizeEntry::size)
    }

    /// Record the real size of a rendered row.
    ///
    /// Returns whether the effective size changed. Offsets are only
    /// invalidated on change.
    pub fn report_measured(&mut self, index: usize, size: u32) -> Result<bool> {
        check_index(index, self.entries.len())?;
        let entry = &mut self.entries[index];
        let previous = entry.size();
        entry.measured = Some(size);
        if previous != size {
            self.dirty = true;
            trace!("SizeCache: row {} measured {} (was {})", index, size, previous);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Re-estimate a single row, e.g. after it expanded or collapsed.
    ///
    /// The stale measurement for that row is dropped; other rows are left
    /// alone. Returns whether the effective size changed.
    pub fn invalidate(&mut self, row: &RowDescriptor) -> Result<bool> {
        check_index(row.index, self.entries.len())?;
        let estimated = self.estimator.estimate(row);
        let entry = &mut self.entries[row.index];
        let previous = entry.size();
        entry.measured = None;
        entry.estimated = estimated;
        if previous != estimated {
            self.dirty = true;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Recompute the prefix offsets from the current sizes.
    pub fn rebuild(&mut self) {
        self.offsets.clear();
        self.offsets.reserve(self.entries.len() + 1);
        self.offsets.push(0);

        let mut total: u32 = 0;
        for entry in &self.entries {
            total = total.saturating_add(entry.size());
            self.offsets.push(total);
        }

        self.dirty = false;
        self.rebuilds += 1;
    }

    fn ensure_built(&mut self) {
        if self.dirty {
            self.rebuild();
        }
    }

    /// Prefix offsets (`len + 1` entries), rebuilt first if stale.
    pub fn offsets(&mut self) -> &[u32] {
        self.ensure_built();
        &self.offsets
    }

    /// Start offset of row `index`.
    pub fn offset(&mut self, index: usize) -> Result<u32> {
        check_index(index, self.entries.len())?;
        self.ensure_built();
        Ok(self.offsets[index])
    }

    /// Total content size (sum of all effective sizes).
    pub fn total_size(&mut self) -> u32 {
        self.ensure_built();
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Row containing `offset`, or `None` when there are no rows.
    ///
    /// Offsets at or past the end map to the last row.
    pub fn index_at_offset(&mut self, offset: u32) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        self.ensure_built();
        Some(first_index_ending_after(&self.offsets, offset))
    }
}

/// First row whose end offset exceeds `offset`, clamped to the last row.
///
/// `offsets` must be a prefix-sum array with at least two entries.
pub(crate) fn first_index_ending_after(offsets: &[u32], offset: u32) -> usize {
    let row_count = offsets.len() - 1;
    offsets[1..]
        .partition_point(|&end| end <= offset)
        .min(row_count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::rows_from_ids;
    use crate::virtualize::estimator::{ExpandedMultiplier, FixedSize};
    use crate::EngineError;

    fn cache(n: usize, size: u32) -> SizeCache {
        let rows = rows_from_ids((0..n).map(|i| i.to_string()));
        SizeCache::with_rows(Arc::new(FixedSize(size)), &rows)
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let mut c = cache(5, 10);
        assert_eq!(c.offset(0).unwrap(), 0);
        assert_eq!(c.offset(3).unwrap(), 30);
        assert_eq!(c.total_size(), 50);
    }

    #[test]
    fn test_out_of_range_fails_fast() {
        let mut c = cache(3, 10);
        assert_eq!(
            c.offset(3),
            Err(EngineError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(c.estimate_size(7).is_err());
        assert!(c.report_measured(3, 5).is_err());
    }

    #[test]
    fn test_rebuild_is_lazy() {
        let mut c = cache(100, 10);
        c.total_size();
        let built = c.rebuild_count();

        c.report_measured(1, 20).unwrap();
        c.report_measured(2, 20).unwrap();
        c.report_measured(3, 20).unwrap();
        assert!(c.is_dirty());
        assert_eq!(c.rebuild_count(), built);

        assert_eq!(c.total_size(), 1030);
        assert_eq!(c.rebuild_count(), built + 1);
        c.offset(50).unwrap();
        assert_eq!(c.rebuild_count(), built + 1);
    }

    #[test]
    fn test_same_measurement_does_not_invalidate() {
        let mut c = cache(4, 10);
        c.total_size();
        assert!(!c.report_measured(2, 10).unwrap());
        assert!(!c.is_dirty());
        assert_eq!(c.entry(2).unwrap().measured, Some(10));
    }

    #[test]
    fn test_measured_wins_over_estimate() {
        let mut c = cache(4, 10);
        c.report_measured(1, 25).unwrap();
        assert_eq!(c.estimate_size(1).unwrap(), 25);
        assert_eq!(c.offset(2).unwrap(), 35);
    }

    #[test]
    fn test_reset_keeps_measurements_by_id() {
        let mut c = cache(3, 10);
        c.report_measured(0, 30).unwrap();
        c.report_measured(2, 30).unwrap();

        let rows = rows_from_ids(["0", "x", "y", "3"]);
        c.reset(&rows);
        assert_eq!(c.estimate_size(0).unwrap(), 30);
        assert_eq!(c.estimate_size(2).unwrap(), 10);
        assert_eq!(c.total_size(), 60);
    }

    #[test]
    fn test_reset_follows_moved_rows() {
        let mut c = cache(3, 10);
        c.report_measured(0, 50).unwrap();
        c.reset(&rows_from_ids(["2", "1", "0"]));
        assert_eq!(c.estimate_size(0).unwrap(), 10);
        assert_eq!(c.estimate_size(2).unwrap(), 50);
        assert_eq!(c.offset(2).unwrap(), 20);
    }

    #[test]
    fn test_invalidate_single_row() {
        let mut rows = rows_from_ids(["a", "b", "c"]);
        rows[1].expanded = Some(false);
        let mut c = SizeCache::with_rows(Arc::new(ExpandedMultiplier::new(10)), &rows);
        c.report_measured(1, 12).unwrap();
        c.report_measured(2, 11).unwrap();

        rows[1].expanded = Some(true);
        assert!(c.invalidate(&rows[1]).unwrap());
        assert_eq!(c.entry(1).unwrap().measured, None);
        assert_eq!(c.estimate_size(1).unwrap(), 40);
        assert_eq!(c.estimate_size(2).unwrap(), 11);
    }

    #[test]
    fn test_index_at_offset() {
        let mut c = cache(4, 10);
        assert_eq!(c.index_at_offset(0), Some(0));
        assert_eq!(c.index_at_offset(9), Some(0));
        assert_eq!(c.index_at_offset(10), Some(1));
        assert_eq!(c.index_at_offset(1000), Some(3));
        assert_eq!(cache(0, 10).index_at_offset(0), None);
    }
}
