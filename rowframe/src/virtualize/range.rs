//! Visible range computation over prefix offsets.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::size_cache::first_index_ending_after;

/// A row the renderer should paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleItem {
    pub index: usize,
    pub offset: u32,
    pub size: u32,
}

impl VisibleItem {
    /// Offset just past the end of the row.
    pub fn end(&self) -> u32 {
        self.offset + self.size
    }
}

/// Rows to materialize for one scroll position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// Rows to render, overscan included.
    pub rows: Range<usize>,
    /// Rows from the one holding the scroll offset through the one at the
    /// far edge, overscan excluded. A row starting exactly on the far edge
    /// counts, so this can hold one row more than actually intersects.
    pub viewport: Range<usize>,
    /// Scroll offset after clamping.
    pub scroll_offset: u32,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn start_index(&self) -> usize {
        self.rows.start
    }

    /// Last rendered row (inclusive), `None` when empty.
    pub fn end_index(&self) -> Option<usize> {
        self.rows.end.checked_sub(1).filter(|_| !self.rows.is_empty())
    }

    /// Whether `index` is in [`viewport`](Self::viewport).
    pub fn in_viewport(&self, index: usize) -> bool {
        self.viewport.contains(&index)
    }
}

/// Clamp a raw scroll offset into `[0, max(0, total - viewport)]`.
///
/// Negative offsets come from overscroll and fast flings; they are input
/// noise, not errors.
pub fn clamp_scroll_offset(scroll_offset: i64, total_size: u32, viewport_size: u32) -> u32 {
    let max = total_size.saturating_sub(viewport_size);
    scroll_offset.clamp(0, max as i64) as u32
}

/// Compute the rows covering `[scroll, scroll + viewport)` plus `overscan`
/// rows on each side.
///
/// `offsets` is a prefix-sum array as produced by
/// [`SizeCache::offsets`](super::SizeCache::offsets): `len + 1` entries,
/// starting at 0.
pub fn compute_visible_range(
    offsets: &[u32],
    scroll_offset: i64,
    viewport_size: u32,
    overscan: usize,
) -> VisibleRange {
    let row_count = offsets.len().saturating_sub(1);
    if row_count == 0 {
        return VisibleRange::default();
    }

    let total = offsets[row_count];
    let scroll = clamp_scroll_offset(scroll_offset, total, viewport_size);
    let limit = scroll.saturating_add(viewport_size);

    let first_visible = first_index_ending_after(offsets, scroll);

    // Walk forward until the cumulative end passes the viewport's far edge.
    let mut last_visible = first_visible;
    while last_visible + 1 < row_count && offsets[last_visible + 1] <= limit {
        last_visible += 1;
    }

    let start = first_visible.saturating_sub(overscan);
    let end = last_visible.saturating_add(overscan).min(row_count - 1);

    VisibleRange {
        rows: start..end + 1,
        viewport: first_visible..last_visible + 1,
        scroll_offset: scroll,
    }
}

/// Materialize [`VisibleItem`]s for `range`.
pub fn visible_items(offsets: &[u32], range: &VisibleRange) -> Vec<VisibleItem> {
    range
        .rows
        .clone()
        .map(|index| VisibleItem {
            index,
            offset: offsets[index],
            size: offsets[index + 1] - offsets[index],
        })
        .collect()
}
