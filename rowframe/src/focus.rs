//! Keyboard focus over rows.

use log::trace;

use crate::error::{check_index, Result};
use crate::virtualize::{Align, ScrollRequest};

/// Result of a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusMove {
    pub previous: Option<usize>,
    pub current: usize,
    /// Request the consumer should feed to the scroll state so the focused
    /// row becomes visible.
    pub scroll: ScrollRequest,
}

impl FocusMove {
    /// Whether focus actually moved.
    pub fn changed(&self) -> bool {
        self.previous != Some(self.current)
    }
}

/// Focused row index with boundary clamping.
///
/// No focus is `None` (the "-1" state). Moving past either end stays at the
/// end; it never wraps or errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusNavigator {
    focus: Option<usize>,
    row_count: usize,
}

impl FocusNavigator {
    pub fn new(row_count: usize) -> Self {
        Self {
            focus: None,
            row_count,
        }
    }

    /// Focused row, if any.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Focus as a signed index, `-1` meaning no focus.
    pub fn focus_index(&self) -> isize {
        self.focus.map(|i| i as isize).unwrap_or(-1)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Update the row count, pulling focus back inside the new bounds.
    pub fn set_row_count(&mut self, row_count: usize) {
        self.row_count = row_count;
        if let Some(focus) = self.focus
            && focus >= row_count
        {
            self.focus = row_count.checked_sub(1);
            trace!("Focus clamped from {} to {:?}", focus, self.focus);
        }
    }

    /// Drop focus.
    pub fn clear(&mut self) {
        self.focus = None;
    }

    fn focus_at(&mut self, index: usize) -> FocusMove {
        let previous = self.focus;
        self.focus = Some(index);
        FocusMove {
            previous,
            current: index,
            scroll: ScrollRequest::IntoView {
                index,
                align: Align::Auto,
            },
        }
    }

    /// Move focus by `delta` rows, clamped to `[0, row_count - 1]`.
    ///
    /// From the unfocused state the move starts at -1, so `+1` lands on the
    /// first row. Returns `None` when there are no rows.
    pub fn move_focus(&mut self, delta: isize) -> Option<FocusMove> {
        let last = self.row_count.checked_sub(1)? as isize;
        let next = (self.focus_index().saturating_add(delta)).clamp(0, last) as usize;
        Some(self.focus_at(next))
    }

    /// Focus a specific row. Out-of-range indices are an error.
    pub fn set_focus(&mut self, index: usize) -> Result<FocusMove> {
        check_index(index, self.row_count)?;
        Ok(self.focus_at(index))
    }

    /// Focus the first row.
    pub fn focus_first(&mut self) -> Option<FocusMove> {
        (self.row_count > 0).then(|| self.focus_at(0))
    }

    /// Focus the last row.
    pub fn focus_last(&mut self) -> Option<FocusMove> {
        let last = self.row_count.checked_sub(1)?;
        Some(self.focus_at(last))
    }
}
