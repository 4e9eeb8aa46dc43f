//! Column definitions and per-column width state.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Column configuration supplied by the consumer.
///
/// # Examples
///
/// ```
/// use rowframe::Column;
///
/// let columns = vec![
///     Column::new("id", "ID", 80),
///     Column::new("name", "Name", 200).sortable(),
///     Column::new("status", "Status", 120).fixed(),
/// ];
/// assert!(columns[1].sortable);
/// assert!(!columns[2].resizable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Unique identifier for this column.
    pub id: String,
    /// Header text.
    pub header: String,
    /// Initial width.
    pub width: u32,
    /// Whether header activation cycles the sort.
    #[serde(default)]
    pub sortable: bool,
    /// Whether the column has a resize handle.
    #[serde(default = "default_true")]
    pub resizable: bool,
}

fn default_true() -> bool {
    true
}

impl Column {
    pub fn new(id: impl Into<String>, header: impl Into<String>, width: u32) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            width,
            sortable: false,
            resizable: true,
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Disable the resize handle for this column.
    pub fn fixed(mut self) -> Self {
        self.resizable = false;
        self
    }
}

/// Live width of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    pub id: String,
    pub width: u32,
    pub is_resizing: bool,
}

/// x-position where each column starts.
pub(crate) fn column_positions(columns: &[ColumnState]) -> Vec<u32> {
    let mut positions = Vec::with_capacity(columns.len());
    let mut x: u32 = 0;
    for col in columns {
        positions.push(x);
        x = x.saturating_add(col.width);
    }
    positions
}

/// Columns overlapping `[scroll_x, scroll_x + viewport_width)`.
pub(crate) fn visible_column_range(
    columns: &[ColumnState],
    scroll_x: u32,
    viewport_width: u32,
) -> Range<usize> {
    if columns.is_empty() || viewport_width == 0 {
        return 0..0;
    }

    let positions = column_positions(columns);
    let viewport_end = scroll_x.saturating_add(viewport_width);

    // First column whose right edge is past scroll_x.
    let start = match positions.binary_search(&scroll_x) {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    };

    let mut end = start;
    for (i, &left) in positions.iter().enumerate().skip(start) {
        if left >= viewport_end {
            break;
        }
        end = i + 1;
    }

    start..end
}
