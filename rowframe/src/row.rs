//! Row identity as seen by the engine.

use serde::{Deserialize, Serialize};

/// Opaque row identifier.
///
/// String ids keep selection and measurements stable when rows move.
pub type RowId = String;

/// A row as seen by the engine: identity, position, and expansion.
///
/// The engine never looks at row data itself. Renderers hand in one
/// descriptor per row whenever the data set changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDescriptor {
    /// Stable identity of the row.
    pub id: RowId,
    /// Position in the current data set (0-based, contiguous).
    pub index: usize,
    /// `None` when the row cannot be expanded.
    #[serde(default)]
    pub expanded: Option<bool>,
}

impl RowDescriptor {
    /// Create a non-expandable row.
    pub fn new(id: impl Into<RowId>, index: usize) -> Self {
        Self {
            id: id.into(),
            index,
            expanded: None,
        }
    }

    /// Make the row expandable, starting collapsed.
    pub fn expandable(mut self) -> Self {
        self.expanded = Some(false);
        self
    }

    /// Make the row expandable, starting expanded.
    pub fn expanded(mut self) -> Self {
        self.expanded = Some(true);
        self
    }

    /// Whether the row can be expanded at all.
    pub fn is_expandable(&self) -> bool {
        self.expanded.is_some()
    }

    /// Whether the row is currently expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded.unwrap_or(false)
    }
}

/// Build descriptors for `ids` in order, fixing up `index`.
pub fn rows_from_ids<I, S>(ids: I) -> Vec<RowDescriptor>
where
    I: IntoIterator<Item = S>,
    S: Into<RowId>,
{
    ids.into_iter()
        .enumerate()
        .map(|(index, id)| RowDescriptor::new(id, index))
        .collect()
}

/// Renumber `index` so it matches the position in `rows`.
pub(crate) fn reindex(rows: &mut [RowDescriptor]) {
    for (i, row) in rows.iter_mut().enumerate() {
        row.index = i;
    }
}
