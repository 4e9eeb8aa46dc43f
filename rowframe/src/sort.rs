//! Column sort state and the three-state click cycle.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sorted column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column_id: String,
    pub direction: SortDirection,
}

/// Ordered list of sorted columns.
///
/// Only single-column sorting is produced by [`SortController`], but the
/// state is a sequence so consumers can persist and restore it unchanged if
/// multi-column sorting is added later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState(Vec<SortKey>);

impl SortState {
    /// No sorting.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Sort by a single column.
    pub fn by(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self(vec![SortKey {
            column_id: column_id.into(),
            direction,
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// Primary sort key.
    pub fn primary(&self) -> Option<&SortKey> {
        self.0.first()
    }

    /// Direction `column_id` is sorted in, if any.
    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.0
            .iter()
            .find(|k| k.column_id == column_id)
            .map(|k| k.direction)
    }

    /// State after activating `column_id` once.
    ///
    /// `unsorted -> asc -> desc -> unsorted` for the same column; any other
    /// active column is reset.
    pub fn cycled(&self, column_id: &str) -> SortState {
        match self.direction_of(column_id) {
            None => Self::by(column_id, SortDirection::Asc),
            Some(SortDirection::Asc) => Self::by(column_id, SortDirection::Desc),
            Some(SortDirection::Desc) => Self::unsorted(),
        }
    }
}

/// Callback fired with the intended next sort state.
pub type SortingChangeFn = Arc<dyn Fn(&SortState) + Send + Sync>;

/// Who owns the authoritative sort state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMode {
    /// The consumer owns the state; the controller only proposes changes.
    Controlled,
    /// The controller owns and mutates its own copy.
    Uncontrolled,
}

/// Sort cycle driver.
///
/// Both modes run the same transition ([`SortState::cycled`]); they only
/// differ in whether the controller applies the result itself.
pub struct SortController {
    mode: StateMode,
    state: SortState,
    sortable: Option<HashSet<String>>,
    on_change: Option<SortingChangeFn>,
}

impl std::fmt::Debug for SortController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortController")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("sortable", &self.sortable)
            .finish()
    }
}

impl Default for SortController {
    fn default() -> Self {
        Self::uncontrolled()
    }
}

impl SortController {
    /// Controller that owns its state.
    pub fn uncontrolled() -> Self {
        Self {
            mode: StateMode::Uncontrolled,
            state: SortState::unsorted(),
            sortable: None,
            on_change: None,
        }
    }

    /// Controller whose state is owned by the consumer.
    ///
    /// `on_change` receives every proposed transition; the consumer applies
    /// it by calling [`set_state`](Self::set_state).
    pub fn controlled(initial: SortState, on_change: SortingChangeFn) -> Self {
        Self {
            mode: StateMode::Controlled,
            state: initial,
            sortable: None,
            on_change: Some(on_change),
        }
    }

    /// Attach a change callback (uncontrolled mode notifies after applying).
    pub fn with_on_change(mut self, on_change: SortingChangeFn) -> Self {
        self.on_change = Some(on_change);
        self
    }

    /// Restrict activation to these columns. Without this every column id
    /// is sortable.
    pub fn set_sortable_columns<I, S>(&mut self, column_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable = Some(column_ids.into_iter().map(Into::into).collect());
    }

    pub fn mode(&self) -> StateMode {
        self.mode
    }

    /// Current sort state (as last supplied, in controlled mode).
    pub fn state(&self) -> &SortState {
        &self.state
    }

    /// Replace the state. In controlled mode this is how the consumer feeds
    /// its state back in.
    pub fn set_state(&mut self, state: SortState) {
        self.state = state;
    }

    pub fn is_sortable(&self, column_id: &str) -> bool {
        self.sortable
            .as_ref()
            .map(|s| s.contains(column_id))
            .unwrap_or(true)
    }

    fn propose(&mut self, next: SortState) -> SortState {
        if self.mode == StateMode::Uncontrolled {
            self.state = next.clone();
        }
        if let Some(ref handler) = self.on_change {
            handler(&next);
        }
        next
    }

    /// Activate `column_id` (header click). Returns the next state, or
    /// `None` if the column isn't sortable.
    pub fn toggle(&mut self, column_id: &str) -> Option<SortState> {
        if !self.is_sortable(column_id) {
            return None;
        }
        let next = self.state.cycled(column_id);
        debug!("Sort toggle '{}': {:?} -> {:?}", column_id, self.state, next);
        Some(self.propose(next))
    }

    /// Clear all sorting.
    pub fn clear(&mut self) -> SortState {
        self.propose(SortState::unsorted())
    }

    /// Display order for `rows` under the current state.
    ///
    /// Returns indices into `rows`. `compare(a, b, column_id)` compares two
    /// rows on one column in ascending order. The sort is stable, and
    /// descending order reverses the comparator rather than the output, so
    /// rows with equal keys keep their original relative order either way.
    /// With no sort the identity order is returned.
    pub fn sorted_indices<T, F>(&self, rows: &[T], compare: F) -> Vec<usize>
    where
        F: Fn(&T, &T, &str) -> Ordering,
    {
        sorted_indices(&self.state, rows, compare)
    }
}

/// Stable display order for `rows` under `state`. See
/// [`SortController::sorted_indices`].
pub fn sorted_indices<T, F>(state: &SortState, rows: &[T], compare: F) -> Vec<usize>
where
    F: Fn(&T, &T, &str) -> Ordering,
{
    let mut order: Vec<usize> = (0..rows.len()).collect();
    if state.is_empty() {
        return order;
    }
    // slice::sort_by is stable.
    order.sort_by(|&a, &b| {
        for key in state.keys() {
            let ord = compare(&rows[a], &rows[b], &key.column_id);
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    order
}
