//! Sparse row selection.
//!
//! Selection is keyed by row id, never by position, so memory is
//! proportional to the number of selected rows and selection survives
//! re-sorting.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::row::RowId;
use crate::sort::StateMode;

/// Selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No selection allowed
    None,
    /// Single row selection
    Single,
    /// Multiple rows can be selected
    #[default]
    Multiple,
}

/// What a selection operation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    pub added: Vec<RowId>,
    pub removed: Vec<RowId>,
}

impl SelectionDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Callback fired with the (proposed) next selection and the delta.
pub type SelectionChangeFn = Arc<dyn Fn(&HashSet<RowId>, &SelectionDelta) + Send + Sync>;

#[derive(Debug, Clone, Default)]
struct Inner {
    selected: HashSet<RowId>,
    /// Anchor for range selection (Shift+click starting point)
    anchor: Option<RowId>,
}

/// Row-selection map with select-all and range semantics.
pub struct SelectionModel {
    mode: SelectionMode,
    state_mode: StateMode,
    inner: Inner,
    on_change: Option<SelectionChangeFn>,
}

impl std::fmt::Debug for SelectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionModel")
            .field("mode", &self.mode)
            .field("state_mode", &self.state_mode)
            .field("selected", &self.inner.selected.len())
            .field("anchor", &self.inner.anchor)
            .finish()
    }
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(SelectionMode::Multiple)
    }
}

impl SelectionModel {
    /// Uncontrolled selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            state_mode: StateMode::Uncontrolled,
            inner: Inner::default(),
            on_change: None,
        }
    }

    /// Selection owned by the consumer; operations only report the proposed
    /// next selection through `on_change`.
    pub fn controlled(mode: SelectionMode, on_change: SelectionChangeFn) -> Self {
        Self {
            mode,
            state_mode: StateMode::Controlled,
            inner: Inner::default(),
            on_change: Some(on_change),
        }
    }

    /// Attach a change callback.
    pub fn with_on_change(mut self, on_change: SelectionChangeFn) -> Self {
        self.on_change = Some(on_change);
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the selection mode. Switching to `None` clears the selection.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        if mode == SelectionMode::None {
            self.clear();
        }
    }

    pub fn state_mode(&self) -> StateMode {
        self.state_mode
    }

    /// Check if a row is selected. O(1).
    pub fn is_selected(&self, id: &str) -> bool {
        self.inner.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.selected.is_empty()
    }

    /// Iterate selected ids in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.inner.selected.iter()
    }

    /// Selected ids, sorted for deterministic output.
    pub fn selected(&self) -> Vec<RowId> {
        let mut ids: Vec<_> = self.inner.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Anchor for range selection.
    pub fn anchor(&self) -> Option<&str> {
        self.inner.anchor.as_deref()
    }

    /// Replace the selection wholesale. In controlled mode this is how the
    /// consumer feeds its state back in.
    pub fn set_selected<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RowId>,
    {
        self.inner.selected = ids.into_iter().collect();
    }

    /// Run `op` on the live state (uncontrolled) or a copy (controlled),
    /// then notify.
    fn apply<F>(&mut self, op: F) -> SelectionDelta
    where
        F: FnOnce(&mut Inner) -> SelectionDelta,
    {
        let delta = match self.state_mode {
            StateMode::Uncontrolled => {
                let delta = op(&mut self.inner);
                if !delta.is_empty()
                    && let Some(ref handler) = self.on_change
                {
                    handler(&self.inner.selected, &delta);
                }
                delta
            }
            StateMode::Controlled => {
                let mut next = self.inner.clone();
                let delta = op(&mut next);
                if !delta.is_empty()
                    && let Some(ref handler) = self.on_change
                {
                    handler(&next.selected, &delta);
                }
                // The anchor is interaction state, not selection state.
                self.inner.anchor = next.anchor;
                delta
            }
        };
        if !delta.is_empty() {
            debug!(
                "Selection: +{} -{}",
                delta.added.len(),
                delta.removed.len()
            );
        }
        delta
    }

    /// Flip one row's selection.
    pub fn toggle(&mut self, id: &str) -> SelectionDelta {
        match self.mode {
            SelectionMode::None => SelectionDelta::default(),
            SelectionMode::Single => {
                if self.is_selected(id) {
                    self.clear()
                } else {
                    self.select(id)
                }
            }
            SelectionMode::Multiple => self.apply(|s| {
                s.anchor = Some(id.to_string());
                if s.selected.remove(id) {
                    SelectionDelta {
                        added: vec![],
                        removed: vec![id.to_string()],
                    }
                } else {
                    s.selected.insert(id.to_string());
                    SelectionDelta {
                        added: vec![id.to_string()],
                        removed: vec![],
                    }
                }
            }),
        }
    }

    /// Select exactly one row, deselecting the rest.
    pub fn select(&mut self, id: &str) -> SelectionDelta {
        if self.mode == SelectionMode::None {
            return SelectionDelta::default();
        }
        self.apply(|s| {
            let removed: Vec<_> = s.selected.iter().filter(|&i| i != id).cloned().collect();
            let was_selected = s.selected.contains(id);
            s.selected.clear();
            s.selected.insert(id.to_string());
            s.anchor = Some(id.to_string());
            let added = if was_selected {
                vec![]
            } else {
                vec![id.to_string()]
            };
            SelectionDelta { added, removed }
        })
    }

    /// Mark every id in `ids` selected.
    pub fn select_all<'a, I>(&mut self, ids: I) -> SelectionDelta
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        if self.mode != SelectionMode::Multiple {
            return SelectionDelta::default();
        }
        self.apply(|s| {
            let mut added = Vec::new();
            for id in ids {
                if s.selected.insert(id.clone()) {
                    added.push(id.clone());
                }
            }
            SelectionDelta {
                added,
                removed: vec![],
            }
        })
    }

    /// Empty the selection.
    pub fn clear(&mut self) -> SelectionDelta {
        self.apply(|s| {
            s.anchor = None;
            SelectionDelta {
                added: vec![],
                removed: s.selected.drain().collect(),
            }
        })
    }

    /// Select from the anchor to `target_id` (Shift+click).
    ///
    /// `ordered_ids` is the display order. Without `extend`, rows outside
    /// the range are deselected. Falls back to selecting `target_id` alone
    /// if the anchor or target isn't in `ordered_ids`.
    pub fn range_select(
        &mut self,
        target_id: &str,
        ordered_ids: &[RowId],
        extend: bool,
    ) -> SelectionDelta {
        if self.mode != SelectionMode::Multiple {
            return self.select(target_id);
        }
        let anchor_id = self
            .inner
            .anchor
            .clone()
            .unwrap_or_else(|| target_id.to_string());

        let anchor_pos = ordered_ids.iter().position(|id| *id == anchor_id);
        let target_pos = ordered_ids.iter().position(|id| id == target_id);
        let (start, end) = match (anchor_pos, target_pos) {
            (Some(a), Some(t)) => (a.min(t), a.max(t)),
            _ => return self.select(target_id),
        };

        self.apply(|s| {
            let range_ids: HashSet<&RowId> = ordered_ids[start..=end].iter().collect();
            let mut removed = Vec::new();
            if !extend {
                removed = s
                    .selected
                    .iter()
                    .filter(|id| !range_ids.contains(id))
                    .cloned()
                    .collect();
                for id in &removed {
                    s.selected.remove(id);
                }
            }
            let mut added = Vec::new();
            for id in &ordered_ids[start..=end] {
                if s.selected.insert(id.clone()) {
                    added.push(id.clone());
                }
            }
            SelectionDelta { added, removed }
        })
    }

    /// Drop selected ids that are not in `live`, e.g. after the data set
    /// was replaced.
    pub fn retain_ids(&mut self, live: &HashSet<&str>) -> SelectionDelta {
        self.apply(|s| {
            let removed: Vec<_> = s
                .selected
                .iter()
                .filter(|id| !live.contains(id.as_str()))
                .cloned()
                .collect();
            for id in &removed {
                s.selected.remove(id);
            }
            if s.anchor.as_deref().is_some_and(|a| !live.contains(a)) {
                s.anchor = None;
            }
            SelectionDelta {
                added: vec![],
                removed,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn ids(list: &[&str]) -> Vec<RowId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_toggle_and_lookup() {
        let mut sel = SelectionModel::default();
        assert!(!sel.is_selected("a"));
        let delta = sel.toggle("a");
        assert_eq!(delta.added, ids(&["a"]));
        assert!(sel.is_selected("a"));
        let delta = sel.toggle("a");
        assert_eq!(delta.removed, ids(&["a"]));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut sel = SelectionModel::default();
        sel.toggle("b");
        let all = ids(&["a", "b", "c"]);
        let delta = sel.select_all(&all);
        assert_eq!(delta.added, ids(&["a", "c"]));
        assert_eq!(sel.selected(), all);
        let delta = sel.clear();
        assert_eq!(delta.removed.len(), 3);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_single_mode() {
        let mut sel = SelectionModel::new(SelectionMode::Single);
        sel.toggle("a");
        sel.toggle("b");
        assert_eq!(sel.selected(), ids(&["b"]));
        assert!(sel.select_all(&ids(&["a", "b"])).is_empty());
        sel.toggle("b");
        assert!(sel.is_empty());
    }

    #[test]
    fn test_none_mode() {
        let mut sel = SelectionModel::new(SelectionMode::None);
        assert!(sel.toggle("a").is_empty());
        assert!(sel.select("a").is_empty());
        assert!(sel.is_empty());
    }

    #[test]
    fn test_range_select() {
        let order = ids(&["a", "b", "c", "d", "e"]);
        let mut sel = SelectionModel::default();
        sel.toggle("b");
        let delta = sel.range_select("d", &order, false);
        assert_eq!(delta.added, ids(&["c", "d"]));
        assert_eq!(sel.selected(), ids(&["b", "c", "d"]));

        sel.toggle("a");
        let delta = sel.range_select("b", &order, false);
        assert_eq!(delta.removed.len(), 2);
        assert_eq!(sel.selected(), ids(&["a", "b"]));
    }

    #[test]
    fn test_controlled_reports_without_mutating() {
        let seen: Arc<Mutex<Vec<Vec<RowId>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut sel = SelectionModel::controlled(
            SelectionMode::Multiple,
            Arc::new(move |next: &HashSet<RowId>, _delta: &SelectionDelta| {
                let mut v: Vec<_> = next.iter().cloned().collect();
                v.sort();
                sink.lock().unwrap().push(v);
            }),
        );

        let delta = sel.toggle("x");
        assert_eq!(delta.added, ids(&["x"]));
        assert!(!sel.is_selected("x"));
        assert_eq!(seen.lock().unwrap()[0], ids(&["x"]));

        sel.set_selected(ids(&["x"]));
        assert!(sel.is_selected("x"));
    }

    #[test]
    fn test_retain_ids() {
        let mut sel = SelectionModel::default();
        sel.select_all(&ids(&["a", "b", "c"]));
        let live: HashSet<&str> = ["a", "c"].into_iter().collect();
        let delta = sel.retain_ids(&live);
        assert_eq!(delta.removed, ids(&["b"]));
        assert_eq!(sel.selected(), ids(&["a", "c"]));
    }
}
