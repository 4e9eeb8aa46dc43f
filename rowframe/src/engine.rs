//! The table engine: rows, sizes, scroll, and the interaction controllers.

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, trace};

use crate::columns::{Column, ColumnResizeController, ListenerRegistry};
use crate::config::EngineConfig;
use crate::error::{check_index, EngineError, Result};
use crate::focus::{FocusMove, FocusNavigator};
use crate::keys::{Activation, KeyOutcome, NavKey};
use crate::row::{reindex, rows_from_ids, RowDescriptor, RowId};
use crate::selection::{SelectionDelta, SelectionModel};
use crate::sort::{SortController, SortState};
use crate::virtualize::{
    compute_visible_range, visible_items, Align, ExpandedMultiplier, ScrollRequest, ScrollState,
    SizeCache, VisibleItem, VisibleRange,
};

/// Unique identifier for an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineId(usize);

impl EngineId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for EngineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__rowframe_{}", self.0)
    }
}

/// What the renderer paints for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualWindow {
    /// Rows to render with their offsets and sizes.
    pub items: Vec<VisibleItem>,
    /// Total content size, for the scroll container.
    pub total_size: u32,
    /// Scroll offset the window was computed for.
    pub scroll_offset: u32,
    /// The range behind `items`.
    pub range: VisibleRange,
}

/// A virtualized table's state.
///
/// Owns the row descriptors in display order, the size cache, the scroll
/// position, and one instance of each controller. Renderers feed it events
/// and measurements, call [`frame`](Self::frame) once per animation frame,
/// and paint the returned [`VirtualWindow`].
pub struct TableEngine {
    id: EngineId,
    overscan: usize,
    /// Rows as supplied, in source order.
    source: Vec<RowDescriptor>,
    /// Display position -> source position.
    order: Vec<usize>,
    /// Rows in display order, `index` = display position.
    rows: Vec<RowDescriptor>,
    sizes: SizeCache,
    scroll: ScrollState,
    pending_offset: Option<i64>,
    pending_viewport: Option<u32>,
    /// Size deltas measured since the last frame, by row.
    pending_measurements: BTreeMap<usize, i64>,
    window: VirtualWindow,
    stale: bool,
    range_computations: usize,
    focus: FocusNavigator,
    columns: ColumnResizeController,
    sort: SortController,
    selection: SelectionModel,
}

impl std::fmt::Debug for TableEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableEngine")
            .field("id", &self.id)
            .field("rows", &self.rows.len())
            .field("scroll", &self.scroll)
            .field("focus", &self.focus)
            .field("sort", &self.sort)
            .field("selection", &self.selection)
            .finish()
    }
}

impl TableEngine {
    /// Build an engine. Invalid configuration fails here.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let EngineConfig {
            options,
            rows,
            estimator,
            columns,
            sorting,
            on_sorting_change,
            on_selection_change,
            pointer_host,
        } = config;

        options.validate()?;

        let estimator = estimator.unwrap_or_else(|| {
            Arc::new(
                ExpandedMultiplier::new(options.row_height)
                    .with_factor(options.expanded_row_factor),
            )
        });
        let host = pointer_host.unwrap_or_else(|| Arc::new(ListenerRegistry::new()));

        let column_controller = ColumnResizeController::new(
            &columns,
            options.min_column_width,
            options.max_column_width,
            options.enable_column_resize,
            host,
        )?;

        let mut sort = match on_sorting_change {
            Some(on_change) => SortController::controlled(sorting, on_change),
            None => {
                let mut sort = SortController::uncontrolled();
                sort.set_state(sorting);
                sort
            }
        };
        if !columns.is_empty() {
            sort.set_sortable_columns(columns.iter().filter(|c| c.sortable).map(|c| c.id.clone()));
        }

        let selection = match on_selection_change {
            Some(on_change) => SelectionModel::controlled(options.selection_mode, on_change),
            None => SelectionModel::new(options.selection_mode),
        };

        let rows = rows
            .unwrap_or_else(|| rows_from_ids((0..options.row_count).map(|i| i.to_string())));

        let mut engine = Self {
            id: EngineId::new(),
            overscan: options.overscan,
            source: Vec::new(),
            order: Vec::new(),
            rows: Vec::new(),
            sizes: SizeCache::new(estimator),
            scroll: ScrollState::new(),
            pending_offset: None,
            pending_viewport: None,
            pending_measurements: BTreeMap::new(),
            window: VirtualWindow::default(),
            stale: true,
            range_computations: 0,
            focus: FocusNavigator::new(0),
            columns: column_controller,
            sort,
            selection,
        };
        engine.set_rows(rows)?;
        debug!(
            "TableEngine {} created: {} rows, {} columns",
            engine.id,
            engine.rows.len(),
            engine.columns.columns().len()
        );
        Ok(engine)
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if overscan != self.overscan {
            self.overscan = overscan;
            self.stale = true;
        }
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[RowDescriptor] {
        &self.rows
    }

    /// Row at display position `index`.
    pub fn row(&self, index: usize) -> Result<&RowDescriptor> {
        check_index(index, self.rows.len())?;
        Ok(&self.rows[index])
    }

    /// Display position of the row with `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Display position -> source position.
    pub fn display_order(&self) -> &[usize] {
        &self.order
    }

    /// Replace the data set.
    ///
    /// Rows are shown in the order given; the sort state is kept, but the
    /// consumer has to call [`apply_sort`](Self::apply_sort) with the new
    /// data to re-sort. Measurements survive for ids that are still
    /// present, focus is clamped, and selected ids that disappeared are
    /// dropped. Ids must be unique; a duplicate is rejected and leaves the
    /// current rows in place.
    pub fn set_rows(&mut self, rows: Vec<RowDescriptor>) -> Result<()> {
        {
            let mut seen = HashSet::with_capacity(rows.len());
            if let Some(dup) = rows.iter().find(|r| !seen.insert(r.id.as_str())) {
                return Err(EngineError::DuplicateRowId(dup.id.clone()));
            }
        }
        self.replace_rows(rows);
        Ok(())
    }

    fn replace_rows(&mut self, mut rows: Vec<RowDescriptor>) {
        reindex(&mut rows);
        self.order = (0..rows.len()).collect();
        self.source = rows;
        self.materialize();

        let live: HashSet<&str> = self.source.iter().map(|r| r.id.as_str()).collect();
        self.selection.retain_ids(&live);
        debug!("TableEngine {}: {} rows set", self.id, self.rows.len());
    }

    /// Grow or shrink to `row_count` rows. Surviving rows keep their id
    /// and expansion; new rows get their index as id, suffixed with `-N`
    /// when a surviving row already uses it.
    pub fn set_row_count(&mut self, row_count: usize) {
        let mut rows: Vec<RowDescriptor> = self.source.iter().take(row_count).cloned().collect();
        let mut taken: HashSet<RowId> = rows.iter().map(|r| r.id.clone()).collect();
        for i in rows.len()..row_count {
            let id = unused_id(i, &taken);
            taken.insert(id.clone());
            rows.push(RowDescriptor::new(id, i));
        }
        self.replace_rows(rows);
    }

    /// Rebuild display rows from `source` + `order`.
    fn materialize(&mut self) {
        self.rows = self
            .order
            .iter()
            .enumerate()
            .map(|(display, &src)| RowDescriptor {
                index: display,
                ..self.source[src].clone()
            })
            .collect();
        self.sizes.reset(&self.rows);
        self.pending_measurements.clear();
        self.focus.set_row_count(self.rows.len());
        self.stale = true;
    }

    /// Expand or collapse the row at `index`.
    ///
    /// Returns the new expansion state, or `None` if the row isn't
    /// expandable. Only that row's size is invalidated.
    pub fn toggle_expanded(&mut self, index: usize) -> Result<Option<bool>> {
        check_index(index, self.rows.len())?;
        let Some(expanded) = self.rows[index].expanded else {
            return Ok(None);
        };
        let next = !expanded;
        self.rows[index].expanded = Some(next);
        self.source[self.order[index]].expanded = Some(next);
        if self.sizes.invalidate(&self.rows[index])? {
            self.stale = true;
        }
        debug!("Row {} ({}) expanded={}", index, self.rows[index].id, next);
        Ok(Some(next))
    }

    // -------------------------------------------------------------------------
    // Sizes
    // -------------------------------------------------------------------------

    /// Size cache, read-only.
    pub fn sizes(&self) -> &SizeCache {
        &self.sizes
    }

    /// Effective size of row `index`.
    pub fn estimate_size(&self, index: usize) -> Result<u32> {
        self.sizes.estimate_size(index)
    }

    /// Start offset of row `index`.
    pub fn offset(&mut self, index: usize) -> Result<u32> {
        self.sizes.offset(index)
    }

    pub fn total_size(&mut self) -> u32 {
        self.sizes.total_size()
    }

    /// Renderer callback: row `index` was laid out at `size`.
    ///
    /// When a row wholly above the scroll offset changes size, the next
    /// frame moves the offset by the same amount so the rows on screen stay
    /// put. Which rows count as above is decided in that frame, against the
    /// latest scroll event. Returns whether the size changed.
    pub fn measure_element(&mut self, index: usize, size: u32) -> Result<bool> {
        let previous = self.sizes.estimate_size(index)?;
        let changed = self.sizes.report_measured(index, size)?;
        if changed {
            self.stale = true;
            *self.pending_measurements.entry(index).or_insert(0) += size as i64 - previous as i64;
        }
        Ok(changed)
    }

    // -------------------------------------------------------------------------
    // Scroll and frames
    // -------------------------------------------------------------------------

    pub fn scroll_offset(&self) -> u32 {
        self.scroll.offset
    }

    pub fn viewport(&self) -> u32 {
        self.scroll.viewport
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    /// Scroll event from the host. Applied on the next frame; only the
    /// latest offset per frame counts.
    pub fn on_scroll(&mut self, offset: i64) {
        self.pending_offset = Some(offset);
    }

    /// Viewport resize from the host. Applied on the next frame.
    pub fn on_viewport_resize(&mut self, viewport: u32) {
        self.pending_viewport = Some(viewport);
    }

    /// Queue a scroll request for the next frame.
    pub fn request_scroll(&mut self, request: ScrollRequest) {
        self.scroll.request(request);
    }

    /// Queue scrolling row `index` into view.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Result<()> {
        check_index(index, self.rows.len())?;
        self.scroll.request(ScrollRequest::IntoView { index, align });
        Ok(())
    }

    /// Whether the next [`frame`](Self::frame) has anything to do.
    pub fn needs_frame(&self) -> bool {
        self.stale
            || self.pending_offset.is_some()
            || self.pending_viewport.is_some()
            || self.scroll.has_request()
            || self.sizes.is_dirty()
    }

    /// Number of visible-range computations so far.
    pub fn range_computations(&self) -> usize {
        self.range_computations
    }

    /// Apply everything queued since the last frame and return the window
    /// to paint. The visible range is computed at most once per call, and
    /// not at all when nothing changed.
    pub fn frame(&mut self) -> &VirtualWindow {
        if let Some(viewport) = self.pending_viewport.take()
            && viewport != self.scroll.viewport
        {
            self.scroll.set_viewport(viewport);
            self.stale = true;
        }

        let total = self.sizes.total_size();
        if total != self.scroll.content_size {
            self.scroll.set_content_size(total);
            self.stale = true;
        }

        let before = self.scroll.offset;
        let base = self.pending_offset.take().unwrap_or(before as i64);
        let anchor = self.take_anchor_delta(base);
        if base != before as i64 || anchor != 0 {
            self.scroll.set_offset(base + anchor);
        }
        self.process_scroll_request();
        if self.scroll.offset != before {
            self.stale = true;
        }

        if self.stale {
            self.recompute();
        }
        &self.window
    }

    /// The window computed by the last frame.
    pub fn window(&self) -> &VirtualWindow {
        &self.window
    }

    /// Sum of the size changes of measured rows that ended at or before
    /// `base` in the layout the host scrolled against.
    fn take_anchor_delta(&mut self, base: i64) -> i64 {
        if self.pending_measurements.is_empty() {
            return 0;
        }
        let measured = std::mem::take(&mut self.pending_measurements);
        let mut shifted = 0i64;
        let mut anchor = 0i64;
        for (index, delta) in measured {
            let (Ok(start), Ok(size)) = (self.sizes.offset(index), self.sizes.estimate_size(index))
            else {
                continue;
            };
            let previous_end = start as i64 - shifted + size as i64 - delta;
            if previous_end <= base {
                anchor += delta;
            }
            shifted += delta;
        }
        if anchor != 0 {
            trace!("TableEngine {}: anchoring scroll by {}", self.id, anchor);
        }
        anchor
    }

    fn process_scroll_request(&mut self) {
        let Some(request) = self.scroll.take_request() else {
            return;
        };
        if let Some(ScrollRequest::IntoView { index, align }) = self.scroll.apply_request(request) {
            match (self.sizes.offset(index), self.sizes.estimate_size(index)) {
                (Ok(offset), Ok(size)) => {
                    self.scroll.scroll_into_view(offset, size, align);
                }
                _ => debug!("Scroll into view of row {} dropped: row gone", index),
            }
        }
    }

    fn recompute(&mut self) {
        let offsets = self.sizes.offsets();
        let range = compute_visible_range(
            offsets,
            self.scroll.offset as i64,
            self.scroll.viewport,
            self.overscan,
        );
        let items = visible_items(offsets, &range);
        let total_size = offsets.last().copied().unwrap_or(0);

        self.scroll.offset = range.scroll_offset;
        self.window = VirtualWindow {
            items,
            total_size,
            scroll_offset: range.scroll_offset,
            range,
        };
        self.stale = false;
        self.range_computations += 1;
        trace!(
            "TableEngine {}: rows {:?} at offset {} of {}",
            self.id,
            self.window.range.rows,
            self.window.scroll_offset,
            total_size
        );
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn focus(&self) -> Option<usize> {
        self.focus.focus()
    }

    /// Focus as a signed index, `-1` meaning no focus.
    pub fn focus_index(&self) -> isize {
        self.focus.focus_index()
    }

    pub fn focused_row(&self) -> Option<&RowDescriptor> {
        self.focus.focus().and_then(|i| self.rows.get(i))
    }

    fn follow(&mut self, mv: Option<FocusMove>) -> Option<FocusMove> {
        let mv = mv?;
        self.scroll.request(mv.scroll);
        Some(mv)
    }

    /// Move focus by `delta` rows and queue scrolling it into view.
    pub fn move_focus(&mut self, delta: isize) -> Option<FocusMove> {
        let mv = self.focus.move_focus(delta);
        self.follow(mv)
    }

    /// Focus row `index` and queue scrolling it into view.
    pub fn set_focus(&mut self, index: usize) -> Result<FocusMove> {
        let mv = self.focus.set_focus(index)?;
        self.scroll.request(mv.scroll);
        Ok(mv)
    }

    pub fn focus_first(&mut self) -> Option<FocusMove> {
        let mv = self.focus.focus_first();
        self.follow(mv)
    }

    pub fn focus_last(&mut self) -> Option<FocusMove> {
        let mv = self.focus.focus_last();
        self.follow(mv)
    }

    /// Rows a page move jumps over: one less than the rows in view.
    fn page_rows(&self) -> isize {
        self.window.range.viewport.len().saturating_sub(1).max(1) as isize
    }

    pub fn page_down(&mut self) -> Option<FocusMove> {
        let rows = self.page_rows();
        self.move_focus(rows)
    }

    pub fn page_up(&mut self) -> Option<FocusMove> {
        let rows = self.page_rows();
        self.move_focus(-rows)
    }

    /// Toggle expansion of the focused row if it is expandable.
    pub fn activate_focused(&mut self) -> Activation {
        let Some(index) = self.focus.focus() else {
            return Activation::Ignored;
        };
        match self.toggle_expanded(index) {
            Ok(Some(expanded)) => Activation::Toggled { index, expanded },
            _ => Activation::Ignored,
        }
    }

    /// Dispatch a navigation key.
    pub fn handle_key(&mut self, key: NavKey) -> KeyOutcome {
        let focus = |mv: Option<FocusMove>| mv.map(KeyOutcome::Focus).unwrap_or(KeyOutcome::Ignored);
        match key {
            NavKey::Up => focus(self.move_focus(-1)),
            NavKey::Down => focus(self.move_focus(1)),
            NavKey::PageUp => focus(self.page_up()),
            NavKey::PageDown => focus(self.page_down()),
            NavKey::Home => focus(self.focus_first()),
            NavKey::End => focus(self.focus_last()),
            NavKey::Enter => KeyOutcome::Activated(self.activate_focused()),
            NavKey::Space => KeyOutcome::Selection(self.toggle_focused_selection()),
            NavKey::SelectAll => KeyOutcome::Selection(self.select_all()),
            NavKey::Escape => match self.columns.cancel_resize() {
                Some(_) => KeyOutcome::ResizeCancelled,
                None => KeyOutcome::Ignored,
            },
        }
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &ColumnResizeController {
        &self.columns
    }

    /// Column controller, for wiring pointer events.
    pub fn columns_mut(&mut self) -> &mut ColumnResizeController {
        &mut self.columns
    }

    /// Replace the column set. Ends any drag in progress.
    pub fn set_columns(&mut self, columns: &[Column]) -> Result<()> {
        self.columns.set_columns(columns)?;
        self.sort
            .set_sortable_columns(columns.iter().filter(|c| c.sortable).map(|c| c.id.clone()));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sort(&self) -> &SortController {
        &self.sort
    }

    pub fn sort_state(&self) -> &SortState {
        self.sort.state()
    }

    /// Header activation on `column_id`. Returns the next state (applied
    /// already in uncontrolled mode, proposed only in controlled mode).
    pub fn toggle_sort(&mut self, column_id: &str) -> Option<SortState> {
        self.sort.toggle(column_id)
    }

    /// Feed the sort state back in (controlled mode) or set it directly.
    pub fn set_sort_state(&mut self, state: SortState) {
        self.sort.set_state(state);
    }

    pub fn clear_sort(&mut self) -> SortState {
        self.sort.clear()
    }

    /// Reorder rows for the current sort state.
    ///
    /// `data[i]` must be the data for the i-th row in source order (the
    /// order rows were last supplied in). With no sort active the source
    /// order is restored exactly. Focus stays on the same row.
    pub fn apply_sort<T, F>(&mut self, data: &[T], compare: F) -> Result<()>
    where
        F: Fn(&T, &T, &str) -> CmpOrdering,
    {
        if data.len() != self.source.len() {
            return Err(EngineError::DataLengthMismatch {
                expected: self.source.len(),
                actual: data.len(),
            });
        }
        let order = self.sort.sorted_indices(data, compare);
        let focused: Option<RowId> = self.focused_row().map(|r| r.id.clone());

        self.order = order;
        self.materialize();

        if let Some(id) = focused
            && let Some(index) = self.index_of(&id)
        {
            self.set_focus(index)?;
        }
        debug!(
            "TableEngine {}: rows reordered for {:?}",
            self.id,
            self.sort.state()
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    pub fn toggle_selection(&mut self, id: &str) -> SelectionDelta {
        self.selection.toggle(id)
    }

    /// Toggle selection of the focused row.
    pub fn toggle_focused_selection(&mut self) -> SelectionDelta {
        match self.focused_row().map(|r| r.id.clone()) {
            Some(id) => self.selection.toggle(&id),
            None => SelectionDelta::default(),
        }
    }

    /// Select every row.
    pub fn select_all(&mut self) -> SelectionDelta {
        self.selection.select_all(self.source.iter().map(|r| &r.id))
    }

    pub fn clear_selection(&mut self) -> SelectionDelta {
        self.selection.clear()
    }

    /// Select from the anchor to `target_id` in display order.
    pub fn range_select(&mut self, target_id: &str, extend: bool) -> SelectionDelta {
        let ordered: Vec<RowId> = self.rows.iter().map(|r| r.id.clone()).collect();
        self.selection.range_select(target_id, &ordered, extend)
    }

    /// Feed the selection back in (controlled mode) or set it directly.
    pub fn set_selected<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RowId>,
    {
        self.selection.set_selected(ids);
    }
}

/// `index` as an id, or the first `index-N` not in `taken`.
fn unused_id(index: usize, taken: &HashSet<RowId>) -> RowId {
    let id = index.to_string();
    if !taken.contains(&id) {
        return id;
    }
    (1..=taken.len())
        .map(|n| format!("{}-{}", id, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtualize::FixedSize;

    fn engine(rows: usize) -> TableEngine {
        TableEngine::new(
            EngineConfig::new()
                .row_count(rows)
                .overscan(0)
                .estimator(FixedSize(10)),
        )
        .unwrap()
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(engine(1).id(), engine(1).id());
    }

    #[test]
    fn test_frame_coalesces_scroll_events() {
        let mut e = engine(1000);
        e.on_viewport_resize(100);
        e.frame();
        let computed = e.range_computations();

        for offset in [10, 50, 120, 300, 250] {
            e.on_scroll(offset);
        }
        let window = e.frame();
        assert_eq!(window.scroll_offset, 250);
        assert_eq!(window.range.viewport, 25..36);
        assert_eq!(e.range_computations(), computed + 1);

        // Nothing new: no recomputation.
        e.frame();
        assert_eq!(e.range_computations(), computed + 1);
        assert!(!e.needs_frame());
    }

    #[test]
    fn test_measure_above_viewport_keeps_content_still() {
        let mut e = engine(100);
        e.on_viewport_resize(50);
        e.on_scroll(200);
        e.frame();
        assert_eq!(e.window().range.viewport.start, 20);

        e.measure_element(3, 30).unwrap();
        let window = e.frame();
        assert_eq!(window.scroll_offset, 220);
        assert_eq!(window.range.viewport.start, 20);
    }

    #[test]
    fn test_measure_out_of_range() {
        let mut e = engine(3);
        assert_eq!(
            e.measure_element(3, 10),
            Err(EngineError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_set_row_count_clamps_focus() {
        let mut e = engine(10);
        e.set_focus(9).unwrap();
        e.set_row_count(4);
        assert_eq!(e.focus(), Some(3));
        e.set_row_count(0);
        assert_eq!(e.focus_index(), -1);
        e.frame();
        assert!(e.window().items.is_empty());
    }

    #[test]
    fn test_set_rows_prunes_selection() {
        let mut e = engine(3);
        e.select_all();
        e.set_rows(rows_from_ids(["0", "2", "9"])).unwrap();
        assert_eq!(e.selection().selected(), vec!["0".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_set_rows_rejects_duplicate_ids() {
        let mut e = engine(2);
        assert_eq!(
            e.set_rows(rows_from_ids(["a", "b", "a"])),
            Err(EngineError::DuplicateRowId("a".into()))
        );
        let ids: Vec<&str> = e.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["0", "1"]);
    }

    #[test]
    fn test_set_row_count_mints_unused_ids() {
        let mut e = engine(0);
        e.set_rows(rows_from_ids(["2", "b"])).unwrap();
        e.toggle_selection("2");
        e.set_row_count(4);

        let ids: Vec<&str> = e.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["2", "b", "2-1", "3"]);
        assert!(e.is_selected("2"));
        assert!(!e.is_selected(&e.row(2).unwrap().id));
    }

    #[test]
    fn test_later_scroll_event_keeps_measurement_anchor() {
        let mut e = engine(100);
        e.on_viewport_resize(50);
        e.on_scroll(200);
        e.frame();

        e.on_scroll(250);
        e.measure_element(3, 30).unwrap();
        e.on_scroll(300);
        let window = e.frame();
        assert_eq!(window.scroll_offset, 320);
        assert_eq!(window.range.viewport.start, 30);
    }

    #[test]
    fn test_anchor_uses_pending_scroll_position() {
        let mut e = engine(100);
        e.on_viewport_resize(50);
        e.frame();
        assert_eq!(e.window().range.viewport.start, 0);

        // Row 30 sits below the last painted window but above the offset
        // the host has scrolled to since.
        e.on_scroll(500);
        e.measure_element(30, 30).unwrap();
        let window = e.frame();
        assert_eq!(window.scroll_offset, 520);
        assert_eq!(window.range.viewport.start, 50);

        // The first visible row grows downward: no shift.
        e.measure_element(50, 40).unwrap();
        assert_eq!(e.frame().scroll_offset, 520);
    }

    #[test]
    fn test_scroll_to_index_alignments() {
        let mut e = engine(100);
        e.on_viewport_resize(100);
        e.frame();
        e.scroll_to_index(50, Align::Start).unwrap();
        assert_eq!(e.frame().scroll_offset, 500);
        e.scroll_to_index(50, Align::Center).unwrap();
        assert_eq!(e.frame().scroll_offset, 455);
        assert!(e.scroll_to_index(100, Align::Auto).is_err());
    }
}
