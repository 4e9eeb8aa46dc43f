use std::cmp::Ordering;
use std::sync::Arc;

use rowframe::{
    rows_from_ids, Activation, Column, EngineConfig, ExpandedMultiplier, FixedSize, KeyOutcome,
    ListenerRegistry, NavKey, SortDirection, SortState, TableEngine,
};

fn fixed_engine(rows: usize, size: u32, overscan: usize) -> TableEngine {
    TableEngine::new(
        EngineConfig::new()
            .row_count(rows)
            .overscan(overscan)
            .estimator(FixedSize(size)),
    )
    .unwrap()
}

// ============================================================================
// Visible range at the top of a large table
// ============================================================================

#[test]
fn test_initial_window_of_ten_thousand_rows() {
    let mut engine = fixed_engine(10_000, 40, 20);
    engine.on_viewport_resize(400);
    let window = engine.frame();

    assert_eq!(window.total_size, 400_000);
    assert_eq!(window.range.rows, 0..31);
    assert_eq!(window.items.len(), 31);
    assert_eq!(window.items[0].index, 0);
    assert_eq!(window.items[30].index, 30);
    assert_eq!(window.items[30].offset, 1200);
    assert_eq!(window.items[30].size, 40);
}

#[test]
fn test_window_in_the_middle() {
    let mut engine = fixed_engine(10_000, 40, 20);
    engine.on_viewport_resize(400);
    engine.on_scroll(200_000);
    let window = engine.frame();

    assert_eq!(window.range.viewport, 5000..5011);
    assert_eq!(window.range.rows, 4980..5031);
}

#[test]
fn test_empty_table() {
    let mut engine = fixed_engine(0, 40, 20);
    engine.on_viewport_resize(400);
    engine.on_scroll(100);
    let window = engine.frame();

    assert!(window.items.is_empty());
    assert_eq!(window.total_size, 0);
    assert_eq!(window.scroll_offset, 0);
}

// ============================================================================
// Expanding a row
// ============================================================================

#[test]
fn test_expanding_row_shifts_following_offsets() {
    let mut rows = rows_from_ids((0..100).map(|i| i.to_string()));
    rows[5].expanded = Some(false);
    let mut engine = TableEngine::new(
        EngineConfig::new()
            .rows(rows)
            .estimator(ExpandedMultiplier::new(40)),
    )
    .unwrap();

    let before: Vec<u32> = (0..100).map(|i| engine.offset(i).unwrap()).collect();
    let total_before = engine.total_size();
    assert_eq!(total_before, 4000);

    assert_eq!(engine.toggle_expanded(5).unwrap(), Some(true));

    assert_eq!(engine.estimate_size(5).unwrap(), 160);
    assert_eq!(engine.total_size(), total_before + 120);
    assert_eq!(engine.offset(6).unwrap(), before[6] + 120);
    for i in 0..=5 {
        assert_eq!(engine.offset(i).unwrap(), before[i]);
    }
}

#[test]
fn test_expanded_estimate_stands_until_measured() {
    let rows = rows_from_ids(["a", "b", "c"]);
    let rows = vec![rows[0].clone(), rows[1].clone().expandable(), rows[2].clone()];
    let mut engine = TableEngine::new(
        EngineConfig::new()
            .rows(rows)
            .estimator(ExpandedMultiplier::new(40)),
    )
    .unwrap();

    engine.toggle_expanded(1).unwrap();
    engine.frame();
    assert_eq!(engine.estimate_size(1).unwrap(), 160);

    engine.measure_element(1, 130).unwrap();
    assert_eq!(engine.estimate_size(1).unwrap(), 130);
    assert_eq!(engine.frame().total_size, 210);
}

// ============================================================================
// Column resize
// ============================================================================

#[test]
fn test_resize_clamps_to_bounds() {
    let registry = Arc::new(ListenerRegistry::new());
    let mut engine = TableEngine::new(
        EngineConfig::new()
            .columns(vec![Column::new("name", "Name", 150)])
            .column_width_bounds(60, 600)
            .pointer_host(registry.clone()),
    )
    .unwrap();

    let columns = engine.columns_mut();
    assert!(columns.begin_resize("name", 1000).unwrap());
    assert_eq!(registry.active_count(), 2);

    assert_eq!(columns.pointer_move(1150), Some(300));
    assert_eq!(columns.pointer_move(11_000), Some(600));
    assert_eq!(columns.pointer_move(1000 - 10_000), Some(60));

    let state = columns.pointer_up(1000 - 10_000).unwrap();
    assert_eq!(state.width, 60);
    assert!(!state.is_resizing);
    assert_eq!(registry.active_count(), 0);
    assert_eq!(engine.columns().width("name").unwrap(), 60);
}

// ============================================================================
// Sort cycle restores the original order
// ============================================================================

fn by_name(a: &&str, b: &&str, _column: &str) -> Ordering {
    a.cmp(b)
}

#[test]
fn test_sort_cycle_round_trips_with_ties() {
    let names = ["b", "a", "b", "c", "a", "b"];
    let mut engine = TableEngine::new(
        EngineConfig::new()
            .rows(rows_from_ids(["r0", "r1", "r2", "r3", "r4", "r5"]))
            .columns(vec![Column::new("name", "Name", 150).sortable()]),
    )
    .unwrap();
    let ids = |engine: &TableEngine| -> Vec<String> {
        engine.rows().iter().map(|r| r.id.clone()).collect()
    };

    let state = engine.toggle_sort("name").unwrap();
    assert_eq!(state, SortState::by("name", SortDirection::Asc));
    engine.apply_sort(&names, by_name).unwrap();
    assert_eq!(ids(&engine), ["r1", "r4", "r0", "r2", "r5", "r3"]);

    let state = engine.toggle_sort("name").unwrap();
    assert_eq!(state, SortState::by("name", SortDirection::Desc));
    engine.apply_sort(&names, by_name).unwrap();
    assert_eq!(ids(&engine), ["r3", "r0", "r2", "r5", "r1", "r4"]);

    let state = engine.toggle_sort("name").unwrap();
    assert!(state.is_empty());
    engine.apply_sort(&names, by_name).unwrap();
    assert_eq!(ids(&engine), ["r0", "r1", "r2", "r3", "r4", "r5"]);

    // Display indices stay contiguous.
    for (i, row) in engine.rows().iter().enumerate() {
        assert_eq!(row.index, i);
    }
}

// ============================================================================
// Focus and activation
// ============================================================================

#[test]
fn test_focus_starts_unset_and_activation() {
    let rows = rows_from_ids(["plain", "details"]);
    let rows = vec![rows[0].clone(), rows[1].clone().expandable()];
    let mut engine = TableEngine::new(EngineConfig::new().rows(rows)).unwrap();

    assert_eq!(engine.focus_index(), -1);

    let mv = engine.move_focus(1).unwrap();
    assert_eq!(mv.previous, None);
    assert_eq!(mv.current, 0);
    assert_eq!(engine.focus_index(), 0);

    // Non-expandable row: nothing happens.
    assert_eq!(engine.activate_focused(), Activation::Ignored);
    assert_eq!(engine.row(0).unwrap().expanded, None);

    engine.move_focus(1);
    assert_eq!(
        engine.handle_key(NavKey::Enter),
        KeyOutcome::Activated(Activation::Toggled {
            index: 1,
            expanded: true
        })
    );
    assert!(engine.row(1).unwrap().is_expanded());

    assert_eq!(
        engine.activate_focused(),
        Activation::Toggled {
            index: 1,
            expanded: false
        }
    );
    assert!(!engine.row(1).unwrap().is_expanded());
}
