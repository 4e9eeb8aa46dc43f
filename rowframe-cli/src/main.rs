use std::cmp::Ordering;
use std::fs::File;

use log::info;
use rowframe::{
    Column, EngineConfig, ExpandedMultiplier, KeyOutcome, NavKey, RowDescriptor, SortState,
    TableEngine, VirtualWindow,
};
use simplelog::{Config, LevelFilter, WriteLogger};

/// A row of demo data.
struct FileEntry {
    name: String,
    size: u64,
}

fn entries(count: usize) -> Vec<FileEntry> {
    (0..count)
        .map(|i| FileEntry {
            // Only 50 distinct names so sorting has plenty of ties.
            name: format!("file-{:02}", (i * 7) % 50),
            size: ((i * 7919) % 100_000) as u64,
        })
        .collect()
}

fn compare(a: &FileEntry, b: &FileEntry, column_id: &str) -> Ordering {
    match column_id {
        "name" => a.name.cmp(&b.name),
        "size" => a.size.cmp(&b.size),
        _ => Ordering::Equal,
    }
}

fn print_window(label: &str, window: &VirtualWindow) {
    let first = window.items.first().map(|i| i.index);
    let last = window.items.last().map(|i| i.index);
    println!(
        "{:<28} offset {:>7} / {:>7}  rows {:?}..={:?} ({} rendered, viewport {:?})",
        label,
        window.scroll_offset,
        window.total_size,
        first,
        last,
        window.items.len(),
        window.range.viewport,
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("rowframe.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let data = entries(10_000);
    let rows: Vec<RowDescriptor> = (0..data.len())
        .map(|i| {
            let row = RowDescriptor::new(format!("row-{}", i), i);
            if i % 10 == 0 { row.expandable() } else { row }
        })
        .collect();

    let mut engine = TableEngine::new(
        EngineConfig::new()
            .rows(rows)
            .overscan(20)
            .estimator(ExpandedMultiplier::new(40))
            .columns(vec![
                Column::new("name", "Name", 150).sortable(),
                Column::new("size", "Size", 100).sortable(),
                Column::new("kind", "Kind", 80).fixed(),
            ])
            .column_width_bounds(60, 600),
    )?;
    info!("Demo engine {} ready", engine.id());

    // Scrolling.
    engine.on_viewport_resize(400);
    print_window("initial", engine.frame());

    for offset in [1_000, 4_000, 8_000] {
        engine.on_scroll(offset);
    }
    print_window("after 3 scroll events", engine.frame());
    println!("range computations so far: {}", engine.range_computations());

    engine.on_scroll(-250);
    print_window("overscroll up", engine.frame());

    // Measurements coming back from the renderer.
    let rendered: Vec<usize> = engine.window().items.iter().map(|i| i.index).collect();
    for index in rendered {
        engine.measure_element(index, 40 + (index % 3) as u32 * 8)?;
    }
    print_window("after measuring", engine.frame());

    // Column resize.
    let columns = engine.columns_mut();
    columns.begin_resize("name", 500)?;
    columns.pointer_move(560);
    columns.pointer_move(10_000);
    let done = columns.pointer_up(10_000);
    println!("resize finished: {:?}", done);
    println!(
        "fixed column resizable: {}",
        columns.begin_resize("kind", 0)?
    );
    println!("column widths: {:?}", engine.columns().columns());

    // Keyboard navigation.
    for key in [NavKey::Down, NavKey::Down, NavKey::PageDown, NavKey::End, NavKey::Home] {
        let outcome = engine.handle_key(key);
        let window = engine.frame();
        if let KeyOutcome::Focus(mv) = outcome {
            println!(
                "{:<10} focus {:?} -> {} (scroll {})",
                format!("{:?}", key),
                mv.previous,
                mv.current,
                window.scroll_offset
            );
        }
    }
    let outcome = engine.handle_key(NavKey::Enter);
    println!("Enter on focused row: {:?}", outcome);
    print_window("after expanding row 0", engine.frame());

    // Sorting.
    for _ in 0..3 {
        let state = engine.toggle_sort("name").unwrap_or_else(SortState::unsorted);
        engine.apply_sort(&data, compare)?;
        let head: Vec<&str> = engine.rows().iter().take(4).map(|r| r.id.as_str()).collect();
        println!("sort {:?}: first rows {:?}", state.keys(), head);
    }

    // Selection.
    let delta = engine.select_all();
    println!("select all: {} added", delta.added.len());
    engine.handle_key(NavKey::Space);
    println!("after Space on focused row: {} selected", engine.selection().len());
    engine.clear_selection();
    println!("cleared: {} selected", engine.selection().len());

    Ok(())
}
