//! Windowed rendering engine for large, interactive tables.
//!
//! `rowframe` decides which rows of a (possibly huge) data set need to be
//! materialized for the current scroll position, keeps track of their
//! sizes, and owns the interaction state around them: column resizing,
//! keyboard focus, sorting, and selection. It never paints anything;
//! renderers feed it events and measurements and paint the
//! [`VirtualWindow`] it hands back.
//!
//! ```
//! use rowframe::{EngineConfig, FixedSize, NavKey, TableEngine};
//!
//! let mut engine = TableEngine::new(
//!     EngineConfig::new()
//!         .row_count(10_000)
//!         .overscan(20)
//!         .estimator(FixedSize(40)),
//! )
//! .unwrap();
//!
//! engine.on_viewport_resize(400);
//! let window = engine.frame();
//! assert_eq!(window.total_size, 400_000);
//! assert_eq!(window.range.rows, 0..31);
//!
//! engine.handle_key(NavKey::End);
//! let window = engine.frame();
//! assert_eq!(window.scroll_offset, 399_600);
//! ```

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod focus;
pub mod keys;
pub mod row;
pub mod selection;
pub mod sort;
pub mod virtualize;

pub use columns::{
    Column, ColumnResizeController, ColumnState, DragSession, ListenerId, ListenerRegistry,
    PointerEventKind, PointerListenerHost, ResizePhase,
};
pub use config::{EngineConfig, TableOptions};
pub use engine::{EngineId, TableEngine, VirtualWindow};
pub use error::{ConfigError, EngineError, Result};
pub use focus::{FocusMove, FocusNavigator};
pub use keys::{Activation, KeyOutcome, NavKey};
pub use row::{rows_from_ids, RowDescriptor, RowId};
pub use selection::{SelectionChangeFn, SelectionDelta, SelectionMode, SelectionModel};
pub use sort::{
    sorted_indices, SortController, SortDirection, SortKey, SortState, SortingChangeFn, StateMode,
};
pub use virtualize::{
    clamp_scroll_offset, compute_visible_range, visible_items, Align, ExpandedMultiplier,
    FixedSize, ScrollRequest, ScrollState, SizeCache, SizeEntry, SizeEstimator, VisibleItem,
    VisibleRange,
};
