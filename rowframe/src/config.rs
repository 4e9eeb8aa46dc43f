//! Engine configuration.
//!
//! [`TableOptions`] is plain data and can be deserialized from whatever
//! settings format the host uses. [`EngineConfig`] adds the parts that
//! aren't data: the size estimator, columns, callbacks, and the pointer
//! listener host.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::columns::{Column, PointerListenerHost};
use crate::error::ConfigError;
use crate::row::RowDescriptor;
use crate::selection::{SelectionChangeFn, SelectionMode};
use crate::sort::{SortState, SortingChangeFn};
use crate::virtualize::SizeEstimator;

/// Plain-data engine options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Total logical rows when rows aren't supplied explicitly.
    pub row_count: usize,
    /// Extra rows rendered beyond the viewport on each side.
    pub overscan: usize,
    /// Row size used by the built-in estimator.
    pub row_height: u32,
    /// Multiplier the built-in estimator applies to expanded rows.
    pub expanded_row_factor: u32,
    pub min_column_width: u32,
    pub max_column_width: u32,
    /// Gates whether resize handles are active.
    pub enable_column_resize: bool,
    pub selection_mode: SelectionMode,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            row_count: 0,
            overscan: 5,
            row_height: 40,
            expanded_row_factor: 4,
            min_column_width: 40,
            max_column_width: 1000,
            enable_column_resize: true,
            selection_mode: SelectionMode::Multiple,
        }
    }
}

impl TableOptions {
    /// Check the options for contradictions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_column_width > self.max_column_width {
            return Err(ConfigError::InvalidColumnBounds {
                min: self.min_column_width,
                max: self.max_column_width,
            });
        }
        if self.row_height == 0 {
            return Err(ConfigError::ZeroRowHeight);
        }
        if self.expanded_row_factor == 0 {
            return Err(ConfigError::InvalidExpandFactor(self.expanded_row_factor));
        }
        Ok(())
    }
}

/// Everything needed to build a [`TableEngine`](crate::TableEngine).
///
/// # Examples
///
/// ```
/// use rowframe::{Column, EngineConfig, FixedSize, TableEngine};
///
/// let engine = TableEngine::new(
///     EngineConfig::new()
///         .row_count(10_000)
///         .overscan(20)
///         .estimator(FixedSize(40))
///         .columns(vec![Column::new("name", "Name", 150).sortable()])
///         .column_width_bounds(60, 600),
/// )
/// .unwrap();
/// assert_eq!(engine.row_count(), 10_000);
/// ```
#[derive(Default)]
pub struct EngineConfig {
    pub(crate) options: TableOptions,
    pub(crate) rows: Option<Vec<RowDescriptor>>,
    pub(crate) estimator: Option<Arc<dyn SizeEstimator>>,
    pub(crate) columns: Vec<Column>,
    pub(crate) sorting: SortState,
    pub(crate) on_sorting_change: Option<SortingChangeFn>,
    pub(crate) on_selection_change: Option<SelectionChangeFn>,
    pub(crate) pointer_host: Option<Arc<dyn PointerListenerHost>>,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("options", &self.options)
            .field("rows", &self.rows.as_ref().map(Vec::len))
            .field("columns", &self.columns)
            .field("sorting", &self.sorting)
            .field("controlled_sorting", &self.on_sorting_change.is_some())
            .field("controlled_selection", &self.on_selection_change.is_some())
            .finish()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from deserialized options.
    pub fn from_options(options: TableOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Total logical rows. Rows get ids `"0"`, `"1"`, ... unless
    /// [`rows`](Self::rows) is used instead.
    pub fn row_count(mut self, row_count: usize) -> Self {
        self.options.row_count = row_count;
        self
    }

    /// Explicit row descriptors. Overrides `row_count`.
    pub fn rows(mut self, rows: Vec<RowDescriptor>) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn overscan(mut self, overscan: usize) -> Self {
        self.options.overscan = overscan;
        self
    }

    /// Row height for the built-in estimator.
    pub fn row_height(mut self, row_height: u32) -> Self {
        self.options.row_height = row_height;
        self
    }

    /// Custom size estimator, replacing the built-in one.
    pub fn estimator(mut self, estimator: impl SizeEstimator + 'static) -> Self {
        self.estimator = Some(Arc::new(estimator));
        self
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn column_width_bounds(mut self, min: u32, max: u32) -> Self {
        self.options.min_column_width = min;
        self.options.max_column_width = max;
        self
    }

    pub fn enable_column_resize(mut self, enabled: bool) -> Self {
        self.options.enable_column_resize = enabled;
        self
    }

    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.options.selection_mode = mode;
        self
    }

    /// Initial sort state.
    pub fn sorting(mut self, state: SortState) -> Self {
        self.sorting = state;
        self
    }

    /// Make sorting controlled: transitions are reported here and the
    /// consumer feeds the accepted state back with
    /// [`TableEngine::set_sort_state`](crate::TableEngine::set_sort_state).
    pub fn on_sorting_change(mut self, on_change: SortingChangeFn) -> Self {
        self.on_sorting_change = Some(on_change);
        self
    }

    /// Make selection controlled: transitions are reported here and the
    /// consumer feeds the accepted selection back with
    /// [`TableEngine::set_selected`](crate::TableEngine::set_selected).
    pub fn on_selection_change(mut self, on_change: SelectionChangeFn) -> Self {
        self.on_selection_change = Some(on_change);
        self
    }

    /// Listener host for column drags. Defaults to an in-process
    /// [`ListenerRegistry`](crate::ListenerRegistry).
    pub fn pointer_host(mut self, host: Arc<dyn PointerListenerHost>) -> Self {
        self.pointer_host = Some(host);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(TableOptions::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_bounds() {
        let opts = TableOptions {
            min_column_width: 500,
            max_column_width: 100,
            ..Default::default()
        };
        assert_eq!(
            opts.validate(),
            Err(ConfigError::InvalidColumnBounds { min: 500, max: 100 })
        );
    }

    #[test]
    fn test_zero_row_height() {
        let opts = TableOptions {
            row_height: 0,
            ..Default::default()
        };
        assert_eq!(opts.validate(), Err(ConfigError::ZeroRowHeight));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: TableOptions =
            serde_json::from_str(r#"{"overscan": 20, "selection_mode": "single"}"#).unwrap();
        assert_eq!(opts.overscan, 20);
        assert_eq!(opts.selection_mode, SelectionMode::Single);
        assert_eq!(opts.row_height, 40);
    }
}
