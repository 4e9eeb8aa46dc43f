//! Column resize state machine.

use std::ops::Range;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::{ConfigError, EngineError, Result};

use super::drag::{DragSession, PointerListenerHost};
use super::state::{self, Column, ColumnState};

/// Where the resize state machine is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizePhase {
    Idle,
    Resizing { column_id: String },
}

/// Owns column widths and drives them from pointer drags.
///
/// `Idle -> Resizing -> Idle`. Only the pointer-move handler changes widths
/// while resizing. The active [`DragSession`] holds the pointer listeners and
/// is dropped on every way out of `Resizing`.
pub struct ColumnResizeController {
    columns: Vec<ColumnState>,
    min_width: u32,
    max_width: u32,
    enabled: bool,
    fixed: Vec<bool>,
    host: Arc<dyn PointerListenerHost>,
    session: Option<DragSession>,
}

impl std::fmt::Debug for ColumnResizeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnResizeController")
            .field("columns", &self.columns)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("enabled", &self.enabled)
            .field("session", &self.session)
            .finish()
    }
}

impl ColumnResizeController {
    /// Create a controller for `columns`.
    ///
    /// Fails if `min_width > max_width` or column ids repeat. Initial widths
    /// outside the bounds are clamped.
    pub fn new(
        columns: &[Column],
        min_width: u32,
        max_width: u32,
        enabled: bool,
        host: Arc<dyn PointerListenerHost>,
    ) -> std::result::Result<Self, ConfigError> {
        if min_width > max_width {
            return Err(ConfigError::InvalidColumnBounds {
                min: min_width,
                max: max_width,
            });
        }
        let mut controller = Self {
            columns: Vec::new(),
            min_width,
            max_width,
            enabled,
            fixed: Vec::new(),
            host,
            session: None,
        };
        controller.set_columns(columns)?;
        Ok(controller)
    }

    /// Replace the column set.
    ///
    /// Any drag in progress is ended first. Columns that keep their id keep
    /// their current width.
    pub fn set_columns(&mut self, columns: &[Column]) -> std::result::Result<(), ConfigError> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.id == col.id) {
                return Err(ConfigError::DuplicateColumn(col.id.clone()));
            }
        }

        self.end_resize();

        let states = columns
            .iter()
            .map(|col| {
                let width = self
                    .columns
                    .iter()
                    .find(|c| c.id == col.id)
                    .map(|c| c.width)
                    .unwrap_or_else(|| self.clamp_initial(col));
                ColumnState {
                    id: col.id.clone(),
                    width,
                    is_resizing: false,
                }
            })
            .collect();

        self.columns = states;
        self.fixed = columns.iter().map(|c| !c.resizable).collect();
        Ok(())
    }

    fn clamp_initial(&self, col: &Column) -> u32 {
        let width = col.width.clamp(self.min_width, self.max_width);
        if width != col.width {
            warn!(
                "Column '{}' width {} outside [{}, {}], clamped to {}",
                col.id, col.width, self.min_width, self.max_width, width
            );
        }
        width
    }

    fn position(&self, column_id: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| EngineError::UnknownColumn(column_id.to_string()))
    }

    fn clamp(&self, width: i64) -> u32 {
        width.clamp(self.min_width as i64, self.max_width as i64) as u32
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Column states, in display order.
    pub fn columns(&self) -> &[ColumnState] {
        &self.columns
    }

    /// Current width of a column.
    pub fn width(&self, column_id: &str) -> Result<u32> {
        self.position(column_id).map(|i| self.columns[i].width)
    }

    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable resize handles. Disabling ends any drag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.end_resize();
        }
    }

    pub fn phase(&self) -> ResizePhase {
        match &self.session {
            Some(session) => ResizePhase::Resizing {
                column_id: session.column_id.clone(),
            },
            None => ResizePhase::Idle,
        }
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    /// Sum of all column widths.
    pub fn total_width(&self) -> u32 {
        self.columns
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.width))
    }

    /// x-position where each column starts.
    pub fn column_positions(&self) -> Vec<u32> {
        state::column_positions(&self.columns)
    }

    /// Columns overlapping a horizontal viewport.
    pub fn visible_column_range(&self, scroll_x: u32, viewport_width: u32) -> Range<usize> {
        state::visible_column_range(&self.columns, scroll_x, viewport_width)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Set a column's width programmatically (clamped). Returns the width
    /// actually applied.
    pub fn set_width(&mut self, column_id: &str, width: u32) -> Result<u32> {
        let i = self.position(column_id)?;
        let width = self.clamp(width as i64);
        self.columns[i].width = width;
        Ok(width)
    }

    /// Start dragging `column_id`'s resize handle at `pointer_x`.
    ///
    /// A drag already in progress, on any column, is ended first, even when
    /// this request is then refused. Returns `false` when resizing is
    /// disabled globally or for this column.
    pub fn begin_resize(&mut self, column_id: &str, pointer_x: i32) -> Result<bool> {
        let i = self.position(column_id)?;
        self.end_resize();

        if !self.enabled || self.fixed[i] {
            debug!("Resize of '{}' ignored: resizing disabled", column_id);
            return Ok(false);
        }

        let start_width = self.columns[i].width;
        self.columns[i].is_resizing = true;
        self.session = Some(DragSession::begin(
            Arc::clone(&self.host),
            column_id.to_string(),
            pointer_x,
            start_width,
        ));
        debug!(
            "Resize of '{}' started at x={} width={}",
            column_id, pointer_x, start_width
        );
        Ok(true)
    }

    /// Pointer moved to `x`. Returns the new width, or `None` when idle.
    pub fn pointer_move(&mut self, x: i32) -> Option<u32> {
        let session = self.session.as_ref()?;
        let raw = session.raw_width(x);
        let column_id = session.column_id.clone();
        let width = self.clamp(raw);
        let col = self.columns.iter_mut().find(|c| c.id == column_id)?;
        col.width = width;
        Some(width)
    }

    /// Pointer released at `x`: apply the final position and end the drag.
    pub fn pointer_up(&mut self, x: i32) -> Option<ColumnState> {
        self.pointer_move(x);
        self.end_resize()
    }

    /// End the drag, keeping the current width. Returns the resized column's
    /// final state, or `None` when idle.
    pub fn end_resize(&mut self) -> Option<ColumnState> {
        let session = self.session.take()?;
        let col = self.columns.iter_mut().find(|c| c.id == session.column_id);
        let result = col.map(|c| {
            c.is_resizing = false;
            c.clone()
        });
        if let Some(ref c) = result {
            debug!("Resize of '{}' ended at width {}", c.id, c.width);
        }
        // Dropping the session detaches its listeners.
        drop(session);
        result
    }

    /// Abort the drag and restore the width the column had when it started.
    pub fn cancel_resize(&mut self) -> Option<ColumnState> {
        let start_width = self.session.as_ref()?.start_width;
        let column_id = self.session.as_ref()?.column_id.clone();
        if let Some(col) = self.columns.iter_mut().find(|c| c.id == column_id) {
            col.width = start_width;
        }
        self.end_resize()
    }
}
