//! Column definitions, widths, and drag-to-resize.

mod drag;
mod resize;
mod state;

pub use drag::{DragSession, ListenerId, ListenerRegistry, PointerEventKind, PointerListenerHost};
pub use resize::{ColumnResizeController, ResizePhase};
pub use state::{Column, ColumnState};
