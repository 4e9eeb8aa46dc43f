//! Row virtualization: size estimation, size caching, range computation and
//! scroll state.

mod estimator;
mod range;
mod scroll;
mod size_cache;

pub use estimator::{ExpandedMultiplier, FixedSize, SizeEstimator};
pub use range::{clamp_scroll_offset, compute_visible_range, visible_items, VisibleItem, VisibleRange};
pub use scroll::{Align, ScrollRequest, ScrollState};
pub use size_cache::{SizeCache, SizeEntry};
