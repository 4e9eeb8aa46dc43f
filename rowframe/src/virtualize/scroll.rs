//! Scroll position and pending scroll requests.
//!
//! Requests are queued by controllers and event handlers and consumed by the
//! engine on the next frame, so several requests in one frame collapse into
//! one range computation.

use serde::{Deserialize, Serialize};

/// Where a row should land when scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Don't scroll if the row is already fully visible, or partly visible
    /// and taller than the viewport; otherwise scroll the minimal amount.
    #[default]
    Auto,
    /// Row's leading edge at the viewport's leading edge.
    Start,
    /// Row centered in the viewport.
    Center,
    /// Row's trailing edge at the viewport's trailing edge.
    End,
}

/// Actions that can be requested on scroll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// Scroll by relative amount (positive = down, negative = up).
    Delta(i64),
    /// Scroll to absolute offset.
    ToOffset(i64),
    /// Scroll so that row `index` is visible.
    IntoView { index: usize, align: Align },
    /// Scroll up by one viewport.
    PageUp,
    /// Scroll down by one viewport.
    PageDown,
    /// Scroll to top.
    Home,
    /// Scroll to bottom.
    End,
}

/// Scroll offset, viewport and content extents along the virtualized axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Current scroll offset, always within `[0, max_offset()]`.
    pub offset: u32,
    /// Viewport extent, reported by the renderer.
    pub viewport: u32,
    /// Total content extent.
    pub content_size: u32,
    /// Pending request, consumed on the next frame.
    request: Option<ScrollRequest>,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum scroll offset (content - viewport).
    pub fn max_offset(&self) -> u32 {
        self.content_size.saturating_sub(self.viewport)
    }

    /// Current scroll progress (0.0 = top, 1.0 = bottom).
    pub fn progress(&self) -> f32 {
        let max = self.max_offset();
        if max == 0 {
            0.0
        } else {
            self.offset as f32 / max as f32
        }
    }

    /// Whether content exceeds viewport.
    pub fn can_scroll(&self) -> bool {
        self.content_size > self.viewport
    }

    /// Queue a request. A later request in the same frame replaces an
    /// earlier one.
    pub fn request(&mut self, request: ScrollRequest) {
        self.request = Some(request);
    }

    /// Take and clear the pending request.
    pub fn take_request(&mut self) -> Option<ScrollRequest> {
        self.request.take()
    }

    pub fn has_request(&self) -> bool {
        self.request.is_some()
    }

    /// Set the viewport extent, clamping the offset.
    pub fn set_viewport(&mut self, viewport: u32) {
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Set the content extent, clamping the offset.
    pub fn set_content_size(&mut self, content_size: u32) {
        self.content_size = content_size;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Set the offset from raw (possibly out-of-range) input.
    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset.clamp(0, self.max_offset() as i64) as u32;
    }

    /// Apply a request that doesn't need row geometry.
    ///
    /// `IntoView` is handed back unprocessed since it needs to know where
    /// the row is.
    pub fn apply_request(&mut self, request: ScrollRequest) -> Option<ScrollRequest> {
        match request {
            ScrollRequest::Delta(d) => self.set_offset(self.offset as i64 + d),
            ScrollRequest::ToOffset(o) => self.set_offset(o),
            ScrollRequest::PageUp => self.offset = self.offset.saturating_sub(self.viewport),
            ScrollRequest::PageDown => {
                self.offset = self.offset.saturating_add(self.viewport).min(self.max_offset())
            }
            ScrollRequest::Home => self.offset = 0,
            ScrollRequest::End => self.offset = self.max_offset(),
            ScrollRequest::IntoView { .. } => return Some(request),
        }
        None
    }

    /// Scroll so that the span `[item_offset, item_offset + item_size)` is
    /// visible according to `align`. Returns whether the offset changed.
    pub fn scroll_into_view(&mut self, item_offset: u32, item_size: u32, align: Align) -> bool {
        let previous = self.offset;
        let item_end = item_offset.saturating_add(item_size);
        let target = match align {
            Align::Start => item_offset,
            Align::End => item_end.saturating_sub(self.viewport),
            Align::Center => {
                (item_offset + item_size / 2).saturating_sub(self.viewport / 2)
            }
            Align::Auto => {
                let view_end = self.offset.saturating_add(self.viewport);
                if item_offset >= self.offset && item_end <= view_end {
                    self.offset
                } else if item_size > self.viewport {
                    // Can't fit: leave it alone if any part is on screen.
                    if item_offset < view_end && item_end > self.offset {
                        self.offset
                    } else {
                        item_offset
                    }
                } else if item_offset < self.offset {
                    item_offset
                } else {
                    item_end - self.viewport
                }
            }
        };
        self.offset = target.min(self.max_offset());
        self.offset != previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(offset: u32) -> ScrollState {
        let mut s = ScrollState::new();
        s.set_content_size(4000);
        s.set_viewport(400);
        s.offset = offset;
        s
    }

    #[test]
    fn test_apply_delta_clamps() {
        let mut s = state(0);
        s.apply_request(ScrollRequest::Delta(-50));
        assert_eq!(s.offset, 0);
        s.apply_request(ScrollRequest::Delta(10_000));
        assert_eq!(s.offset, 3600);
    }

    #[test]
    fn test_paging() {
        let mut s = state(100);
        s.apply_request(ScrollRequest::PageDown);
        assert_eq!(s.offset, 500);
        s.apply_request(ScrollRequest::PageUp);
        s.apply_request(ScrollRequest::PageUp);
        assert_eq!(s.offset, 0);
        s.apply_request(ScrollRequest::End);
        assert_eq!(s.offset, 3600);
        s.apply_request(ScrollRequest::Home);
        assert_eq!(s.offset, 0);
    }

    #[test]
    fn test_into_view_is_returned() {
        let mut s = state(0);
        let req = ScrollRequest::IntoView {
            index: 3,
            align: Align::Auto,
        };
        assert_eq!(s.apply_request(req), Some(req));
    }

    #[test]
    fn test_auto_align_no_scroll_when_visible() {
        let mut s = state(400);
        assert!(!s.scroll_into_view(400, 40, Align::Auto));
        assert!(!s.scroll_into_view(760, 40, Align::Auto));
        assert_eq!(s.offset, 400);
    }

    #[test]
    fn test_auto_align_minimal_scroll() {
        let mut s = state(400);
        assert!(s.scroll_into_view(800, 40, Align::Auto));
        assert_eq!(s.offset, 440);
        assert!(s.scroll_into_view(360, 40, Align::Auto));
        assert_eq!(s.offset, 360);
    }

    #[test]
    fn test_auto_align_tall_row_on_screen_stays() {
        let mut s = state(250);
        s.set_viewport(100);
        // Row [200, 360) already fills the viewport [250, 350).
        assert!(!s.scroll_into_view(200, 160, Align::Auto));
        assert_eq!(s.offset, 250);
        // Partly visible at the bottom edge.
        assert!(!s.scroll_into_view(300, 160, Align::Auto));
        assert_eq!(s.offset, 250);
    }

    #[test]
    fn test_auto_align_tall_row_off_screen_snaps_to_start() {
        let mut s = state(250);
        s.set_viewport(100);
        assert!(s.scroll_into_view(600, 160, Align::Auto));
        assert_eq!(s.offset, 600);
        assert!(s.scroll_into_view(0, 160, Align::Auto));
        assert_eq!(s.offset, 0);
    }

    #[test]
    fn test_explicit_alignments() {
        let mut s = state(0);
        s.scroll_into_view(2000, 40, Align::Start);
        assert_eq!(s.offset, 2000);
        s.scroll_into_view(2000, 40, Align::End);
        assert_eq!(s.offset, 1640);
        s.scroll_into_view(2000, 40, Align::Center);
        assert_eq!(s.offset, 1820);
        s.scroll_into_view(3990, 10, Align::Start);
        assert_eq!(s.offset, 3600);
    }
}
