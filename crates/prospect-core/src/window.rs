//! Viewport arithmetic for virtualized lists.
//!
//! Given the number of rows, a uniform row height and a viewport, these
//! functions work out which contiguous index range must be rendered and how
//! far to translate it so that scrolling looks like the whole list exists.
//! All of them run in constant time regardless of the list length.

use crate::error::EngineError;

/// Scroll position and geometry of the area a list renders into.
///
/// Units are arbitrary (pixels, terminal rows) but must agree across the
/// three fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Distance scrolled from the top of the list. Negative values are treated as 0.
    pub scroll_offset: f64,
    /// Height of the visible area.
    pub viewport_height: f64,
    /// Height of one row.
    pub item_height: f64,
}

impl ViewportState {
    pub fn new(scroll_offset: f64, viewport_height: f64, item_height: f64) -> Self {
        Self {
            scroll_offset,
            viewport_height,
            item_height,
        }
    }

    /// Reject geometry the windowing math cannot work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.item_height.is_finite() || self.item_height <= 0.0 {
            return Err(EngineError::config(format!(
                "item height must be positive, got {}",
                self.item_height
            )));
        }
        if !self.viewport_height.is_finite() || self.viewport_height < 0.0 {
            return Err(EngineError::config(format!(
                "viewport height must not be negative, got {}",
                self.viewport_height
            )));
        }
        if self.scroll_offset.is_nan() {
            return Err(EngineError::config("scroll offset is NaN"));
        }
        Ok(())
    }

    fn clamped_offset(&self) -> f64 {
        if self.scroll_offset.is_finite() {
            self.scroll_offset.max(0.0)
        } else if self.scroll_offset > 0.0 {
            f64::MAX
        } else {
            0.0
        }
    }
}

/// The contiguous index range `[start, end)` to render, plus layout offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRange {
    /// First rendered index.
    pub start: usize,
    /// One past the last rendered index.
    pub end: usize,
    /// Height of the full scroll track (`len * item_height`).
    pub total_height: f64,
    /// Translation applied to the rendered rows (`start * item_height`).
    pub offset_y: f64,
}

impl WindowRange {
    pub const EMPTY: WindowRange = WindowRange {
        start: 0,
        end: 0,
        total_height: 0.0,
        offset_y: 0.0,
    };

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Number of rows produced for a viewport: enough to cover it, plus `overscan`.
pub fn visible_count(viewport: &ViewportState, overscan: usize) -> usize {
    ((viewport.viewport_height / viewport.item_height).ceil() as usize).saturating_add(overscan)
}

/// Compute the window of `len` rows intersecting `viewport`.
///
/// `start` is clamped into `[0, len)` so scrolling past the end still shows
/// the last row.
pub fn visible_range(
    len: usize,
    viewport: &ViewportState,
    overscan: usize,
) -> Result<WindowRange, EngineError> {
    viewport.validate()?;
    if len == 0 {
        return Ok(WindowRange::EMPTY);
    }

    let h = viewport.item_height;
    let start = ((viewport.clamped_offset() / h).floor() as usize).min(len - 1);
    let end = start.saturating_add(visible_count(viewport, overscan)).min(len);

    Ok(WindowRange {
        start,
        end,
        total_height: len as f64 * h,
        offset_y: start as f64 * h,
    })
}

/// Window covering every row, used when virtualization is switched off.
pub fn full_range(len: usize, item_height: f64) -> Result<WindowRange, EngineError> {
    if !item_height.is_finite() || item_height <= 0.0 {
        return Err(EngineError::config(format!(
            "item height must be positive, got {item_height}"
        )));
    }
    Ok(WindowRange {
        start: 0,
        end: len,
        total_height: len as f64 * item_height,
        offset_y: 0.0,
    })
}

/// Largest useful scroll offset: the last row sits on the viewport bottom.
pub fn max_scroll_offset(len: usize, viewport: &ViewportState) -> f64 {
    (len as f64 * viewport.item_height - viewport.viewport_height).max(0.0)
}

/// Smallest change to `viewport.scroll_offset` that puts row `index` fully
/// in view. Returns the current offset when it already is.
pub fn scroll_to_index(index: usize, viewport: &ViewportState) -> f64 {
    let h = viewport.item_height;
    let top = index as f64 * h;
    let bottom = top + h;
    let current = viewport.clamped_offset();

    if top < current {
        top
    } else if bottom > current + viewport.viewport_height {
        (bottom - viewport.viewport_height).max(0.0)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(scroll: f64, height: f64, item: f64) -> ViewportState {
        ViewportState::new(scroll, height, item)
    }

    #[test]
    fn thousand_rows_scrolled_ten_down() {
        let w = visible_range(1000, &vp(800.0, 400.0, 80.0), 1).unwrap();
        assert_eq!(w.start, 10);
        assert_eq!(w.end, 16);
        assert_eq!(w.len(), 6);
        assert_eq!(w.offset_y, 800.0);
        assert_eq!(w.total_height, 80_000.0);
    }

    #[test]
    fn empty_list_is_degenerate() {
        let w = visible_range(0, &vp(500.0, 400.0, 80.0), 1).unwrap();
        assert_eq!(w, WindowRange::EMPTY);
        assert!(w.is_empty());
    }

    #[test]
    fn start_clamped_to_last_row() {
        let w = visible_range(5, &vp(10_000.0, 400.0, 80.0), 1).unwrap();
        assert_eq!(w.start, 4);
        assert_eq!(w.end, 5);
        assert!(w.offset_y <= w.total_height);
    }

    #[test]
    fn fractional_scroll_floors() {
        let w = visible_range(100, &vp(119.0, 100.0, 40.0), 1).unwrap();
        assert_eq!(w.start, 2);
        // ceil(100 / 40) + 1 = 4
        assert_eq!(w.len(), 4);
    }

    #[test]
    fn negative_scroll_clamps_to_top() {
        let w = visible_range(10, &vp(-50.0, 3.0, 1.0), 1).unwrap();
        assert_eq!(w.start, 0);
        assert_eq!(w.end, 4);
    }

    #[test]
    fn zero_height_viewport_shows_overscan_only() {
        let w = visible_range(10, &vp(0.0, 0.0, 1.0), 1).unwrap();
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn huge_viewport_or_overscan_saturates() {
        let w = visible_range(10, &vp(0.0, f64::MAX, 1.0), 1).unwrap();
        assert_eq!((w.start, w.end), (0, 10));
        let w = visible_range(10, &vp(3.0, 5.0, 1.0), usize::MAX).unwrap();
        assert_eq!((w.start, w.end), (3, 10));
    }

    #[test]
    fn invalid_item_height() {
        assert!(matches!(
            visible_range(10, &vp(0.0, 10.0, 0.0), 1),
            Err(EngineError::InvalidConfiguration { .. })
        ));
        assert!(visible_range(10, &vp(0.0, 10.0, -1.0), 1).is_err());
    }

    #[test]
    fn invalid_viewport_height() {
        assert!(matches!(
            visible_range(10, &vp(0.0, -1.0, 1.0), 1),
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn window_length_property() {
        let viewport_heights = [0.0, 1.0, 7.5, 24.0, 400.0];
        for len in [1usize, 2, 9, 50, 1000] {
            for &height in &viewport_heights {
                for scroll in [0.0, 3.0, 17.25, 999.0, 1e9] {
                    let v = vp(scroll, height, 4.0);
                    let w = visible_range(len, &v, 1).unwrap();
                    let expected = visible_count(&v, 1).min(len - w.start);
                    assert_eq!(w.len(), expected);
                    assert_eq!(w.total_height, len as f64 * 4.0);
                    assert_eq!(w.offset_y, w.start as f64 * 4.0);
                    assert!(w.offset_y <= w.total_height);
                }
            }
        }
    }

    #[test]
    fn full_range_covers_everything() {
        let w = full_range(42, 2.0).unwrap();
        assert_eq!((w.start, w.end), (0, 42));
        assert_eq!(w.total_height, 84.0);
        assert_eq!(w.offset_y, 0.0);
        assert!(full_range(42, 0.0).is_err());
    }

    #[test]
    fn max_scroll() {
        assert_eq!(max_scroll_offset(10, &vp(0.0, 4.0, 1.0)), 6.0);
        assert_eq!(max_scroll_offset(2, &vp(0.0, 4.0, 1.0)), 0.0);
    }

    #[test]
    fn scroll_to_index_moves_minimally() {
        let v = vp(10.0, 5.0, 1.0);
        // Already visible.
        assert_eq!(scroll_to_index(12, &v), 10.0);
        // Above the viewport: align to top.
        assert_eq!(scroll_to_index(3, &v), 3.0);
        // Below the viewport: align to bottom.
        assert_eq!(scroll_to_index(20, &v), 16.0);
    }
}
