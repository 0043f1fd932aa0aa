//! Row-based scroll model for a list of equal-height items.
//!
//! Units are terminal rows.  The model knows nothing about what the items
//! are; it only tracks how far the list is scrolled and which indices that
//! puts on screen.

/// Inclusive range of item indices intersecting the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub first: usize,
    pub last: usize,
}

/// Scroll position of the image list.
#[derive(Debug, Clone)]
pub struct ListScroll {
    len: usize,
    item_rows: u16,
    viewport_rows: u16,
    /// First visible content row.
    offset: usize,
}

impl ListScroll {
    pub fn new(len: usize, item_rows: u16) -> Self {
        Self {
            len,
            item_rows: item_rows.max(1),
            viewport_rows: 0,
            offset: 0,
        }
    }

    pub fn item_rows(&self) -> u16 {
        self.item_rows
    }

    pub fn viewport_rows(&self) -> u16 {
        self.viewport_rows
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total height of all items.
    pub fn content_rows(&self) -> usize {
        self.len.saturating_mul(self.item_rows as usize)
    }

    pub fn max_offset(&self) -> usize {
        self.content_rows()
            .saturating_sub(self.viewport_rows as usize)
    }

    /// Update the viewport height (on resize).  Re-clamps the offset.
    pub fn set_viewport(&mut self, rows: u16) -> bool {
        self.viewport_rows = rows;
        self.set_offset(self.offset)
    }

    /// Change the item height, keeping the top item anchored.
    pub fn set_item_rows(&mut self, rows: u16) -> bool {
        let rows = rows.max(1);
        if rows == self.item_rows {
            return false;
        }
        let anchor = self.offset / self.item_rows as usize;
        self.item_rows = rows;
        self.offset = (anchor * rows as usize).min(self.max_offset());
        true
    }

    fn set_offset(&mut self, offset: usize) -> bool {
        let clamped = offset.min(self.max_offset());
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }

    /// Scroll by `delta` rows (positive = down).
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let target = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.set_offset(target)
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll_by(self.viewport_rows.max(1) as isize)
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll_by(-(self.viewport_rows.max(1) as isize))
    }

    pub fn scroll_to_top(&mut self) -> bool {
        self.set_offset(0)
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        self.set_offset(self.max_offset())
    }

    /// Align item `index` with the top of the viewport (as far as the
    /// content allows).
    pub fn scroll_to_item(&mut self, index: usize) -> bool {
        let index = index.min(self.len.saturating_sub(1));
        self.set_offset(index.saturating_mul(self.item_rows as usize))
    }

    /// Items currently intersecting the viewport, or `None` when nothing can
    /// be shown.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        if self.len == 0 || self.viewport_rows == 0 {
            return None;
        }
        let rows = self.item_rows as usize;
        let first = (self.offset / rows).min(self.len - 1);
        let bottom_row = self.offset + self.viewport_rows as usize - 1;
        let last = (bottom_row / rows).min(self.len - 1);
        Some(VisibleRange { first, last })
    }

    pub fn last_visible(&self) -> Option<usize> {
        self.visible_range().map(|r| r.last)
    }

    /// Top row of item `index` relative to the viewport (negative when
    /// scrolled past).
    pub fn item_top(&self, index: usize) -> isize {
        (index * self.item_rows as usize) as isize - self.offset as isize
    }
}
