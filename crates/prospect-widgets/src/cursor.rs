//! Keyboard cursor over the rows of a result table.
//!
//! `RowCursor` only tracks which filtered index is highlighted; scrolling is
//! derived from it by the table. Moves clamp at both ends rather than wrap,
//! so holding Down on a long list stops at the last row.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowCursor {
    index: usize,
    count: usize,
}

impl RowCursor {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `None` when there are no rows.
    pub fn current(&self) -> Option<usize> {
        (self.count > 0).then_some(self.index)
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.index = self.index.min(count.saturating_sub(1));
    }

    pub fn up(&mut self, n: usize) {
        self.index = self.index.saturating_sub(n);
    }

    pub fn down(&mut self, n: usize) {
        if self.count == 0 {
            return;
        }
        self.index = self.index.saturating_add(n).min(self.count - 1);
    }

    pub fn home(&mut self) {
        self.index = 0;
    }

    pub fn end(&mut self) {
        self.index = self.count.saturating_sub(1);
    }

    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.count.saturating_sub(1));
    }

    /// Pull the cursor into `[first, last]` (inclusive).
    pub fn clamp_to(&mut self, first: usize, last: usize) {
        if self.count == 0 {
            return;
        }
        let last = last.min(self.count - 1);
        if first <= last {
            self.index = self.index.clamp(first, last);
        }
    }
}
