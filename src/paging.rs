// Page arithmetic shared by the claims and insights views.
//
// The paginator only tracks the current page and page size; the owning view
// passes in the current item count on every call so the two can never drift.

use std::ops::Range;

/// 1-based page cursor over a list whose length is owned elsewhere.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    current: usize,
}

impl Paginator {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of pages for `len` items. Zero items means zero pages, which
    /// renderers show as "no results" rather than an empty first page.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Jump to `page` if it exists. Returns whether the page changed.
    pub fn go_to(&mut self, page: usize, len: usize) -> bool {
        if page < 1 || page > self.total_pages(len) || page == self.current {
            return false;
        }
        self.current = page;
        true
    }

    pub fn next(&mut self, len: usize) -> bool {
        self.go_to(self.current + 1, len)
    }

    pub fn previous(&mut self, len: usize) -> bool {
        if self.current <= 1 {
            return false;
        }
        self.go_to(self.current - 1, len)
    }

    /// Pull the cursor back inside `1..=max(1, total_pages)` after the
    /// underlying list shrank.
    pub fn clamp(&mut self, len: usize) {
        let last = self.total_pages(len).max(1);
        self.current = self.current.clamp(1, last);
    }

    /// Index range of the current page, clipped to `len`.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }
}
