//! Pagination.

use crate::domain::Task;

/// Page sizes offered by the pager.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `total_count` items. Never less than one, so an
/// empty list still renders as "page 1 of 1".
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    total_count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a 1-based page number into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One page of the filtered and sorted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPage {
    pub tasks: Vec<Task>,
    pub total_count: usize,
    pub total_pages: usize,
    /// The page actually shown, after clamping.
    pub page: usize,
    pub page_size: usize,
}

impl DerivedPage {
    /// 1-based inclusive bounds for "Showing X to Y of N". `(0, 0)` when empty.
    pub fn range(&self) -> (usize, usize) {
        if self.tasks.is_empty() {
            return (0, 0);
        }
        let start = (self.page - 1) * self.page_size + 1;
        (start, start + self.tasks.len() - 1)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
