//! Pagination arithmetic for listing views.

use serde::{Deserialize, Serialize};

/// Page sizes offered by every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "usize", try_from = "usize")]
pub enum RowsPerPage {
    Five,
    Ten,
    Twenty,
}

impl RowsPerPage {
    pub fn all() -> &'static [RowsPerPage] {
        &[RowsPerPage::Five, RowsPerPage::Ten, RowsPerPage::Twenty]
    }

    pub fn get(&self) -> usize {
        match self {
            RowsPerPage::Five => 5,
            RowsPerPage::Ten => 10,
            RowsPerPage::Twenty => 20,
        }
    }

    pub fn next(&self) -> RowsPerPage {
        match self {
            RowsPerPage::Five => RowsPerPage::Ten,
            RowsPerPage::Ten => RowsPerPage::Twenty,
            RowsPerPage::Twenty => RowsPerPage::Five,
        }
    }
}

impl Default for RowsPerPage {
    fn default() -> Self {
        RowsPerPage::Ten
    }
}

impl From<RowsPerPage> for usize {
    fn from(value: RowsPerPage) -> Self {
        value.get()
    }
}

impl TryFrom<usize> for RowsPerPage {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(RowsPerPage::Five),
            10 => Ok(RowsPerPage::Ten),
            20 => Ok(RowsPerPage::Twenty),
            other => Err(format!("unsupported rows per page: {} (expected 5, 10 or 20)", other)),
        }
    }
}

/// Current page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from(RowsPerPage::default())
    }
}

impl From<RowsPerPage> for Pagination {
    fn from(rows_per_page: RowsPerPage) -> Self {
        Self::new(rows_per_page.get())
    }
}

impl Pagination {
    /// A zero page size is treated as one.
    pub fn new(size: usize) -> Self {
        Self {
            page: 1,
            size: size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// `max(1, ceil(len / size))`.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.size).max(1)
    }

    /// Changing the page size always returns to the first page.
    pub fn set_size(&mut self, size: usize) {
        self.size = size.max(1);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Pull the page back into `[1, total_pages(len)]`.
    pub fn clamp(&mut self, len: usize) {
        self.page = self.page.clamp(1, self.total_pages(len));
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.page < self.total_pages(len)
    }

    pub fn next(&mut self, len: usize) {
        if self.has_next(len) {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    pub fn go_to(&mut self, page: usize, len: usize) {
        self.page = page;
        self.clamp(len);
    }

    /// Index range `[(page-1)*size, page*size)` clipped to `len`.
    pub fn bounds(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.page - 1).saturating_mul(self.size).min(len);
        let end = start.saturating_add(self.size).min(len);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.bounds(items.len())]
    }
}
