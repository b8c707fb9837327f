//! Pagination types for list operations.
//!
//! Pages are 1-indexed on the wire; `offset()` converts to the 0-based row
//! offset used by SQL.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub per_page: u32,
}

impl PageRequest {
    /// The default page size for podcast listings.
    pub const DEFAULT_PER_PAGE: u32 = 12;
    /// The maximum allowed page size.
    pub const MAX_PER_PAGE: u32 = 50;

    /// Creates a new page request, clamping both values into range.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Creates a page request for the first page with the given size.
    #[must_use]
    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(Self::DEFAULT_PER_PAGE)
    }
}

/// Information about a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PageMeta {
    /// The current page number (1-indexed).
    pub current_page: u32,
    /// The number of items per page.
    pub per_page: u32,
    /// The total number of items across all pages.
    pub total: u64,
    /// The last page number (at least 1).
    pub last_page: u64,
}

impl PageMeta {
    /// Creates page metadata.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let per_page = u64::from(request.per_page.max(1));
        Self {
            current_page: request.page,
            per_page: request.per_page,
            total,
            last_page: total.div_ceil(per_page).max(1),
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Information about this page.
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there is a next page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.meta.current_page) < self.meta.last_page
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(2, 12).limit(), 12);
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, PageRequest::MAX_PER_PAGE);
        assert_eq!(PageRequest::new(1, 0).per_page, 1);
    }

    #[test]
    fn test_page_request_default() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 12);
    }

    #[test]
    fn test_page_meta() {
        let page: Page<i32> = Page::new(vec![1, 2, 3], PageRequest::new(1, 10), 25);
        assert_eq!(page.meta.last_page, 3);
        assert!(page.has_next());

        let last: Page<i32> = Page::new(vec![1], PageRequest::new(3, 10), 21);
        assert!(!last.has_next());
    }

    #[test]
    fn test_empty_page_has_one_last_page() {
        let page: Page<i32> = Page::empty(PageRequest::default());
        assert!(page.is_empty());
        assert_eq!(page.meta.last_page, 1);
        assert_eq!(page.meta.total, 0);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(1, 10), 3);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.data, vec![2, 4, 6]);
        assert_eq!(mapped.meta.total, 3);
    }
}
