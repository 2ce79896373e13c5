//! Page-number pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] names a one-based page and a page size. Repositories use
//! [`PageRequest::offset`] and [`PageRequest::limit`] to slice their ordered
//! results, then wrap the slice in a [`Page`] together with the total number
//! of matching items so callers can render navigation from [`PageInfo`].

use serde::{Deserialize, Serialize};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PER_PAGE: usize = 6;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: usize = 50;

/// Errors raised when building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The requested page size was zero.
    #[error("page size must be at least 1")]
    EmptyPage,
    /// The requested page size exceeded [`MAX_PER_PAGE`].
    #[error("page size must be at most {max}")]
    PageTooLarge {
        /// Upper bound that was exceeded.
        max: usize,
    },
}

/// One-based page selection.
///
/// ## Invariants
/// - `page` is at least 1; smaller requests are clamped to the first page.
/// - `per_page` lies within `1..=MAX_PER_PAGE`.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 6).unwrap();
/// assert_eq!(request.offset(), 12);
/// assert_eq!(request.limit(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

impl PageRequest {
    /// Build a request for `page`, clamping pages below 1 to the first page.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `per_page` is zero or above
    /// [`MAX_PER_PAGE`].
    pub const fn new(page: usize, per_page: usize) -> Result<Self, PageRequestError> {
        if per_page == 0 {
            return Err(PageRequestError::EmptyPage);
        }
        if per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PageTooLarge { max: MAX_PER_PAGE });
        }
        let page = if page == 0 { 1 } else { page };
        Ok(Self { page, per_page })
    }

    /// Request the first page with the given size, falling back to
    /// [`DEFAULT_PER_PAGE`] when the size is out of range.
    #[must_use]
    pub fn first(per_page: usize) -> Self {
        Self::new(1, per_page).unwrap_or_default()
    }

    /// Request `page` using [`DEFAULT_PER_PAGE`].
    #[must_use]
    pub const fn with_default_size(page: usize) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of items to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::with_default_size(1)
    }
}

/// Navigation metadata derived from the total number of matching items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based page number that was served.
    pub current_page: usize,
    /// Total number of pages, `ceil(total_items / per_page)`.
    pub total_pages: usize,
    /// Number of items matching the query across all pages.
    pub total_items: usize,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl PageInfo {
    /// Derive navigation metadata for `request` given `total_items`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageInfo, PageRequest};
    ///
    /// let info = PageInfo::new(PageRequest::new(2, 6).unwrap(), 13);
    /// assert_eq!(info.total_pages, 3);
    /// assert!(info.has_next_page);
    /// assert!(info.has_prev_page);
    /// ```
    #[must_use]
    pub const fn new(request: PageRequest, total_items: usize) -> Self {
        let total_pages = total_items.div_ceil(request.per_page);
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

/// A page of items plus its navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in the order supplied by the source.
    pub items: Vec<T>,
    /// Navigation metadata.
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Wrap an already-sliced page of items.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: usize) -> Self {
        Self {
            items,
            page_info: PageInfo::new(request, total_items),
        }
    }

    /// Slice `all` according to `request`, using its length as the total.
    #[must_use]
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.limit())
            .collect();
        Self::new(items, request, total_items)
    }

    /// Transform every item while keeping the navigation metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}
