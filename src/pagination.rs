//! This module defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to return per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 50,
        }
    }
}

/// The pagination block included in list responses.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageInfo {
    /// The page that was returned.
    pub page: u64,
    /// The total number of pages for the query.
    pub pages: u64,
}

/// The number of pages needed to show `total` items at `page_size` items per page.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }

    total.div_ceil(page_size)
}
