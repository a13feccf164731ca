// src/domain/pagination.rs
//
// Per-window pagination cursor
//
// In-memory only. Replaced wholesale on window change so a stale
// counter from one window never leaks into another.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCursor {
    /// Last page applied to the held list (>= 1)
    pub current_page: u32,
    /// Total pages reported by the last fetch (>= 1)
    pub total_pages: u32,
    /// A next-page fetch is in flight
    pub is_paging: bool,
}

impl PaginationCursor {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            is_paging: false,
        }
    }

    /// Cursor after page 1 was applied
    pub fn first_page(total_pages: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: total_pages.max(1),
            is_paging: false,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn next_page(&self) -> u32 {
        self.current_page + 1
    }

    /// Record a completed page. Clears the paging flag.
    pub fn advance(&mut self, page: u32, total_pages: u32) {
        self.current_page = page.max(1);
        self.total_pages = total_pages.max(1);
        self.is_paging = false;
    }
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self::new()
    }
}
