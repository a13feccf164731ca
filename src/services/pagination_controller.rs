// src/services/pagination_controller.rs
//
// Pagination Controller - held trending list + per-window cursor
//
// STATE MACHINE:
// - Idle → Loading (page 1: initial, window change, refresh) → Idle
// - Idle → Paging (next page) → Idle, never re-entrant
//
// CRITICAL RULES:
// - Page 1 REPLACES the held list, later pages APPEND
// - A window change resets the cursor and discards the held list
// - A response is applied only if its window and generation still match;
//   late responses for abandoned windows are dropped
// - Appends never introduce an id already held

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{MovieSummary, PaginationCursor, TimeWindow};
use crate::services::favorite_reconciler::{restamp, stamp, FavoriteAnnotated};
use crate::services::CatalogService;

/// What the list screen observes
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub window: TimeWindow,
    pub movies: Vec<MovieSummary>,
    pub cursor: PaginationCursor,
    /// A page-1 load is in flight
    pub is_loading: bool,
    /// Bumped on every page-1 load; older responses are stale
    generation: u64,
    /// Last favorite set seen, used to stamp newly fetched rows
    favorite_ids: HashSet<i64>,
}

impl FeedState {
    fn new(window: TimeWindow) -> Self {
        Self {
            window,
            movies: Vec::new(),
            cursor: PaginationCursor::new(),
            is_loading: false,
            generation: 0,
            favorite_ids: HashSet::new(),
        }
    }

    pub fn is_paging(&self) -> bool {
        self.cursor.is_paging
    }

    fn accepts(&self, ticket: &PageTicket) -> bool {
        self.window == ticket.window && self.generation == ticket.generation
    }

    /// Start a page-1 load and hand out its ticket
    fn begin_first_page(&mut self) -> PageTicket {
        self.generation += 1;
        self.cursor = PaginationCursor::new();
        self.is_loading = true;
        PageTicket {
            window: self.window,
            generation: self.generation,
            page: 1,
        }
    }
}

impl FavoriteAnnotated for FeedState {
    fn apply_favorites(&mut self, favorite_ids: &HashSet<i64>) -> bool {
        let ids_changed = self.favorite_ids != *favorite_ids;
        if ids_changed {
            self.favorite_ids = favorite_ids.clone();
        }
        let flags_changed = restamp(&mut self.movies, favorite_ids);
        ids_changed || flags_changed
    }
}

/// Identifies the request a response belongs to
#[derive(Debug, Clone, Copy)]
struct PageTicket {
    window: TimeWindow,
    generation: u64,
    page: u32,
}

pub struct PaginationController {
    catalog: Arc<CatalogService>,
    state: Arc<watch::Sender<FeedState>>,
}

impl PaginationController {
    pub fn new(catalog: Arc<CatalogService>, window: TimeWindow) -> Self {
        let (state, _) = watch::channel(FeedState::new(window));
        Self {
            catalog,
            state: Arc::new(state),
        }
    }

    /// Observe the held list and paging flags
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn active_window(&self) -> TimeWindow {
        self.state.borrow().window
    }

    /// Handle for the favorite reconciler
    pub(crate) fn state_handle(&self) -> &Arc<watch::Sender<FeedState>> {
        &self.state
    }

    /// Load page 1 of the active window
    pub async fn load_initial(&self) {
        self.refresh().await;
    }

    /// Pull-to-refresh: re-fetch page 1 of the active window and replace
    /// the held list. The current list stays visible until the result lands.
    pub async fn refresh(&self) {
        if let Some(ticket) = self.transition(|s| Some(s.begin_first_page())) {
            self.load_first_page(ticket).await;
        }
    }

    /// Switch windows. A no-op if `window` is already active.
    pub async fn change_window(&self, window: TimeWindow) {
        let ticket = self.transition(|s| {
            if s.window == window {
                return None;
            }
            s.window = window;
            s.movies.clear();
            Some(s.begin_first_page())
        });

        if let Some(ticket) = ticket {
            log::debug!("Trending window changed to {}", window);
            self.load_first_page(ticket).await;
        }
    }

    /// Fetch and append the next page.
    ///
    /// Returns false without side effects unless a next page exists and
    /// nothing is loading or paging.
    pub async fn load_next_page(&self) -> bool {
        let ticket = self.transition(|s| {
            if !s.cursor.has_next() || s.is_loading || s.cursor.is_paging {
                return None;
            }
            s.cursor.is_paging = true;
            Some(PageTicket {
                window: s.window,
                generation: s.generation,
                page: s.cursor.next_page(),
            })
        });

        let Some(ticket) = ticket else {
            return false;
        };

        // Always produces a result: a remote failure degrades to cache
        let page = self.catalog.fetch_page(ticket.window, ticket.page).await;

        let applied = self.state.send_if_modified(|s| {
            if !s.accepts(&ticket) {
                return false;
            }
            let mut held: HashSet<i64> = s.movies.iter().map(|m| m.id).collect();
            let fresh: Vec<MovieSummary> = page
                .results
                .into_iter()
                .filter(|m| held.insert(m.id))
                .collect();
            let fresh = stamp(fresh, &s.favorite_ids);
            s.movies.extend(fresh);
            s.cursor.advance(ticket.page, page.total_pages);
            true
        });

        if !applied {
            log::debug!(
                "Discarded stale page {} for {}",
                ticket.page,
                ticket.window
            );
        }
        true
    }

    async fn load_first_page(&self, ticket: PageTicket) {
        let page = self.catalog.fetch_page(ticket.window, 1).await;

        let applied = self.state.send_if_modified(|s| {
            if !s.accepts(&ticket) {
                return false;
            }
            s.movies = stamp(page.results, &s.favorite_ids);
            s.cursor = PaginationCursor::first_page(page.total_pages);
            s.is_loading = false;
            true
        });

        if !applied {
            log::debug!("Discarded stale page 1 for {}", ticket.window);
        }
    }

    /// Apply `f` atomically; notify observers only if it produced a ticket
    fn transition<F>(&self, f: F) -> Option<PageTicket>
    where
        F: FnOnce(&mut FeedState) -> Option<PageTicket>,
    {
        let mut ticket = None;
        self.state.send_if_modified(|s| {
            ticket = f(s);
            ticket.is_some()
        });
        ticket
    }
}
