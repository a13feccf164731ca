// src/services/trending_sync_tests.rs
//
// End-to-end behavior of the trending synchronization layer:
// CatalogService + PaginationController + FavoriteReconciler +
// MovieDetailsController over a real SQLite store and a scripted source.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    use crate::db::connection::create_test_pool;
    use crate::domain::{Credits, MovieDetails, MovieSummary, TimeWindow, TrendingPage};
    use crate::error::{AppError, AppResult};
    use crate::events::EventBus;
    use crate::integrations::CatalogSource;
    use crate::repositories::{
        MovieCacheRepository, SqliteFavoriteRepository, SqliteMovieCacheRepository,
    };
    use crate::services::{
        CatalogService, FavoriteReconciler, MovieDetailsController, PaginationController,
        DETAILS_LOAD_ERROR,
    };

    // ========================================================================
    // TEST DOUBLES
    // ========================================================================

    type PageKey = (TimeWindow, u32);

    /// Catalog source answering from a script. Unscripted pages fail.
    /// A gated page or details call blocks until its gate is notified.
    #[derive(Default)]
    struct ScriptedSource {
        pages: Mutex<HashMap<PageKey, TrendingPage>>,
        gates: Mutex<HashMap<PageKey, Arc<Notify>>>,
        calls: Mutex<Vec<PageKey>>,
        details: Mutex<HashMap<i64, MovieDetails>>,
        details_gates: Mutex<HashMap<i64, Arc<Notify>>>,
        details_calls: AtomicUsize,
        credits: Mutex<HashMap<i64, Credits>>,
    }

    impl ScriptedSource {
        fn script(&self, window: TimeWindow, page: u32, ids: std::ops::RangeInclusive<i64>, total_pages: u32) {
            let results = movies(ids);
            self.pages.lock().unwrap().insert(
                (window, page),
                TrendingPage {
                    page,
                    total_results: results.len() as u32,
                    results,
                    total_pages,
                },
            );
        }

        fn gate(&self, window: TimeWindow, page: u32) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.gates.lock().unwrap().insert((window, page), gate.clone());
            gate
        }

        fn gate_details(&self, movie_id: i64) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.details_gates.lock().unwrap().insert(movie_id, gate.clone());
            gate
        }

        fn calls_for(&self, window: TimeWindow, page: u32) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|key| **key == (window, page))
                .count()
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CatalogSource for ScriptedSource {
        async fn get_trending(&self, window: TimeWindow, page: u32) -> AppResult<TrendingPage> {
            self.calls.lock().unwrap().push((window, page));

            let gate = self.gates.lock().unwrap().get(&(window, page)).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            self.pages
                .lock()
                .unwrap()
                .get(&(window, page))
                .cloned()
                .ok_or(AppError::Api {
                    status: 503,
                    message: "offline".to_string(),
                })
        }

        async fn get_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
            self.details_calls.fetch_add(1, Ordering::SeqCst);

            let gate = self.details_gates.lock().unwrap().get(&movie_id).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            self.details
                .lock()
                .unwrap()
                .get(&movie_id)
                .cloned()
                .ok_or(AppError::NotFound)
        }

        async fn get_credits(&self, movie_id: i64) -> AppResult<Credits> {
            self.credits
                .lock()
                .unwrap()
                .get(&movie_id)
                .cloned()
                .ok_or(AppError::NotFound)
        }
    }

    /// Cache wrapper counting partition reads
    struct CountingCache {
        inner: SqliteMovieCacheRepository,
        reads: AtomicUsize,
    }

    impl MovieCacheRepository for CountingCache {
        fn query_partition(&self, window: TimeWindow) -> AppResult<Vec<MovieSummary>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.query_partition(window)
        }

        fn replace_partition(&self, window: TimeWindow, movies: &[MovieSummary]) -> AppResult<()> {
            self.inner.replace_partition(window, movies)
        }

        fn partition_size(&self, window: TimeWindow) -> AppResult<usize> {
            self.inner.partition_size(window)
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        source: Arc<ScriptedSource>,
        cache: Arc<CountingCache>,
        catalog: Arc<CatalogService>,
    }

    fn harness() -> Harness {
        let (dir, pool) = create_test_pool();
        let source = Arc::new(ScriptedSource::default());
        let cache = Arc::new(CountingCache {
            inner: SqliteMovieCacheRepository::new(Arc::clone(&pool)),
            reads: AtomicUsize::new(0),
        });
        let favorites = Arc::new(SqliteFavoriteRepository::new(pool).unwrap());
        let catalog = Arc::new(CatalogService::new(
            source.clone(),
            cache.clone(),
            favorites,
            Arc::new(EventBus::new()),
        ));
        Harness {
            _dir: dir,
            source,
            cache,
            catalog,
        }
    }

    fn movies(ids: std::ops::RangeInclusive<i64>) -> Vec<MovieSummary> {
        ids.map(|id| MovieSummary::new(id, format!("Movie {}", id))).collect()
    }

    fn ids(movies: &[MovieSummary]) -> Vec<i64> {
        movies.iter().map(|m| m.id).collect()
    }

    async fn wait_until<F: FnMut() -> bool>(mut condition: F) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    // ========================================================================
    // PAGINATION
    // ========================================================================

    #[tokio::test]
    async fn test_page_one_then_next_page_then_window_change() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);
        h.source.script(TimeWindow::Today, 2, 21..=40, 3);
        h.source.script(TimeWindow::ThisWeek, 1, 100..=119, 5);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);

        controller.load_initial().await;
        let state = controller.snapshot();
        assert_eq!(state.movies.len(), 20);
        assert_eq!(state.cursor.current_page, 1);
        assert_eq!(state.cursor.total_pages, 3);
        assert!(!state.is_loading);

        assert!(controller.load_next_page().await);
        let state = controller.snapshot();
        assert_eq!(ids(&state.movies), (1..=40).collect::<Vec<_>>());
        assert_eq!(state.cursor.current_page, 2);
        assert!(!state.is_paging());

        controller.change_window(TimeWindow::ThisWeek).await;
        let state = controller.snapshot();
        assert_eq!(state.window, TimeWindow::ThisWeek);
        assert_eq!(ids(&state.movies), (100..=119).collect::<Vec<_>>());
        assert_eq!(state.cursor.current_page, 1);
        assert_eq!(state.cursor.total_pages, 5);
    }

    #[tokio::test]
    async fn test_page_one_replaces_held_list_and_cache() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);
        h.source.script(TimeWindow::Today, 2, 21..=40, 3);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        controller.load_initial().await;
        controller.load_next_page().await;

        h.source.script(TimeWindow::Today, 1, 50..=59, 2);
        controller.refresh().await;

        let state = controller.snapshot();
        assert_eq!(ids(&state.movies), (50..=59).collect::<Vec<_>>());
        assert_eq!(state.cursor.current_page, 1);
        assert_eq!(state.cursor.total_pages, 2);
        assert_eq!(h.cache.inner.query_partition(TimeWindow::Today).unwrap(), movies(50..=59));
    }

    #[tokio::test]
    async fn test_failed_page_one_shows_cached_partition() {
        let h = harness();
        h.cache
            .inner
            .replace_partition(TimeWindow::Today, &movies(1..=5))
            .unwrap();

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        controller.load_initial().await;

        let state = controller.snapshot();
        assert_eq!(ids(&state.movies), vec![1, 2, 3, 4, 5]);
        assert_eq!(state.cursor.total_pages, 1);
        assert!(!controller.load_next_page().await, "no paging from cache");
    }

    #[tokio::test]
    async fn test_window_change_never_keeps_previous_window_rows() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        controller.load_initial().await;

        // ThisWeek is offline with an empty cache
        controller.change_window(TimeWindow::ThisWeek).await;

        let state = controller.snapshot();
        assert!(state.movies.is_empty());
        assert_eq!(state.window, TimeWindow::ThisWeek);
        assert_eq!(state.cursor.total_pages, 1);
    }

    #[tokio::test]
    async fn test_same_window_change_is_noop() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        controller.load_initial().await;
        controller.change_window(TimeWindow::Today).await;

        assert_eq!(h.source.calls_for(TimeWindow::Today, 1), 1);
        assert_eq!(controller.snapshot().movies.len(), 20);
    }

    #[tokio::test]
    async fn test_last_page_stops_paging() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 2);
        h.source.script(TimeWindow::Today, 2, 21..=30, 2);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        controller.load_initial().await;

        assert!(controller.load_next_page().await);
        assert!(!controller.load_next_page().await);
        assert_eq!(h.source.calls_for(TimeWindow::Today, 3), 0);
    }

    #[tokio::test]
    async fn test_overlapping_next_page_calls_issue_one_fetch() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);
        h.source.script(TimeWindow::Today, 2, 21..=40, 3);
        let gate = h.source.gate(TimeWindow::Today, 2);

        let controller = Arc::new(PaginationController::new(h.catalog.clone(), TimeWindow::Today));
        controller.load_initial().await;

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.load_next_page().await })
        };
        let source = h.source.clone();
        wait_until(|| source.calls_for(TimeWindow::Today, 2) == 1).await;

        assert!(controller.snapshot().is_paging());
        for _ in 0..5 {
            assert!(!controller.load_next_page().await);
        }

        gate.notify_one();
        assert!(first.await.unwrap());

        let state = controller.snapshot();
        assert_eq!(h.source.calls_for(TimeWindow::Today, 2), 1);
        assert_eq!(h.source.calls_for(TimeWindow::Today, 3), 0);
        let unique: HashSet<i64> = ids(&state.movies).into_iter().collect();
        assert_eq!(unique.len(), state.movies.len());
        assert_eq!(state.movies.len(), 40);
        assert!(!state.is_paging());
    }

    #[tokio::test]
    async fn test_next_page_fallback_appends_without_duplicates() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        controller.load_initial().await;

        // Page 2 fails: the cache holds page 1's rows, all already held
        assert!(controller.load_next_page().await);

        let state = controller.snapshot();
        assert_eq!(ids(&state.movies), (1..=20).collect::<Vec<_>>());
        assert_eq!(state.cursor.current_page, 2);
        assert_eq!(state.cursor.total_pages, 1);
        assert!(!state.is_paging());
    }

    #[tokio::test]
    async fn test_late_response_for_abandoned_window_is_discarded() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);
        h.source.script(TimeWindow::ThisWeek, 1, 100..=110, 2);
        let gate = h.source.gate(TimeWindow::Today, 1);

        let controller = Arc::new(PaginationController::new(h.catalog.clone(), TimeWindow::Today));
        let slow = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.load_initial().await })
        };
        let source = h.source.clone();
        wait_until(|| source.calls_for(TimeWindow::Today, 1) == 1).await;

        controller.change_window(TimeWindow::ThisWeek).await;
        gate.notify_one();
        slow.await.unwrap();

        let state = controller.snapshot();
        assert_eq!(state.window, TimeWindow::ThisWeek);
        assert_eq!(ids(&state.movies), (100..=110).collect::<Vec<_>>());
        assert!(!state.is_loading);

        // The late fetch still refreshed its own window's partition
        assert_eq!(h.cache.inner.partition_size(TimeWindow::Today).unwrap(), 20);
    }

    #[tokio::test]
    async fn test_window_change_during_paging_discards_page() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=20, 3);
        h.source.script(TimeWindow::Today, 2, 21..=40, 3);
        h.source.script(TimeWindow::ThisWeek, 1, 100..=105, 1);
        let gate = h.source.gate(TimeWindow::Today, 2);

        let controller = Arc::new(PaginationController::new(h.catalog.clone(), TimeWindow::Today));
        controller.load_initial().await;

        let paging = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.load_next_page().await })
        };
        let source = h.source.clone();
        wait_until(|| source.calls_for(TimeWindow::Today, 2) == 1).await;

        controller.change_window(TimeWindow::ThisWeek).await;
        gate.notify_one();
        paging.await.unwrap();

        let state = controller.snapshot();
        assert_eq!(ids(&state.movies), (100..=105).collect::<Vec<_>>());
        assert_eq!(state.cursor.current_page, 1);
        assert!(!state.is_paging());
    }

    // ========================================================================
    // FAVORITE RECONCILIATION
    // ========================================================================

    #[tokio::test]
    async fn test_favorite_emission_restamps_held_list_without_reads() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 40..=45, 1);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        let reconciler = FavoriteReconciler::new(h.catalog.clone());
        let task = reconciler.attach(controller.state_handle());
        controller.load_initial().await;

        let remote_calls = h.source.total_calls();
        let cache_reads = h.cache.reads.load(Ordering::SeqCst);

        h.catalog
            .add_favorite(&MovieSummary::new(42, "Answer"))
            .await
            .unwrap();

        let mut rx = controller.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.movies.iter().any(|m| m.id == 42 && m.is_favorite)),
        )
        .await
        .expect("favorite flag not applied")
        .unwrap();

        let state = controller.snapshot();
        assert_eq!(state.movies.iter().filter(|m| m.is_favorite).count(), 1);
        assert_eq!(h.source.total_calls(), remote_calls);
        assert_eq!(h.cache.reads.load(Ordering::SeqCst), cache_reads);

        task.abort();
    }

    #[tokio::test]
    async fn test_fetched_rows_are_stamped_from_existing_favorites() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=3, 2);
        h.source.script(TimeWindow::Today, 2, 4..=6, 2);
        h.catalog.add_favorite(&MovieSummary::new(2, "Two")).await.unwrap();
        h.catalog.add_favorite(&MovieSummary::new(5, "Five")).await.unwrap();

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        let reconciler = FavoriteReconciler::new(h.catalog.clone());
        let _task = reconciler.attach(controller.state_handle());

        controller.load_initial().await;
        controller.load_next_page().await;

        let mut rx = controller.subscribe();
        let state = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.movies.len() == 6 && s.movies.iter().filter(|m| m.is_favorite).count() == 2),
        )
        .await
        .expect("favorites not stamped")
        .unwrap()
        .clone();

        let favorites: Vec<i64> = state.movies.iter().filter(|m| m.is_favorite).map(|m| m.id).collect();
        assert_eq!(favorites, vec![2, 5]);
    }

    #[tokio::test]
    async fn test_toggle_from_list_reads_store_and_converges() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 1..=3, 1);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        let reconciler = FavoriteReconciler::new(h.catalog.clone());
        let _task = reconciler.attach(controller.state_handle());
        controller.load_initial().await;

        let movie = controller.snapshot().movies[1].clone();

        assert!(reconciler.toggle_favorite(&movie).await.unwrap());
        assert!(reconciler.is_favorite(movie.id).await.unwrap());

        let mut rx = controller.subscribe();
        rx.wait_for(|s| s.movies[1].is_favorite).await.unwrap();

        assert!(!reconciler.toggle_favorite(&movie).await.unwrap());
        assert!(!reconciler.is_favorite(movie.id).await.unwrap());

        rx.wait_for(|s| s.movies.iter().all(|m| !m.is_favorite)).await.unwrap();
    }

    #[tokio::test]
    async fn test_reconciler_stops_when_target_dropped() {
        let h = harness();
        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        let reconciler = FavoriteReconciler::new(h.catalog.clone());
        let task = reconciler.attach(controller.state_handle());

        drop(controller);
        h.catalog.add_favorite(&MovieSummary::new(1, "One")).await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("reconciler did not stop")
            .unwrap();
    }

    // ========================================================================
    // DETAILS VIEW
    // ========================================================================

    fn script_details(source: &ScriptedSource, id: i64, with_credits: bool) {
        script_details_json(
            source,
            id,
            serde_json::json!({
                "id": id,
                "title": "Shown",
                "genres": [{"id": 18, "name": "Drama"}]
            }),
            with_credits,
        );
    }

    fn script_details_json(
        source: &ScriptedSource,
        id: i64,
        json: serde_json::Value,
        with_credits: bool,
    ) {
        let details: MovieDetails = serde_json::from_value(json).unwrap();
        source.details.lock().unwrap().insert(id, details);

        if with_credits {
            source.credits.lock().unwrap().insert(
                id,
                Credits {
                    id,
                    cast: Vec::new(),
                    crew: Vec::new(),
                },
            );
        }
    }

    #[tokio::test]
    async fn test_details_load_attaches_credits_and_favorite() {
        let h = harness();
        script_details(&h.source, 42, true);
        h.catalog.add_favorite(&MovieSummary::new(42, "Answer")).await.unwrap();

        let details = MovieDetailsController::new(h.catalog.clone());
        details.load(42).await;

        let state = details.snapshot();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert!(state.is_favorite);
        let movie = state.movie.unwrap();
        assert_eq!(movie.id, 42);
        assert!(movie.credits.is_some());
    }

    #[tokio::test]
    async fn test_details_without_credits_is_not_an_error() {
        let h = harness();
        script_details(&h.source, 7, false);

        let details = MovieDetailsController::new(h.catalog.clone());
        details.load(7).await;

        let state = details.snapshot();
        assert!(state.error.is_none());
        assert!(state.movie.unwrap().credits.is_none());
    }

    #[tokio::test]
    async fn test_details_failure_surfaces_error() {
        let h = harness();

        let details = MovieDetailsController::new(h.catalog.clone());
        details.load(404).await;

        let state = details.snapshot();
        assert!(!state.is_loading);
        assert!(state.movie.is_none());
        assert_eq!(state.error.as_deref(), Some(DETAILS_LOAD_ERROR));
    }

    #[tokio::test]
    async fn test_details_toggle_updates_flag_without_stream() {
        let h = harness();
        script_details(&h.source, 42, true);

        let details = MovieDetailsController::new(h.catalog.clone());
        details.load(42).await;
        assert!(!details.snapshot().is_favorite);

        // No reconciler attached: the flag comes from the store re-read
        details.toggle_favorite().await;
        assert!(details.snapshot().is_favorite);
        assert!(h.catalog.is_favorite(42).await.unwrap());

        let stored = h.catalog.observe_favorites().current();
        assert_eq!(stored[0].genre_ids, vec![18]);

        details.toggle_favorite().await;
        assert!(!details.snapshot().is_favorite);
        assert!(!h.catalog.is_favorite(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_details_toggle_without_movie_is_noop() {
        let h = harness();
        let details = MovieDetailsController::new(h.catalog.clone());

        details.toggle_favorite().await;

        assert!(h.catalog.observe_favorites().current().is_empty());
        assert_eq!(details.snapshot(), Default::default());
    }

    #[tokio::test]
    async fn test_list_and_details_converge() {
        let h = harness();
        h.source.script(TimeWindow::Today, 1, 40..=45, 1);
        script_details(&h.source, 42, true);

        let controller = PaginationController::new(h.catalog.clone(), TimeWindow::Today);
        let details = MovieDetailsController::new(h.catalog.clone());
        let reconciler = FavoriteReconciler::new(h.catalog.clone());
        let _list_task = reconciler.attach(controller.state_handle());
        let _details_task = reconciler.attach(details.state_handle());

        controller.load_initial().await;
        details.load(42).await;

        // Favorited from the details screen; the list catches up via the stream
        details.toggle_favorite().await;
        assert!(details.snapshot().is_favorite);

        let mut rx = controller.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.movies.iter().any(|m| m.id == 42 && m.is_favorite)),
        )
        .await
        .expect("list did not converge")
        .unwrap();

        // Unfavorited from the list; the details screen catches up
        let movie = controller.snapshot().movies.into_iter().find(|m| m.id == 42).unwrap();
        reconciler.toggle_favorite(&movie).await.unwrap();

        let mut details_rx = details.subscribe();
        tokio::time::timeout(Duration::from_secs(5), details_rx.wait_for(|s| !s.is_favorite))
            .await
            .expect("details did not converge")
            .unwrap();
    }
    async fn load_with_toggle_in_flight(start_favorited: bool) -> bool {
        let h = harness();
        script_details(&h.source, 42, true);
        let answer = MovieSummary::new(42, "Answer");
        if start_favorited {
            h.catalog.add_favorite(&answer).await.unwrap();
        }

        let details = Arc::new(MovieDetailsController::new(h.catalog.clone()));
        let reconciler = FavoriteReconciler::new(h.catalog.clone());
        let _task = reconciler.attach(details.state_handle());
        let gate = h.source.gate_details(42);

        let loading = {
            let details = Arc::clone(&details);
            tokio::spawn(async move { details.load(42).await })
        };
        let source = h.source.clone();
        wait_until(|| source.details_calls.load(Ordering::SeqCst) == 1).await;
        // Let the favorite lookup of the load finish before toggling
        tokio::time::sleep(Duration::from_millis(50)).await;

        let now_favorite = reconciler.toggle_favorite(&answer).await.unwrap();
        assert_eq!(now_favorite, !start_favorited);
        tokio::time::sleep(Duration::from_millis(50)).await;

        gate.notify_one();
        loading.await.unwrap();

        let mut rx = details.subscribe();
        let shown = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.movie.is_some() && s.is_favorite == now_favorite),
        )
        .await
        .is_ok();

        assert_eq!(h.catalog.is_favorite(42).await.unwrap(), now_favorite);
        shown
    }

    #[tokio::test]
    async fn test_favorite_added_during_details_load_is_shown() {
        assert!(
            load_with_toggle_in_flight(false).await,
            "details screen kept the flag read before the toggle"
        );
    }

    #[tokio::test]
    async fn test_favorite_removed_during_details_load_is_shown() {
        assert!(
            load_with_toggle_in_flight(true).await,
            "details screen kept the flag read before the toggle"
        );
    }

    #[tokio::test]
    async fn test_failed_toggle_shows_user_message() {
        let h = harness();
        // Out-of-range rating: the favorites store refuses the row
        script_details_json(
            &h.source,
            13,
            serde_json::json!({"id": 13, "title": "Broken", "vote_average": 11.5}),
            false,
        );

        let details = MovieDetailsController::new(h.catalog.clone());
        details.load(13).await;
        details.toggle_favorite().await;

        let state = details.snapshot();
        assert!(!state.is_favorite);
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to toggle favorite: Domain validation failed")
        );
        assert!(!h.catalog.is_favorite(13).await.unwrap());
    }
}
