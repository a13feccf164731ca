// src/main.rs
//
// Command-line front end: prints the trending list for a window.
//
// Usage: moviehub [day|week] [pages]

use anyhow::{anyhow, Context};

use moviehub::application::{AppState, ErrorResponse};
use moviehub::config::CatalogConfig;
use moviehub::domain::TimeWindow;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. CONFIGURATION
    let mut args = std::env::args().skip(1);
    let window = args
        .next()
        .map(|token| TimeWindow::from_token(&token))
        .unwrap_or_default();
    let pages: u32 = match args.next() {
        Some(raw) => raw.parse().context("pages must be a positive number")?,
        None => 1,
    };

    let config = CatalogConfig::from_env().map_err(|e| anyhow!(e.to_string()))?;

    // 2. APPLICATION STATE
    let state = AppState::initialize(config).map_err(|e| {
        let response = ErrorResponse::from_app_error(e);
        anyhow!(response.message)
    })?;

    // 3. LOAD
    if window == state.trending.active_window() {
        state.trending.load_initial().await;
    } else {
        state.trending.change_window(window).await;
    }
    for _ in 1..pages {
        if !state.trending.load_next_page().await {
            break;
        }
    }

    // 4. PRINT
    let feed = state.trending.snapshot();
    if state.activity.is_offline() {
        println!("Catalog unreachable; showing the last cached list.");
    }
    println!(
        "Trending {} (page {} of {})",
        feed.window.label(),
        feed.cursor.current_page,
        feed.cursor.total_pages
    );
    for (rank, movie) in feed.movies.iter().enumerate() {
        println!(
            "{:>3}. {}{}  [{}]",
            rank + 1,
            movie.title.as_deref().unwrap_or("Untitled"),
            if movie.is_favorite { " ★" } else { "" },
            movie.formatted_release_date()
        );
    }

    Ok(())
}
