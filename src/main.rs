//! # hn_rust_digest
//!
//! Collects Hacker News top stories that mention a keyword (`Rust` by
//! default), remembers their ids in a capped Redis list, and prints an HTML
//! fragment listing them.
//!
//! ## Usage
//!
//! ```sh
//! hn_rust_digest > public/hacker_news.html
//! ```
//!
//! ## Architecture
//!
//! One run is a short pipeline, meant to be scheduled from cron:
//! 1. **Fetching**: top story ids, then every story (50 requests in flight)
//! 2. **Filtering**: keep titles containing the keyword, at most 20
//! 3. **Backfill**: top up from previously seen ids when fewer than 20 match
//! 4. **Remember**: push this run's ids onto the Redis list and trim it to 20
//! 5. **Output**: render the Tera template to stdout
//!
//! Any failure aborts the run with a non-zero exit status; the next
//! scheduled run starts from scratch.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod digest;
mod error;
mod models;
mod outputs;
mod store;
mod utils;

use api::HackerNewsApi;
use cli::Cli;
use digest::{DigestSettings, build_digest, remember};
use error::DigestResult;
use models::Story;
use outputs::html::HtmlRenderer;
use store::{MemoryStore, RedisStore, SeenStore};
use utils::truncate_for_log;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // stdout carries the HTML fragment, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hn_rust_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let settings = args.settings();

    // Parse the template before anything touches the store.
    let renderer = match HtmlRenderer::from_file(&args.template) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!(path = %args.template.display(), error = %e, "Failed to load template");
            return Err(e.into());
        }
    };
    let api = match HackerNewsApi::new(&args.api_prefix) {
        Ok(api) => api,
        Err(e) => {
            error!(prefix = %args.api_prefix, error = %e, "Failed to build API client");
            return Err(e.into());
        }
    };

    let stories = if args.ephemeral {
        info!("Ephemeral run; seen ids will not be persisted");
        let store = MemoryStore::default();
        let result = collect(&api, &store, &settings).await;
        debug!(reads = store.reads(), remembered = ?store.snapshot(), "Ephemeral store after run");
        result
    } else {
        match RedisStore::connect(&args.redis_url, &args.store_key).await {
            Ok(store) => collect(&api, &store, &settings).await,
            Err(e) => Err(e),
        }
    };
    let stories = match stories {
        Ok(stories) => stories,
        Err(e) => {
            error!(error = %e, "Failed to collect stories");
            return Err(e.into());
        }
    };

    let html = match renderer.render(&args.static_path, &stories, &Local) {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Failed to render stories");
            return Err(e.into());
        }
    };
    debug!(preview = %truncate_for_log(&html, 300), "Rendered fragment");
    println!("{html}");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        stories = stories.len(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Select this run's stories and record their ids in `store`.
async fn collect<T: SeenStore>(
    api: &HackerNewsApi,
    store: &T,
    settings: &DigestSettings,
) -> DigestResult<Vec<Story>> {
    let stories = build_digest(api, store, settings).await?;
    info!(count = stories.len(), "Assembled stories");
    remember(store, &stories, settings.max_count).await?;
    Ok(stories)
}
