//! Command-line interface definitions.
//!
//! Every option has an environment variable fallback and a default, so a
//! bare `hn_rust_digest` run from cron behaves like the stock setup.

use crate::api::DEFAULT_API_PREFIX;
use crate::digest::DigestSettings;
use crate::outputs::html::{DEFAULT_STATIC_PATH, DEFAULT_TEMPLATE};
use crate::store::DEFAULT_STORE_KEY;
use clap::Parser;
use std::path::PathBuf;

/// Render Hacker News stories that mention a keyword as an HTML fragment.
///
/// The fragment is written to stdout; logs go to stderr.
///
/// # Examples
///
/// ```sh
/// # Stock run against a local Redis
/// hn_rust_digest > hacker_news.html
///
/// # Preview without touching Redis
/// hn_rust_digest --ephemeral --keyword Zig
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Hacker News API root
    #[arg(long, env = "HN_API_PREFIX", default_value = DEFAULT_API_PREFIX)]
    pub api_prefix: String,

    /// Redis connection URL for the seen-ID list
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1/")]
    pub redis_url: String,

    /// Redis key of the seen-ID list
    #[arg(long, env = "DIGEST_STORE_KEY", default_value = DEFAULT_STORE_KEY)]
    pub store_key: String,

    /// Maximum number of stories rendered and ids remembered
    #[arg(
        long,
        env = "DIGEST_MAX_COUNT",
        default_value_t = 20,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub max_count: u16,

    /// Base URL for static assets referenced by the template
    #[arg(long, env = "DIGEST_STATIC_PATH", default_value = DEFAULT_STATIC_PATH)]
    pub static_path: String,

    /// Case-sensitive substring a title must contain
    #[arg(short, long, env = "DIGEST_KEYWORD", default_value = "Rust")]
    pub keyword: String,

    /// Path to the Tera template
    #[arg(short, long, env = "DIGEST_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Maximum number of story requests in flight
    #[arg(
        long,
        env = "DIGEST_CONCURRENCY",
        default_value_t = 50,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub concurrency: u16,

    /// Use an empty in-memory seen-ID list instead of Redis
    #[arg(long)]
    pub ephemeral: bool,
}

impl Cli {
    pub fn settings(&self) -> DigestSettings {
        DigestSettings {
            keyword: self.keyword.clone(),
            max_count: usize::from(self.max_count),
            concurrency: usize::from(self.concurrency),
        }
    }
}
