//! Hacker News API client and the bounded-concurrency fetch pool.
//!
//! The API is the public Firebase mirror:
//!
//! - `GET {prefix}/topstories.json` returns the ranked list of top story ids
//! - `GET {prefix}/item/{id}.json` returns one item, or `null` if unknown
//!
//! Nothing here retries. A failed request, a non-2xx status or an
//! undecodable body is returned as an error and aborts the run.
//!
//! # Architecture
//!
//! - [`StorySource`]: what the pipeline needs from the API
//! - [`HackerNewsApi`]: the reqwest-backed implementation
//! - [`fetch_stories`]: maps [`StorySource::fetch_story`] over many ids with
//!   a ceiling on in-flight requests, keeping the input order

use crate::error::{DigestError, DigestResult};
use crate::models::Story;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use url::Url;

/// Public Hacker News API root.
pub const DEFAULT_API_PREFIX: &str = "https://hacker-news.firebaseio.com/v0";

const USER_AGENT: &str = concat!("hn_rust_digest/", env!("CARGO_PKG_VERSION"));

/// Source of top story ids and individual stories.
pub trait StorySource {
    /// The current ranked list of top story ids.
    async fn top_story_ids(&self) -> DigestResult<Vec<u64>>;

    /// A single story by id.
    async fn fetch_story(&self, id: u64) -> DigestResult<Story>;
}

/// reqwest client bound to an API prefix.
#[derive(Debug, Clone)]
pub struct HackerNewsApi {
    client: Client,
    prefix: String,
}

impl HackerNewsApi {
    /// Build a client for `prefix`, e.g. `https://hacker-news.firebaseio.com/v0`.
    ///
    /// The prefix must be an absolute URL; a trailing slash is ignored.
    pub fn new(prefix: &str) -> DigestResult<Self> {
        Url::parse(prefix)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;

        Ok(Self {
            client,
            prefix: prefix.trim_end_matches('/').to_string(),
        })
    }

    fn top_stories_url(&self) -> String {
        format!("{}/topstories.json", self.prefix)
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/item/{}.json", self.prefix, id)
    }
}

impl StorySource for HackerNewsApi {
    #[instrument(level = "info", skip_all)]
    async fn top_story_ids(&self) -> DigestResult<Vec<u64>> {
        let url = self.top_stories_url();
        let ids: Vec<u64> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(count = ids.len(), %url, "Fetched top story ids");
        Ok(ids)
    }

    async fn fetch_story(&self, id: u64) -> DigestResult<Story> {
        let story: Option<Story> = self
            .client
            .get(self.item_url(id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(id, "Fetched story");
        story.ok_or(DigestError::MissingStory(id))
    }
}

/// Fetch every id in `ids` with at most `concurrency` requests in flight.
///
/// The output is in the same order as `ids`. The first failed fetch fails
/// the whole batch.
#[instrument(level = "info", skip_all, fields(count = ids.len(), concurrency = concurrency))]
pub async fn fetch_stories<S: StorySource>(
    source: &S,
    ids: &[u64],
    concurrency: usize,
) -> DigestResult<Vec<Story>> {
    let t0 = Instant::now();
    let stories: Vec<Story> = stream::iter(ids.iter().copied())
        .map(|id| source.fetch_story(id))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    info!(
        count = stories.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched stories"
    );
    Ok(stories)
}
