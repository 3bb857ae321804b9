//! Story selection: keyword filter, backfill and the seen-ID update.
//!
//! One run goes:
//!
//! 1. fetch every top story through the bounded pool
//! 2. keep those whose title contains the keyword, capped at `max_count`
//! 3. if that leaves room, top up from previously seen ids that are not
//!    already selected, fetching them the same way
//! 4. push the selected ids onto the seen-ID store and trim it to `max_count`
//!
//! Steps 1-3 are [`build_digest`], step 4 is [`remember`].

use crate::api::{StorySource, fetch_stories};
use crate::error::DigestResult;
use crate::models::Story;
use crate::store::SeenStore;
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{info, instrument};

/// Tunables for one run.
#[derive(Debug, Clone)]
pub struct DigestSettings {
    /// Case-sensitive substring a title must contain.
    pub keyword: String,
    /// Size of the result set and of the seen-ID list.
    pub max_count: usize,
    /// Ceiling on in-flight story requests.
    pub concurrency: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            keyword: "Rust".to_string(),
            max_count: 20,
            concurrency: 50,
        }
    }
}

/// Keep stories whose title contains `keyword`, in order, at most `max_count`.
pub fn filter_by_keyword(stories: Vec<Story>, keyword: &str, max_count: usize) -> Vec<Story> {
    stories
        .into_iter()
        .filter(|story| story.mentions(keyword))
        .take(max_count)
        .collect()
}

/// Pick up to `needed` ids from `seen` (in store order) that are not in
/// `selected`. Each id is picked at most once.
pub fn select_backfill(seen: &[u64], selected: &[Story], needed: usize) -> Vec<u64> {
    let taken: HashSet<u64> = selected.iter().map(|story| story.id).collect();
    seen.iter()
        .copied()
        .filter(|id| !taken.contains(id))
        .unique()
        .take(needed)
        .collect()
}

/// Assemble this run's stories: keyword matches first, then backfill.
#[instrument(level = "info", skip_all, fields(keyword = %settings.keyword, max_count = settings.max_count))]
pub async fn build_digest<S, T>(
    source: &S,
    store: &T,
    settings: &DigestSettings,
) -> DigestResult<Vec<Story>>
where
    S: StorySource,
    T: SeenStore,
{
    let top_ids = source.top_story_ids().await?;
    let fetched = fetch_stories(source, &top_ids, settings.concurrency).await?;
    let mut stories = filter_by_keyword(fetched, &settings.keyword, settings.max_count);
    info!(
        top = top_ids.len(),
        matched = stories.len(),
        "Filtered top stories"
    );

    if stories.len() < settings.max_count {
        let seen = store.read_all().await?;
        let backfill_ids = select_backfill(&seen, &stories, settings.max_count - stories.len());
        info!(
            seen = seen.len(),
            backfill = backfill_ids.len(),
            "Backfilling from seen ids"
        );
        let backfill = fetch_stories(source, &backfill_ids, settings.concurrency).await?;
        stories.extend(backfill);
    }

    Ok(stories)
}

/// Record this run's ids at the head of the seen-ID list and trim it.
#[instrument(level = "info", skip_all, fields(count = stories.len(), cap = max_count))]
pub async fn remember<T: SeenStore>(
    store: &T,
    stories: &[Story],
    max_count: usize,
) -> DigestResult<()> {
    let ids: Vec<u64> = stories.iter().map(|story| story.id).collect();
    store.push_front(&ids).await?;
    store.truncate(max_count).await?;
    info!("Updated seen ids");
    Ok(())
}
