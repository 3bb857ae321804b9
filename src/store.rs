//! The seen-ID store: a capped, newest-first list of matched story ids.
//!
//! The production store is a Redis list. The three operations the pipeline
//! needs map one-to-one onto Redis commands:
//!
//! | Operation | Redis |
//! |-----------|-------|
//! | [`SeenStore::read_all`] | `LRANGE key 0 -1` |
//! | [`SeenStore::push_front`] | `LPUSH key id1 id2 ...` |
//! | [`SeenStore::truncate`] | `LTRIM key 0 len-1` |
//!
//! `LPUSH` inserts each value at the head in turn, so after
//! `push_front(&[1, 2, 3])` the list starts `3, 2, 1`. [`MemoryStore`]
//! mirrors that exactly.
//!
//! There is no locking: one writer per run is assumed.

use crate::error::DigestResult;
use redis::AsyncCommands;
use redis::aio::{ConnectionLike, MultiplexedConnection};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, instrument};

/// Default Redis list key.
pub const DEFAULT_STORE_KEY: &str = "rust-lang-cn:hacker-news";

pub trait SeenStore {
    /// Every stored id, head first.
    async fn read_all(&self) -> DigestResult<Vec<u64>>;

    /// Insert `ids` at the head, one after another.
    async fn push_front(&self, ids: &[u64]) -> DigestResult<()>;

    /// Keep only the first `len` entries.
    async fn truncate(&self, len: usize) -> DigestResult<()>;
}

/// Seen-ID list kept in a Redis list under a single key.
///
/// Generic over the connection so any async `ConnectionLike` can back it;
/// production runs use a multiplexed connection.
#[derive(Clone)]
pub struct RedisStore<C = MultiplexedConnection> {
    conn: C,
    key: String,
}

impl RedisStore {
    #[instrument(level = "info", skip_all, fields(%key))]
    pub async fn connect(url: &str, key: &str) -> DigestResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Connected to Redis");
        Ok(Self::with_connection(conn, key))
    }
}

impl<C> RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    pub fn with_connection(conn: C, key: &str) -> Self {
        Self {
            conn,
            key: key.to_string(),
        }
    }
}

impl<C> SeenStore for RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    async fn read_all(&self) -> DigestResult<Vec<u64>> {
        let mut conn = self.conn.clone();
        let ids: Vec<u64> = conn.lrange(&self.key, 0, -1).await?;
        debug!(key = %self.key, count = ids.len(), "Read seen ids");
        Ok(ids)
    }

    async fn push_front(&self, ids: &[u64]) -> DigestResult<()> {
        // LPUSH with no values is a syntax error.
        if ids.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let _: () = conn.lpush(&self.key, ids).await?;
        debug!(key = %self.key, count = ids.len(), "Pushed seen ids");
        Ok(())
    }

    async fn truncate(&self, len: usize) -> DigestResult<()> {
        let mut conn = self.conn.clone();
        // LTRIM key 0 -1 would keep everything.
        if len == 0 {
            let _: () = conn.del(&self.key).await?;
        } else {
            let _: () = conn.ltrim(&self.key, 0, len as isize - 1).await?;
        }
        debug!(key = %self.key, len, "Trimmed seen ids");
        Ok(())
    }
}

/// Process-local store with Redis list semantics.
///
/// Backs `--ephemeral` runs. It also counts reads so callers can tell
/// whether the backfill path consulted it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ids: Mutex<Vec<u64>>,
    reads: AtomicUsize,
}

impl MemoryStore {
    #[cfg(test)]
    pub fn with_ids(ids: Vec<u64>) -> Self {
        Self {
            ids: Mutex::new(ids),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of [`SeenStore::read_all`] calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Vec<u64> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u64>> {
        // poisoning cannot leave the Vec half-written
        self.ids.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SeenStore for MemoryStore {
    async fn read_all(&self) -> DigestResult<Vec<u64>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.snapshot())
    }

    async fn push_front(&self, ids: &[u64]) -> DigestResult<()> {
        let mut list = self.lock();
        for id in ids {
            list.insert(0, *id);
        }
        Ok(())
    }

    async fn truncate(&self, len: usize) -> DigestResult<()> {
        self.lock().truncate(len);
        Ok(())
    }
}
