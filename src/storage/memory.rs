//! In-process store for development and tests
//!
//! Implements the four commands the shortener needs with Redis semantics:
//! expired keys read as missing, `INCR` creates the key at 0 and keeps any
//! existing TTL, and non-integer values make `INCR` fail. Expiry is lazy and
//! uses tokio's clock, so a paused test runtime can fast-forward it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;
use tracing::trace;

use crate::errors::{RedilinkError, Result};
use crate::storage::{KvSession, KvStore};

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

type Keyspace = DashMap<(i64, String), StoredValue>;

#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Keyspace>,
    db: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MemoryStore {
    /// Store whose sessions operate on logical database `db`
    pub fn new(db: i64) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            db,
        }
    }

    /// Another view of the same keyspace with a different database selected
    pub fn select(&self, db: i64) -> Self {
        Self {
            inner: self.inner.clone(),
            db,
        }
    }

    /// Number of live keys across all databases
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.inner.iter().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn checkout(&self) -> Result<Box<dyn KvSession>> {
        Ok(Box::new(MemorySession {
            inner: self.inner.clone(),
            db: self.db,
        }))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

pub struct MemorySession {
    inner: Arc<Keyspace>,
    db: i64,
}

impl MemorySession {
    fn key(&self, key: &str) -> (i64, String) {
        (self.db, key.to_string())
    }

    fn expiry(ttl_secs: u64) -> Result<Instant> {
        if ttl_secs == 0 {
            return Err(RedilinkError::store_operation(
                "ERR invalid expire time in 'setex' command",
            ));
        }

        Instant::now()
            .checked_add(Duration::from_secs(ttl_secs))
            .ok_or_else(|| {
                RedilinkError::store_operation("ERR invalid expire time in 'setex' command")
            })
    }

    fn write(&self, key: &str, value: &str, expires_at: Instant) {
        self.inner.insert(
            self.key(key),
            StoredValue {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
    }
}

#[async_trait]
impl KvSession for MemorySession {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        let k = self.key(key);
        let now = Instant::now();

        // 惰性删除过期键
        let removed = self.inner.remove_if(&k, |_, v| v.is_expired(now));
        if removed.is_some() {
            trace!("Key expired: {}", key);
            return Ok(None);
        }

        Ok(self.inner.get(&k).map(|v| v.value.clone()))
    }

    async fn set_ex(&mut self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let expires_at = Self::expiry(ttl_secs)?;
        self.write(key, value, expires_at);
        Ok(())
    }

    async fn incr(&mut self, key: &str) -> Result<i64> {
        let now = Instant::now();

        match self.inner.entry(self.key(key)) {
            Entry::Occupied(mut occupied) => {
                let stored = occupied.get_mut();
                if stored.is_expired(now) {
                    *stored = StoredValue {
                        value: "1".to_string(),
                        expires_at: None,
                    };
                    return Ok(1);
                }

                let next = stored
                    .value
                    .parse::<i64>()
                    .ok()
                    .and_then(|v| v.checked_add(1))
                    .ok_or_else(|| {
                        RedilinkError::store_operation(
                            "ERR value is not an integer or out of range",
                        )
                    })?;
                stored.value = next.to_string();
                Ok(next)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue {
                    value: "1".to_string(),
                    expires_at: None,
                });
                Ok(1)
            }
        }
    }

    async fn set_ex_atomic(&mut self, entries: &[(String, String)], ttl_secs: u64) -> Result<()> {
        let expires_at = Self::expiry(ttl_secs)?;
        for (key, value) in entries {
            self.write(key, value, expires_at);
        }
        Ok(())
    }

    async fn ping(&mut self) -> Result<()> {
        Ok(())
    }
}
