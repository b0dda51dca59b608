//! Key-value store access
//!
//! The shortener talks to its store through two traits:
//! - [`KvStore`] hands out sessions and reports its backend name.
//! - [`KvSession`] is one checked-out connection with its logical database
//!   already selected. Dropping the session releases it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::errors::{RedilinkError, Result};

pub mod keys;
pub mod memory;
pub mod models;
pub mod redis;

pub use self::memory::MemoryStore;
pub use models::LinkDetail;
pub use self::redis::RedisStore;

/// Longest expiry accepted by `SETEX`
///
/// Redis keeps deadlines as `i64` milliseconds since the epoch; half that
/// range leaves room for the current time.
pub const MAX_TTL_SECS: u64 = (i64::MAX / 1000 / 2) as u64;

/// One checked-out store connection
///
/// `get` returns `Ok(None)` for a missing or expired key; every other
/// failure is an error.
#[async_trait]
pub trait KvSession: Send {
    async fn get(&mut self, key: &str) -> Result<Option<String>>;

    /// `SETEX key ttl value`
    async fn set_ex(&mut self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// `INCR key`, returning the incremented value
    async fn incr(&mut self, key: &str) -> Result<i64>;

    /// Set several keys with the same TTL in one `MULTI/EXEC`
    async fn set_ex_atomic(&mut self, entries: &[(String, String)], ttl_secs: u64) -> Result<()>;

    async fn ping(&mut self) -> Result<()>;
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Acquire a session with the configured database selected
    async fn checkout(&self) -> Result<Box<dyn KvSession>>;

    fn backend_name(&self) -> &'static str;
}

pub struct StoreFactory;

impl StoreFactory {
    /// Create the store named by the global configuration
    pub async fn create() -> Result<Arc<dyn KvStore>> {
        let config = crate::config::get_config();
        Self::from_config(&config.store).await
    }

    pub async fn from_config(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
        debug!("Creating store backend: {}", config.backend);

        let store: Arc<dyn KvStore> = match config.backend.as_str() {
            "redis" => Arc::new(RedisStore::connect(&config.redis).await?),
            "memory" => Arc::new(MemoryStore::new(config.redis.db)),
            other => {
                return Err(RedilinkError::store_plugin_not_found(format!(
                    "Unknown store backend '{}'. Supported: redis, memory",
                    other
                )));
            }
        };

        info!("Using store backend: {}", store.backend_name());
        Ok(store)
    }
}
