use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult, aio::MultiplexedConnection};
use tokio::sync::{OwnedSemaphorePermit, RwLock, Semaphore};
use tracing::{debug, error, trace};

use crate::config::RedisConfig;
use crate::errors::{RedilinkError, Result};
use crate::storage::{KvSession, KvStore};

/// Cached connection tagged with the generation that opened it
struct Slot<C> {
    generation: u64,
    conn: C,
}

type SharedConnection = Arc<RwLock<Option<Slot<MultiplexedConnection>>>>;

/// Clear the cached connection if it is still generation `generation`
async fn reset_if_current<C>(slot: &RwLock<Option<Slot<C>>>, generation: u64) -> bool {
    let mut guard = slot.write().await;
    if guard.as_ref().is_some_and(|s| s.generation == generation) {
        *guard = None;
        return true;
    }
    false
}

/// Redis-backed store
///
/// Holds one multiplexed connection that is opened lazily, shared by all
/// sessions and dropped after a connection-level error so the next checkout
/// reconnects. Concurrent checkouts are capped by `max_active`; a checkout
/// waits until a slot is free.
pub struct RedisStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: SharedConnection,
    generations: AtomicU64,
    permits: Arc<Semaphore>,
    db: i64,
    connect_timeout: Duration,
}

impl RedisStore {
    /// Create the client and verify the server answers `PING`
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let store = Self::new(config)?;

        let mut session = store.checkout().await.map_err(|e| {
            error!(
                "Failed to connect to Redis server: {}. Check Redis server status and URL: {}",
                e,
                config.redacted_url()
            );
            e
        })?;
        session.ping().await?;
        debug!("Redis connection test successful (db {})", config.db);

        Ok(store)
    }

    /// Create the client without touching the network
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            RedilinkError::config(format!(
                "Invalid Redis URL '{}': {}",
                config.redacted_url(),
                e
            ))
        })?;

        debug!(
            "RedisStore created: db {}, max_active {}",
            config.db, config.max_active
        );

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            generations: AtomicU64::new(0),
            permits: Arc::new(Semaphore::new(config.max_active.max(1))),
            db: config.db,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> Result<(u64, MultiplexedConnection)> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref slot) = *conn_guard {
                return Ok((slot.generation, slot.conn.clone()));
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref slot) = *conn_guard {
            return Ok((slot.generation, slot.conn.clone()));
        }

        let new_conn = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            RedilinkError::store_connection(format!(
                "Timed out connecting to Redis after {}s",
                self.connect_timeout.as_secs()
            ))
        })??;

        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        *conn_guard = Some(Slot {
            generation,
            conn: new_conn.clone(),
        });
        debug!("Redis connection established and cached (generation {})", generation);

        Ok((generation, new_conn))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn checkout(&self) -> Result<Box<dyn KvSession>> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| RedilinkError::store_connection(format!("Session pool closed: {}", e)))?;

        let (generation, conn) = self.get_connection().await?;
        let mut session = RedisSession {
            conn,
            generation,
            shared: self.connection.clone(),
            _permit: permit,
        };

        // All sessions share one connection and one database
        let selected: RedisResult<()> = redis::cmd("SELECT")
            .arg(self.db)
            .query_async(&mut session.conn)
            .await;
        session.check("SELECT", &self.db.to_string(), selected).await?;

        Ok(Box::new(session))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// A checked-out Redis session; the permit is returned on drop
pub struct RedisSession {
    conn: MultiplexedConnection,
    generation: u64,
    shared: SharedConnection,
    _permit: OwnedSemaphorePermit,
}

impl RedisSession {
    async fn check<T>(&self, command: &str, key: &str, result: RedisResult<T>) -> Result<T> {
        match result {
            Ok(value) => {
                trace!("Redis {} '{}' ok", command, key);
                Ok(value)
            }
            Err(e) => {
                error!("Redis {} '{}' failed: {}", command, key, e);
                let err = RedilinkError::from(e);
                // 连接可能已断开；只重置本会话使用的那条连接
                if matches!(err, RedilinkError::StoreConnection(_))
                    && reset_if_current(&self.shared, self.generation).await
                {
                    debug!(
                        "Redis connection reset due to error (generation {})",
                        self.generation
                    );
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl KvSession for RedisSession {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        let result: RedisResult<Option<String>> = self.conn.get(key).await;
        self.check("GET", key, result).await
    }

    async fn set_ex(&mut self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let result: RedisResult<()> = self.conn.set_ex(key, value, ttl_secs).await;
        self.check("SETEX", key, result).await
    }

    async fn incr(&mut self, key: &str) -> Result<i64> {
        let result: RedisResult<i64> = self.conn.incr(key, 1).await;
        self.check("INCR", key, result).await
    }

    async fn set_ex_atomic(&mut self, entries: &[(String, String)], ttl_secs: u64) -> Result<()> {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set_ex(key, value, ttl_secs).ignore();
        }

        let result: RedisResult<()> = pipe.query_async(&mut self.conn).await;
        let label = entries
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.check("MULTI/EXEC", &label, result).await
    }

    async fn ping(&mut self) -> Result<()> {
        let result: RedisResult<String> = redis::cmd("PING").query_async(&mut self.conn).await;
        self.check("PING", "", result).await.map(|_| ())
    }
}
