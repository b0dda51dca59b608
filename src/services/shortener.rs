//! URL shortening service
//!
//! Stateless façade over a [`KvStore`]. Every operation checks out one
//! session, runs a short sequence of commands and releases the session when
//! it goes out of scope, whichever way the operation exits.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ShortenerConfig;
use crate::errors::{RedilinkError, Result};
use crate::storage::keys::{URL_ID_KEY, short_link_detail_key, short_link_key, url_hash_key};
use crate::storage::{KvStore, LinkDetail, MAX_TTL_SECS};
use crate::utils::base62;
use crate::utils::fingerprint::{Fingerprinter, HashidsFingerprinter};

pub struct ShortenerService {
    store: Arc<dyn KvStore>,
    fingerprinter: Arc<dyn Fingerprinter>,
    atomic_writes: bool,
}

impl ShortenerService {
    /// Create a service with the Hashids fingerprinter and sequential writes
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            fingerprinter: Arc::new(HashidsFingerprinter),
            atomic_writes: false,
        }
    }

    pub fn from_config(store: Arc<dyn KvStore>, config: &ShortenerConfig) -> Self {
        let service = Self::new(store).with_atomic_writes(config.atomic_writes);
        debug!(
            "Shortener ready: fingerprinter {}, atomic_writes {}",
            service.fingerprinter_name(),
            service.atomic_writes
        );
        service
    }

    pub fn with_fingerprinter(mut self, fingerprinter: Arc<dyn Fingerprinter>) -> Self {
        debug!("Using fingerprinter: {}", fingerprinter.name());
        self.fingerprinter = fingerprinter;
        self
    }

    pub fn fingerprinter_name(&self) -> &'static str {
        self.fingerprinter.name()
    }

    /// Send the three records of a new link as one MULTI/EXEC
    pub fn with_atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }

    /// Fingerprint used to detect URLs that were shortened before
    pub fn fingerprint(&self, url: &str) -> String {
        self.fingerprinter.fingerprint(url)
    }

    /// Shorten `url`, keeping the records for `ttl_minutes`
    ///
    /// A URL whose fingerprint record is still live gets its existing token
    /// back without touching the counter.
    pub async fn shorten(&self, url: &str, ttl_minutes: i64) -> Result<String> {
        let ttl_secs = ttl_seconds(ttl_minutes)?;
        let fingerprint = self.fingerprint(url);
        let hash_key = url_hash_key(&fingerprint);

        let mut session = self.store.checkout().await?;

        if let Some(token) = session.get(&hash_key).await?
            && !token.is_empty()
        {
            debug!("Fingerprint '{}' already maps to '{}'", fingerprint, token);
            return Ok(token);
        }

        let id = session.incr(URL_ID_KEY).await?;
        let id = u64::try_from(id).map_err(|_| {
            RedilinkError::store_operation(format!(
                "Counter '{}' returned non-positive value {}",
                URL_ID_KEY, id
            ))
        })?;
        let token = base62::encode(id);

        // 字段名沿用旧记录格式，值实际为秒数
        let detail = serde_json::to_string(&LinkDetail::new(url, ttl_secs as i64))?;

        let link_key = short_link_key(&token);
        let detail_key = short_link_detail_key(&token);

        if self.atomic_writes {
            let entries = [
                (link_key, url.to_string()),
                (hash_key, token.clone()),
                (detail_key, detail),
            ];
            session.set_ex_atomic(&entries, ttl_secs).await?;
        } else {
            session.set_ex(&link_key, url, ttl_secs).await?;
            session.set_ex(&hash_key, &token, ttl_secs).await?;
            session.set_ex(&detail_key, &detail, ttl_secs).await?;
        }

        info!(
            "Shortened '{}' -> '{}' (id {}, ttl {}s)",
            url, token, id, ttl_secs
        );
        Ok(token)
    }

    /// Original URL behind `token`
    pub async fn resolve(&self, token: &str) -> Result<String> {
        let mut session = self.store.checkout().await?;

        session
            .get(&short_link_key(token))
            .await?
            .ok_or_else(|| RedilinkError::not_found(format!("Short link '{}' not found", token)))
    }

    /// Detail record stored for `token`
    pub async fn info(&self, token: &str) -> Result<LinkDetail> {
        let mut session = self.store.checkout().await?;

        let raw = session
            .get(&short_link_detail_key(token))
            .await?
            .ok_or_else(|| {
                RedilinkError::not_found(format!("Detail for short link '{}' not found", token))
            })?;

        serde_json::from_str(&raw).map_err(|e| {
            RedilinkError::serialization(format!(
                "Malformed detail record for '{}': {}",
                token, e
            ))
        })
    }
}

fn ttl_seconds(ttl_minutes: i64) -> Result<u64> {
    if ttl_minutes <= 0 {
        return Err(RedilinkError::validation(format!(
            "TTL must be a positive number of minutes, got {}",
            ttl_minutes
        )));
    }

    ttl_minutes
        .checked_mul(60)
        .map(|secs| secs as u64)
        .filter(|&secs| secs <= MAX_TTL_SECS)
        .ok_or_else(|| {
            RedilinkError::validation(format!(
                "TTL {} minutes is too large (max {} minutes)",
                ttl_minutes,
                MAX_TTL_SECS / 60
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_ttl_seconds() {
        assert_eq!(ttl_seconds(1).unwrap(), 60);
        assert_eq!(ttl_seconds(60).unwrap(), 3600);
        assert!(matches!(ttl_seconds(0), Err(RedilinkError::Validation(_))));
        assert!(matches!(ttl_seconds(-5), Err(RedilinkError::Validation(_))));
        assert!(matches!(
            ttl_seconds(i64::MAX),
            Err(RedilinkError::Validation(_))
        ));
    }

    #[test]
    fn test_ttl_seconds_caps_at_store_limit() {
        let max_minutes = (MAX_TTL_SECS / 60) as i64;
        assert_eq!(ttl_seconds(max_minutes).unwrap(), max_minutes as u64 * 60);
        assert!(matches!(
            ttl_seconds(max_minutes + 1),
            Err(RedilinkError::Validation(_))
        ));
        assert!(matches!(
            ttl_seconds(i64::MAX / 60),
            Err(RedilinkError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_huge_ttl_rejected_without_using_counter() {
        let store = MemoryStore::default();
        let service = ShortenerService::new(Arc::new(store.clone()));

        let err = service
            .shorten("https://example.com/huge", i64::MAX / 60)
            .await
            .unwrap_err();
        assert!(matches!(err, RedilinkError::Validation(_)));
        assert!(store.is_empty());

        let token = service.shorten("https://example.com/huge", 60).await.unwrap();
        assert_eq!(token, "1");
    }

    #[tokio::test]
    async fn test_empty_fingerprint_record_is_a_miss() {
        let store = MemoryStore::default();
        let service = ShortenerService::new(Arc::new(store.clone()));
        let url = "https://example.com/empty";

        let mut session = store.checkout().await.unwrap();
        session
            .set_ex(&url_hash_key(&service.fingerprint(url)), "", 60)
            .await
            .unwrap();
        drop(session);

        let token = service.shorten(url, 1).await.unwrap();
        assert_eq!(token, "1");
    }

    #[tokio::test]
    async fn test_negative_counter_is_store_error() {
        let store = MemoryStore::default();
        let service = ShortenerService::new(Arc::new(store.clone()));

        let mut session = store.checkout().await.unwrap();
        session.set_ex(URL_ID_KEY, "-10", 600).await.unwrap();
        drop(session);

        let err = service.shorten("https://example.com", 1).await.unwrap_err();
        assert!(matches!(err, RedilinkError::StoreOperation(_)));
    }
}
