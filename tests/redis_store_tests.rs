//! Live Redis tests
//!
//! Ignored by default. Run against a disposable server with:
//!
//! ```text
//! REDIS_URL=redis://127.0.0.1:6379/ cargo test --test redis_store_tests -- --ignored
//! ```
//!
//! Logical database 15 is used unless `REDIS_DB` says otherwise.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use redilink::config::RedisConfig;
use redilink::services::ShortenerService;
use redilink::storage::keys::URL_ID_KEY;
use redilink::storage::{KvStore, RedisStore};
use redilink::utils::base62;

fn redis_config() -> RedisConfig {
    RedisConfig {
        url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string()),
        db: std::env::var("REDIS_DB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15),
        max_active: 4,
        connect_timeout_secs: 2,
    }
}

fn unique_url(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("https://example.com/{}/{}", tag, nanos)
}

async fn create_store() -> Arc<RedisStore> {
    Arc::new(RedisStore::connect(&redis_config()).await.unwrap())
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_set_get_and_missing_key() {
        let store = create_store().await;
        let mut session = store.checkout().await.unwrap();
        let key = format!("redilink:test:{}", unique_url("kv"));

        assert_eq!(session.get(&key).await.unwrap(), None);
        session.set_ex(&key, "value", 30).await.unwrap();
        assert_eq!(session.get(&key).await.unwrap(), Some("value".to_string()));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_incr_advances() {
        let store = create_store().await;
        let mut session = store.checkout().await.unwrap();
        let key = format!("redilink:test:counter:{}", unique_url("incr"));

        assert_eq!(session.incr(&key).await.unwrap(), 1);
        assert_eq!(session.incr(&key).await.unwrap(), 2);
        session.set_ex(&key, "2", 5).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_atomic_set() {
        let store = create_store().await;
        let mut session = store.checkout().await.unwrap();
        let base = unique_url("multi");
        let entries = vec![
            (format!("redilink:test:a:{}", base), "a".to_string()),
            (format!("redilink:test:b:{}", base), "b".to_string()),
        ];

        session.set_ex_atomic(&entries, 30).await.unwrap();

        for (key, value) in &entries {
            assert_eq!(session.get(key).await.unwrap().as_deref(), Some(value.as_str()));
        }
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_many_checkouts_beyond_max_active() {
        let store = create_store().await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut session = store.checkout().await.unwrap();
                session.ping().await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }
}

#[cfg(test)]
mod service_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_shorten_resolve_info() {
        let store = create_store().await;
        let service = ShortenerService::new(store.clone());
        let url = unique_url("svc");

        let token = service.shorten(&url, 1).await.unwrap();
        assert_eq!(service.shorten(&url, 1).await.unwrap(), token);
        assert_eq!(service.resolve(&token).await.unwrap(), url);

        let detail = service.info(&token).await.unwrap();
        assert_eq!(detail.url, url);
        assert_eq!(detail.expiration_in_minutes, 60);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_token_matches_counter() {
        let store = create_store().await;
        let service = ShortenerService::new(store.clone()).with_atomic_writes(true);

        let token = service.shorten(&unique_url("ctr"), 1).await.unwrap();

        let mut session = store.checkout().await.unwrap();
        let current: u64 = session
            .get(URL_ID_KEY)
            .await
            .unwrap()
            .unwrap()
            .parse()
            .unwrap();
        assert!(base62::decode(&token).unwrap() <= current);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_unknown_token_not_found() {
        let store = create_store().await;
        let service = ShortenerService::new(store);

        let err = service.resolve("redilink-no-such-token").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
