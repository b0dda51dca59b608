//! Redilink - A Redis-backed URL shortener
//!
//! Long URLs are turned into short base-62 tokens minted from a global
//! counter kept in the store. Shortening is idempotent while the URL's
//! fingerprint record is live, and every record expires with the TTL chosen
//! at shortening time.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use redilink::services::ShortenerService;
//! use redilink::storage::MemoryStore;
//!
//! # async fn demo() -> redilink::errors::Result<()> {
//! let service = ShortenerService::new(Arc::new(MemoryStore::default()));
//! let token = service.shorten("https://example.com/a", 60).await?;
//! assert_eq!(service.resolve(&token).await?, "https://example.com/a");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//! - `services`: the shortener (shorten / resolve / info)
//! - `storage`: key-value store sessions, key scheme and records
//! - `utils`: base-62 codec and URL fingerprinting
//! - `config`: configuration management
//! - `system`: logging setup
//! - `interfaces`: command-line interface

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
