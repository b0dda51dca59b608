//! Key naming scheme
//!
//! These patterns are shared with existing deployments and must stay
//! byte-for-byte identical.

/// Global id counter, advanced with `INCR`
pub const URL_ID_KEY: &str = "next.url.id";

/// token -> original URL
pub fn short_link_key(token: &str) -> String {
    format!("shortLink:{}:url", token)
}

/// fingerprint -> token
pub fn url_hash_key(fingerprint: &str) -> String {
    format!("urlHash:{}:url", fingerprint)
}

/// token -> JSON detail record
pub fn short_link_detail_key(token: &str) -> String {
    format!("shortLink:{}:detail", token)
}
