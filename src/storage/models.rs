use serde::{Deserialize, Serialize};

/// Metadata stored beside every short link
///
/// Field names on the wire follow the existing record format:
/// `{"url", "create_at", "expiration_in_minutes"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDetail {
    pub url: String,
    #[serde(rename = "create_at")]
    pub created_at: String,
    /// Holds the TTL in seconds despite the name; kept for record compatibility
    pub expiration_in_minutes: i64,
}

impl LinkDetail {
    pub fn new(url: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            url: url.into(),
            created_at: now_string(),
            expiration_in_minutes: ttl_secs,
        }
    }
}

/// Local wall-clock time, e.g. `2024-05-01 13:37:00.123456789 +0800`
fn now_string() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.9f %z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wire_format() {
        let detail = LinkDetail {
            url: "https://example.com/a".to_string(),
            created_at: "2024-05-01 13:37:00.000000000 +0000".to_string(),
            expiration_in_minutes: 3600,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["url"], "https://example.com/a");
        assert_eq!(json["create_at"], "2024-05-01 13:37:00.000000000 +0000");
        assert_eq!(json["expiration_in_minutes"], 3600);
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_detail_reads_existing_records() {
        let raw = r#"{"url":"http://www.baidu.com","create_at":"2019-03-01 10:00:00.1 +0800 CST m=+0.01","expiration_in_minutes":60}"#;
        let detail: LinkDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.url, "http://www.baidu.com");
        assert_eq!(detail.expiration_in_minutes, 60);
    }

    #[test]
    fn test_new_sets_timestamp() {
        let detail = LinkDetail::new("https://example.com", 120);
        assert!(!detail.created_at.is_empty());
        assert_eq!(detail.expiration_in_minutes, 120);
    }
}
