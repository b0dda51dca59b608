//! Base-62 token codec
//!
//! Counter ids are rendered over `0-9A-Za-z` without padding, so id `1`
//! becomes `"1"` and id `62` becomes `"10"`.

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Encode a non-negative id as its shortest base-62 representation
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(11);
    while id > 0 {
        buf.push(ALPHABET[(id % 62) as usize]);
        id /= 62;
    }
    buf.reverse();

    // 字母表全部是 ASCII
    buf.into_iter().map(char::from).collect()
}

/// Decode a base-62 token back into its id
///
/// Returns `None` for empty input, characters outside the alphabet, or
/// values that overflow `u64`.
pub fn decode(token: &str) -> Option<u64> {
    if token.is_empty() {
        return None;
    }

    token.bytes().try_fold(0u64, |acc, b| {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'A'..=b'Z' => b - b'A' + 10,
            b'a'..=b'z' => b - b'a' + 36,
            _ => return None,
        };
        acc.checked_mul(62)?.checked_add(digit as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encode(0), "0");
        assert_eq!(encode(1), "1");
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "A");
        assert_eq!(encode(35), "Z");
        assert_eq!(encode(36), "a");
        assert_eq!(encode(61), "z");
    }

    #[test]
    fn test_encode_carries() {
        assert_eq!(encode(62), "10");
        assert_eq!(encode(62 * 62), "100");
        assert_eq!(encode(62 * 62 - 1), "zz");
    }

    #[test]
    fn test_encode_max() {
        assert_eq!(encode(u64::MAX), "LygHa16AHYF");
        assert_eq!(decode("LygHa16AHYF"), Some(u64::MAX));
    }

    #[test]
    fn test_decode_rejects_invalid() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("ab-c"), None);
        assert_eq!(decode("nonexistent-token"), None);
        // 超出 u64 范围
        assert_eq!(decode("zzzzzzzzzzzz"), None);
    }

    #[test]
    fn test_tokens_are_distinct_and_ordered_by_length() {
        let tokens: Vec<String> = (1..=200).map(encode).collect();
        let mut deduped = tokens.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), tokens.len());

        for window in tokens.windows(2) {
            assert!(window[0].len() <= window[1].len());
        }
    }
}
