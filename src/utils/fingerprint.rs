//! URL fingerprinting
//!
//! A fingerprint is the lookup key used to find the token previously minted
//! for a URL. The default [`HashidsFingerprinter`] encodes a fixed number
//! sequence with Hashids, using the URL itself as the salt, so the output is
//! a pure function of the URL string. No normalization is applied:
//! `https://a.com` and `https://a.com/` fingerprint differently.

/// Pluggable deterministic URL fingerprint
pub trait Fingerprinter: Send + Sync {
    /// Same input must always produce the same output
    fn fingerprint(&self, url: &str) -> String;

    fn name(&self) -> &'static str;
}

/// Numbers encoded for every URL; only the salt varies
pub const FINGERPRINT_PAYLOAD: [u64; 4] = [45, 434, 1313, 99];

const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";
const DEFAULT_SEPS: &str = "cfhistuCFHISTU";
const SEP_DIV: f64 = 3.5;
const GUARD_DIV: f64 = 12.0;

/// Hashids encoder with the default alphabet and no minimum length
///
/// Output is compatible with the reference Hashids implementations
/// (hashids.js 1.x, go-hashids), which matters because fingerprints written
/// by an existing deployment must still be found.
#[derive(Debug, Clone)]
pub struct Hashids {
    salt: Vec<char>,
    alphabet: Vec<char>,
    seps: Vec<char>,
}

impl Hashids {
    pub fn new(salt: &str) -> Self {
        let salt: Vec<char> = salt.chars().collect();
        let mut alphabet: Vec<char> = DEFAULT_ALPHABET.chars().collect();

        // 分隔符只保留字母表中存在的字符，并从字母表中移除
        let mut seps = Vec::with_capacity(DEFAULT_SEPS.len());
        for sep in DEFAULT_SEPS.chars() {
            if let Some(pos) = alphabet.iter().position(|&c| c == sep) {
                alphabet.remove(pos);
                seps.push(sep);
            }
        }
        consistent_shuffle(&mut seps, &salt);

        if seps.is_empty() || alphabet.len() as f64 / seps.len() as f64 > SEP_DIV {
            let mut seps_len = (alphabet.len() as f64 / SEP_DIV).ceil() as usize;
            if seps_len == 1 {
                seps_len += 1;
            }
            if seps_len > seps.len() {
                let diff = seps_len - seps.len();
                seps.extend(alphabet.drain(..diff));
            } else {
                seps.truncate(seps_len);
            }
        }

        consistent_shuffle(&mut alphabet, &salt);

        // Guards only pad short output up to a minimum length. With no
        // minimum they are never emitted, but they still leave the alphabet.
        let guard_count = (alphabet.len() as f64 / GUARD_DIV).ceil() as usize;
        if alphabet.len() < 3 {
            seps.drain(..guard_count.min(seps.len()));
        } else {
            alphabet.drain(..guard_count);
        }

        Self {
            salt,
            alphabet,
            seps,
        }
    }

    pub fn encode(&self, numbers: &[u64]) -> String {
        if numbers.is_empty() {
            return String::new();
        }

        let numbers_hash: u64 = numbers
            .iter()
            .enumerate()
            .map(|(i, &n)| n % (i as u64 + 100))
            .sum();

        let mut alphabet = self.alphabet.clone();
        let lottery = alphabet[(numbers_hash % alphabet.len() as u64) as usize];

        let mut result = vec![lottery];
        let mut buffer = Vec::with_capacity(1 + self.salt.len() + alphabet.len());

        for (i, &number) in numbers.iter().enumerate() {
            buffer.clear();
            buffer.push(lottery);
            buffer.extend_from_slice(&self.salt);
            buffer.extend_from_slice(&alphabet);
            buffer.truncate(alphabet.len());
            consistent_shuffle(&mut alphabet, &buffer);

            let encoded = hash(number, &alphabet);
            let first = encoded[0];
            result.extend_from_slice(&encoded);

            if i + 1 < numbers.len() {
                let n = number % (first as u64 + i as u64);
                result.push(self.seps[(n % self.seps.len() as u64) as usize]);
            }
        }

        result.into_iter().collect()
    }
}

fn consistent_shuffle(alphabet: &mut [char], salt: &[char]) {
    if salt.is_empty() {
        return;
    }

    let mut v = 0usize;
    let mut p = 0usize;
    for i in (1..alphabet.len()).rev() {
        let c = salt[v] as usize;
        p += c;
        let j = (c + v + p) % i;
        alphabet.swap(i, j);
        v = (v + 1) % salt.len();
    }
}

fn hash(mut input: u64, alphabet: &[char]) -> Vec<char> {
    let len = alphabet.len() as u64;
    let mut out = Vec::new();
    loop {
        out.push(alphabet[(input % len) as usize]);
        input /= len;
        if input == 0 {
            break;
        }
    }
    out.reverse();
    out
}

/// Default fingerprinter: Hashids of [`FINGERPRINT_PAYLOAD`] salted with the URL
#[derive(Debug, Default, Clone, Copy)]
pub struct HashidsFingerprinter;

impl Fingerprinter for HashidsFingerprinter {
    fn fingerprint(&self, url: &str) -> String {
        Hashids::new(url).encode(&FINGERPRINT_PAYLOAD)
    }

    fn name(&self) -> &'static str {
        "hashids"
    }
}
