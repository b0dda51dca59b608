pub mod base62;
pub mod fingerprint;

pub use fingerprint::{Fingerprinter, HashidsFingerprinter};
