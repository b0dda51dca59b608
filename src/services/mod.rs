//! Business services
//!
//! The shortener is the only service; hosts build it once and share it
//! behind an `Arc`.

pub mod shortener;

pub use shortener::ShortenerService;
