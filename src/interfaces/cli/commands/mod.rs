//! CLI command implementations

mod config_gen;
mod link;

pub use config_gen::config_generate;
pub use link::{fingerprint_url, resolve_token, shorten_url, show_info};
