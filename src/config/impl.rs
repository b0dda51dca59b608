use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Falls back to defaults when [`init_config`] has not been called, which
/// keeps library users that build their own services free of global setup.
pub fn get_config() -> Arc<StaticConfig> {
    match CONFIG.get() {
        Some(config) => config.load_full(),
        None => Arc::new(StaticConfig::default()),
    }
}

/// Initialize the global configuration
///
/// Loads `path` (or `config.toml` in the working directory when absent) plus
/// `RL__*` environment overrides. Calling it again after a successful load is
/// a no-op.
pub fn init_config(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    if let Some(existing) = CONFIG.get() {
        return Ok(existing.load_full());
    }

    let loaded = StaticConfig::load(path)?;
    let config = CONFIG.get_or_init(|| ArcSwap::from_pointee(loaded));
    Ok(config.load_full())
}

/// Replace the global configuration
pub fn update_config(new_config: StaticConfig) {
    match CONFIG.get() {
        Some(config) => config.store(Arc::new(new_config)),
        None => {
            let _ = CONFIG.set(ArcSwap::from_pointee(new_config));
        }
    }
}
