//! Process-level setup shared by the binary entry points

pub mod logging;

pub use logging::init_logging;
