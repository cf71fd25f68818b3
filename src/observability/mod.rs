//! Logging infrastructure for `stimdeck`.

pub mod logging;

pub use logging::{LogFormat, init_logging};
