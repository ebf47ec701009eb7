pub mod client;
pub mod config;
pub mod constants;
pub mod deeplink;
pub mod error;
pub mod logging;
pub mod models;
pub mod negotiation;

pub mod test_utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
