use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("SHARE_RELAY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".share-relay"))
                .unwrap_or_else(|_| PathBuf::from(".share-relay"))
        })
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("config.yaml"));

pub static USER_AGENT: Lazy<String> = Lazy::new(|| {
    format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
});

/// Applied to connect, read and write on every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub const DEFAULT_SHARE_NAME: &str = "Custom Share";

pub const HEADER_API_KEY: &str = "X-API-Key";
pub const HEADER_DELIVERY_KEY: &str = "X-Delivery-Key";
