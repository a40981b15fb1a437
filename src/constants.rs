use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("SPOTMAP_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/data"))
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("config.yaml"));
pub static DATABASE_PATH: Lazy<PathBuf> = Lazy::new(|| DATA_DIR.join("database.sqlite"));

/// TTL for cached map-pin responses.
pub const MAP_PINS_CACHE_TTL_SECS: u64 = 300;

/// Zoom levels below this threshold collapse nearby pins into grid clusters.
pub const CLUSTER_ZOOM_THRESHOLD: u8 = 12;

pub const MAX_SPOT_PHOTOS: usize = 5;
pub const MIN_SPOT_RATING: i64 = 1;
pub const MAX_SPOT_RATING: i64 = 5;

pub const DEFAULT_FEED_LIMIT: i64 = 20;
pub const MAX_FEED_LIMIT: i64 = 100;
pub const DEFAULT_LIST_LIMIT: i64 = 50;
