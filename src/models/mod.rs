mod feed;
mod follow;
mod map;
mod place;
mod playlist;
mod spot;
mod user;
mod want_to_go;

pub use feed::*;
pub use follow::*;
pub use map::*;
pub use place::*;
pub use playlist::*;
pub use spot::*;
pub use user::*;
pub use want_to_go::*;

/// Decode a JSON-encoded string list column, tolerating NULL and bad data.
pub fn parse_string_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

/// Encode a string list for storage in a TEXT column.
pub fn encode_string_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}
