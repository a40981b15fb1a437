use crate::models::UserSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FeedListRequest {
    pub limit: Option<i64>,
    /// `created_at` of the last item from the previous page.
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedSpotContent {
    pub id: i64,
    pub place_name: String,
    pub categories: Vec<String>,
    pub rating: i64,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub photos: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedPlaylistContent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub spot_count: i64,
}

#[derive(Debug, Serialize)]
pub struct FeedItemResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot: Option<FeedSpotContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<FeedPlaylistContent>,
    pub author: UserSummary,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct FeedListResponse {
    pub items: Vec<FeedItemResponse>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}
