use crate::models::SpotResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PlaylistCreateRequest {
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub spot_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistGetRequest {
    pub playlist_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistListRequest {
    /// Defaults to the requesting user; other users only see published playlists.
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistUpdateRequest {
    pub playlist_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistPublishRequest {
    pub playlist_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistDeleteRequest {
    pub playlist_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistAddSpotsRequest {
    pub playlist_id: i64,
    pub spot_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistRemoveSpotRequest {
    pub playlist_id: i64,
    pub spot_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistReorderRequest {
    pub playlist_id: i64,
    pub spot_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub spot_count: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct PlaylistDetailResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub spots: Vec<SpotResponse>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct PlaylistListResponse {
    pub playlists: Vec<PlaylistResponse>,
}
