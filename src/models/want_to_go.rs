use crate::models::PlaceSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct WantToGoCreateRequest {
    pub place_id: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WantToGoGetRequest {
    pub want_to_go_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct WantToGoListRequest {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WantToGoUpdateRequest {
    pub want_to_go_id: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WantToGoDeleteRequest {
    pub want_to_go_id: i64,
}

/// Converts a want-to-go entry into a full spot for the same place.
#[derive(Debug, Deserialize)]
pub struct WantToGoConvertRequest {
    pub want_to_go_id: i64,
    pub rating: i64,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WantToGoResponse {
    pub id: i64,
    pub user_id: i64,
    pub place_id: i64,
    pub notes: Option<String>,
    pub place: PlaceSummary,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct WantToGoListResponse {
    pub items: Vec<WantToGoResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
