use crate::models::PlaceSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SpotCreateRequest {
    pub place_id: i64,
    pub rating: i64,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpotGetRequest {
    pub spot_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SpotUpdateRequest {
    pub spot_id: i64,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SpotDeleteRequest {
    pub spot_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotResponse {
    pub id: i64,
    pub user_id: i64,
    pub place_id: i64,
    pub rating: i64,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub photos: Vec<String>,
    pub place: PlaceSummary,
    pub created_at: String,
}
