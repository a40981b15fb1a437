use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PlaceCreateRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceGetRequest {
    pub place_id: i64,
}

/// Embedded place fields on spot and want-to-go responses.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceSummary {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceResponse {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub categories: Vec<String>,
    pub created_at: String,
}
