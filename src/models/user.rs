use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub profile_picture_url: Option<String>,
}
