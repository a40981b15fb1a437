use crate::models::UserSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FollowCreateRequest {
    pub followee_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UnfollowRequest {
    pub follow_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct FollowDecisionRequest {
    pub request_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowResponse {
    pub id: i64,
    pub follower_id: i64,
    pub followee_id: i64,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct PendingFollowRequest {
    pub id: i64,
    pub follower: UserSummary,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct PendingFollowRequestsResponse {
    pub requests: Vec<PendingFollowRequest>,
}
