use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{AppState, CurrentUser};
use crate::database::{execute_query, fetch_all, fetch_one, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{
    FollowCreateRequest, FollowDecisionRequest, FollowResponse, PendingFollowRequest,
    PendingFollowRequestsResponse, UnfollowRequest, UserSummary,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follow/create", post(follow_handler))
        .route("/follow/delete", post(unfollow_handler))
        .route("/follow/requests", post(pending_requests_handler))
        .route("/follow/approve", post(approve_handler))
        .route("/follow/deny", post(deny_handler))
}

fn map_follow_row(row: &rusqlite::Row) -> rusqlite::Result<FollowResponse> {
    Ok(FollowResponse {
        id: row.get(0)?,
        follower_id: row.get(1)?,
        followee_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn fetch_by_pair(conn: &DbConn, follower_id: i64, followee_id: i64) -> AppResult<Option<FollowResponse>> {
    fetch_one(
        conn,
        queries::follows::SELECT_BY_PAIR,
        &[&follower_id, &followee_id],
        map_follow_row,
    )
}

/// Creates a follow edge. Public accounts and creators are followed
/// immediately, private accounts get a pending request that the followee
/// must approve. Re-following an existing pair returns the current edge
/// untouched.
pub fn follow_user(
    conn: &DbConn,
    follower_id: i64,
    request: &FollowCreateRequest,
) -> AppResult<FollowResponse> {
    if request.followee_id == follower_id {
        return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
    }

    let followee = fetch_one(
        conn,
        queries::users::SELECT_PRIVACY,
        &[&request.followee_id],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, bool>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    )?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(existing) = fetch_by_pair(conn, follower_id, request.followee_id)? {
        return Ok(existing);
    }

    let (_, is_private, role) = followee;
    let status = if !is_private || role == "creator" {
        "active"
    } else {
        "pending"
    };

    execute_query(
        conn,
        queries::follows::UPSERT,
        &[&follower_id, &request.followee_id, &status],
    )?;

    fetch_by_pair(conn, follower_id, request.followee_id)?
        .ok_or_else(|| AppError::Internal("Follow relationship not persisted".to_string()))
}

pub fn unfollow(conn: &DbConn, user_id: i64, follow_id: i64) -> AppResult<()> {
    let follow = fetch_one(conn, queries::follows::SELECT_BY_ID, &[&follow_id], map_follow_row)?
        .ok_or_else(|| AppError::NotFound("Follow relationship not found".to_string()))?;

    if follow.follower_id != user_id {
        return Err(AppError::Authorization(
            "You do not have permission to unfollow this user".to_string(),
        ));
    }

    execute_query(conn, queries::follows::DELETE, &[&follow_id])?;
    Ok(())
}

pub fn pending_requests(conn: &DbConn, user_id: i64) -> AppResult<PendingFollowRequestsResponse> {
    let requests = fetch_all(
        conn,
        queries::follows::SELECT_PENDING_FOR_FOLLOWEE,
        &[&user_id],
        |row| {
            Ok(PendingFollowRequest {
                id: row.get(0)?,
                follower: UserSummary {
                    id: row.get(1)?,
                    username: row.get(2)?,
                    profile_picture_url: row.get(3)?,
                },
                created_at: row.get(4)?,
            })
        },
    )?;

    Ok(PendingFollowRequestsResponse { requests })
}

fn pending_request_for_decision(
    conn: &DbConn,
    user_id: i64,
    request_id: i64,
    action: &str,
) -> AppResult<FollowResponse> {
    let follow = fetch_one(conn, queries::follows::SELECT_BY_ID, &[&request_id], map_follow_row)?
        .ok_or_else(|| AppError::NotFound("Follow request not found".to_string()))?;

    if follow.followee_id != user_id {
        return Err(AppError::Authorization(format!(
            "You do not have permission to {} this request",
            action
        )));
    }

    if follow.status != "pending" {
        return Err(AppError::BadRequest(
            "This follow request is not pending".to_string(),
        ));
    }

    Ok(follow)
}

pub fn approve_request(conn: &DbConn, user_id: i64, request_id: i64) -> AppResult<FollowResponse> {
    let follow = pending_request_for_decision(conn, user_id, request_id, "approve")?;

    execute_query(conn, queries::follows::UPDATE_STATUS, &[&"active", &follow.id])?;

    fetch_one(conn, queries::follows::SELECT_BY_ID, &[&follow.id], map_follow_row)?
        .ok_or_else(|| AppError::NotFound("Follow request not found".to_string()))
}

pub fn deny_request(conn: &DbConn, user_id: i64, request_id: i64) -> AppResult<()> {
    let follow = pending_request_for_decision(conn, user_id, request_id, "deny")?;
    execute_query(conn, queries::follows::DELETE, &[&follow.id])?;
    Ok(())
}

async fn follow_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<FollowCreateRequest>,
) -> AppResult<Json<FollowResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(follow_user(&conn, current_user.id, &request)?))
}

async fn unfollow_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<UnfollowRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    unfollow(&conn, current_user.id, request.follow_id)?;

    Ok(Json(serde_json::json!({"message": "Unfollowed successfully"})))
}

async fn pending_requests_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<PendingFollowRequestsResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(pending_requests(&conn, current_user.id)?))
}

async fn approve_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<FollowDecisionRequest>,
) -> AppResult<Json<FollowResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(approve_request(&conn, current_user.id, request.request_id)?))
}

async fn deny_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<FollowDecisionRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    deny_request(&conn, current_user.id, request.request_id)?;

    Ok(Json(serde_json::json!({"message": "Follow request denied"})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_db, create_test_private_user, create_test_user};

    #[test]
    fn test_follow_public_user_is_active() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let followee = create_test_user(&pool, "bob", "bob@example.com");
        let conn = pool.get().unwrap();

        let follow = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();
        assert_eq!(follow.status, "active");
    }

    #[test]
    fn test_follow_private_user_is_pending() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let followee = create_test_private_user(&pool, "carol", "carol@example.com");
        let conn = pool.get().unwrap();

        let follow = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();
        assert_eq!(follow.status, "pending");
    }

    #[test]
    fn test_follow_self_rejected() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let conn = pool.get().unwrap();

        let err = follow_user(&conn, user_id, &FollowCreateRequest { followee_id: user_id }).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_follow_unknown_user_not_found() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let conn = pool.get().unwrap();

        let err = follow_user(&conn, follower, &FollowCreateRequest { followee_id: 9999 }).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_refollow_returns_existing_edge() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let followee = create_test_private_user(&pool, "carol", "carol@example.com");
        let conn = pool.get().unwrap();

        let first = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();
        let second = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, "pending");
    }

    #[test]
    fn test_approve_pending_request() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let followee = create_test_private_user(&pool, "carol", "carol@example.com");
        let conn = pool.get().unwrap();

        let follow = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();

        let pending = pending_requests(&conn, followee).unwrap();
        assert_eq!(pending.requests.len(), 1);
        assert_eq!(pending.requests[0].follower.username, "alice");

        let approved = approve_request(&conn, followee, follow.id).unwrap();
        assert_eq!(approved.status, "active");

        // Approving again is rejected, the edge is no longer pending.
        let err = approve_request(&conn, followee, follow.id).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_approve_requires_followee() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let followee = create_test_private_user(&pool, "carol", "carol@example.com");
        let other = create_test_user(&pool, "bob", "bob@example.com");
        let conn = pool.get().unwrap();

        let follow = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();

        let err = approve_request(&conn, other, follow.id).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn test_deny_removes_request() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let followee = create_test_private_user(&pool, "carol", "carol@example.com");
        let conn = pool.get().unwrap();

        let follow = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();
        deny_request(&conn, followee, follow.id).unwrap();

        assert!(fetch_by_pair(&conn, follower, followee).unwrap().is_none());
    }

    #[test]
    fn test_unfollow_requires_follower() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "alice", "alice@example.com");
        let followee = create_test_user(&pool, "bob", "bob@example.com");
        let conn = pool.get().unwrap();

        let follow = follow_user(&conn, follower, &FollowCreateRequest { followee_id: followee }).unwrap();

        let err = unfollow(&conn, followee, follow.id).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        unfollow(&conn, follower, follow.id).unwrap();
        let err = unfollow(&conn, follower, follow.id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
