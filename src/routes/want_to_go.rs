use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{AppState, CurrentUser};
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::database::{execute_query, fetch_all, fetch_one, insert_returning_id, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{
    parse_string_list, PlaceSummary, SpotCreateRequest, SpotResponse, WantToGoConvertRequest,
    WantToGoCreateRequest, WantToGoDeleteRequest, WantToGoGetRequest, WantToGoListRequest,
    WantToGoListResponse, WantToGoResponse, WantToGoUpdateRequest,
};
use crate::routes::feed::spawn_feed_fanout;
use crate::routes::places::ensure_place_exists;
use crate::routes::spots::create_spot;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/want-to-go/create", post(create_handler))
        .route("/want-to-go/get", post(get_handler))
        .route("/want-to-go/list", post(list_handler))
        .route("/want-to-go/update", post(update_handler))
        .route("/want-to-go/delete", post(delete_handler))
        .route("/want-to-go/convert", post(convert_handler))
}

fn map_want_to_go_row(row: &rusqlite::Row) -> rusqlite::Result<WantToGoResponse> {
    let categories: Option<String> = row.get(8)?;
    Ok(WantToGoResponse {
        id: row.get(0)?,
        user_id: row.get(1)?,
        place_id: row.get(2)?,
        notes: row.get(3)?,
        created_at: row.get(4)?,
        place: PlaceSummary {
            id: row.get(2)?,
            name: row.get(5)?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
            categories: parse_string_list(categories),
        },
    })
}

fn fetch_want_to_go(conn: &DbConn, want_to_go_id: i64) -> AppResult<WantToGoResponse> {
    fetch_one(
        conn,
        queries::want_to_go::SELECT_BY_ID,
        &[&want_to_go_id],
        map_want_to_go_row,
    )?
    .ok_or_else(|| AppError::NotFound("Want to Go item not found".to_string()))
}

pub fn create_want_to_go(
    conn: &DbConn,
    user_id: i64,
    request: &WantToGoCreateRequest,
) -> AppResult<WantToGoResponse> {
    ensure_place_exists(conn, request.place_id)?;

    let existing = fetch_one(
        conn,
        queries::want_to_go::CHECK_EXISTS_FOR_PLACE,
        &[&user_id, &request.place_id],
        |row| row.get::<_, i64>(0),
    )?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "You already have this place in your Want to Go list".to_string(),
        ));
    }

    let want_to_go_id = insert_returning_id(
        conn,
        queries::want_to_go::INSERT,
        &[&user_id, &request.place_id, &request.notes],
    )?;

    fetch_want_to_go(conn, want_to_go_id)
}

pub fn list_want_to_go(
    conn: &DbConn,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> AppResult<WantToGoListResponse> {
    let items = fetch_all(
        conn,
        queries::want_to_go::SELECT_FOR_USER,
        &[&user_id, &limit, &offset],
        map_want_to_go_row,
    )?;

    let total = fetch_one(
        conn,
        queries::want_to_go::COUNT_FOR_USER,
        &[&user_id],
        |row| row.get(0),
    )?
    .unwrap_or(0);

    Ok(WantToGoListResponse {
        items,
        total,
        limit,
        offset,
    })
}

fn owned_want_to_go(conn: &DbConn, user_id: i64, want_to_go_id: i64, action: &str) -> AppResult<WantToGoResponse> {
    let item = fetch_want_to_go(conn, want_to_go_id)?;
    if item.user_id != user_id {
        return Err(AppError::Authorization(format!(
            "You do not have permission to {} this item",
            action
        )));
    }
    Ok(item)
}

pub fn update_want_to_go(
    conn: &DbConn,
    user_id: i64,
    request: &WantToGoUpdateRequest,
) -> AppResult<WantToGoResponse> {
    owned_want_to_go(conn, user_id, request.want_to_go_id, "update")?;

    if request.notes.is_some() {
        execute_query(
            conn,
            queries::want_to_go::UPDATE_NOTES,
            &[&request.notes, &request.want_to_go_id],
        )?;
    }

    fetch_want_to_go(conn, request.want_to_go_id)
}

pub fn delete_want_to_go(conn: &DbConn, user_id: i64, want_to_go_id: i64) -> AppResult<()> {
    owned_want_to_go(conn, user_id, want_to_go_id, "delete")?;
    execute_query(conn, queries::want_to_go::DELETE, &[&want_to_go_id])?;
    Ok(())
}

/// Turns a want-to-go entry into a spot for the same place, carrying the
/// notes over when the spot request has none. The entry is removed once the
/// spot exists.
pub fn convert_want_to_go(
    conn: &DbConn,
    user_id: i64,
    request: &WantToGoConvertRequest,
) -> AppResult<SpotResponse> {
    let item = owned_want_to_go(conn, user_id, request.want_to_go_id, "convert")?;

    let spot_request = SpotCreateRequest {
        place_id: item.place_id,
        rating: request.rating,
        notes: request.notes.clone().or(item.notes.clone()),
        tags: request.tags.clone(),
        photos: request.photos.clone(),
    };

    let spot = create_spot(conn, user_id, &spot_request)?;
    execute_query(conn, queries::want_to_go::DELETE, &[&request.want_to_go_id])?;

    Ok(spot)
}

async fn create_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<WantToGoCreateRequest>,
) -> AppResult<Json<WantToGoResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(create_want_to_go(&conn, current_user.id, &request)?))
}

async fn get_handler(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<WantToGoGetRequest>,
) -> AppResult<Json<WantToGoResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(fetch_want_to_go(&conn, request.want_to_go_id)?))
}

async fn list_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<WantToGoListRequest>,
) -> AppResult<Json<WantToGoListResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    let limit = request.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1);
    let offset = request.offset.unwrap_or(0).max(0);
    Ok(Json(list_want_to_go(&conn, current_user.id, limit, offset)?))
}

async fn update_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<WantToGoUpdateRequest>,
) -> AppResult<Json<WantToGoResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(update_want_to_go(&conn, current_user.id, &request)?))
}

async fn delete_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<WantToGoDeleteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    delete_want_to_go(&conn, current_user.id, request.want_to_go_id)?;

    Ok(Json(
        serde_json::json!({"message": "Want to Go item deleted successfully"}),
    ))
}

async fn convert_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<WantToGoConvertRequest>,
) -> AppResult<Json<SpotResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    let spot = convert_want_to_go(&conn, current_user.id, &request)?;

    spawn_feed_fanout(state.pool.clone(), current_user.id, "spot", spot.id);

    Ok(Json(spot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_db, create_test_place, create_test_spot, create_test_user};

    fn create_request(place_id: i64) -> WantToGoCreateRequest {
        WantToGoCreateRequest {
            place_id,
            notes: Some("someday".to_string()),
        }
    }

    #[test]
    fn test_create_and_list() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_a = create_test_place(&pool, "A", 40.7, -74.0);
        let place_b = create_test_place(&pool, "B", 40.71, -74.01);
        let conn = pool.get().unwrap();

        create_want_to_go(&conn, user_id, &create_request(place_a)).unwrap();
        create_want_to_go(&conn, user_id, &create_request(place_b)).unwrap();

        let list = list_want_to_go(&conn, user_id, 50, 0).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.total, 2);
    }

    #[test]
    fn test_create_duplicate_conflicts() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "A", 40.7, -74.0);
        let conn = pool.get().unwrap();

        create_want_to_go(&conn, user_id, &create_request(place_id)).unwrap();
        let err = create_want_to_go(&conn, user_id, &create_request(place_id)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_update_requires_ownership() {
        let pool = create_test_db();
        let owner = create_test_user(&pool, "alice", "alice@example.com");
        let other = create_test_user(&pool, "bob", "bob@example.com");
        let place_id = create_test_place(&pool, "A", 40.7, -74.0);
        let conn = pool.get().unwrap();

        let item = create_want_to_go(&conn, owner, &create_request(place_id)).unwrap();

        let request = WantToGoUpdateRequest {
            want_to_go_id: item.id,
            notes: Some("changed".to_string()),
        };
        let err = update_want_to_go(&conn, other, &request).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn test_convert_creates_spot_and_removes_item() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "A", 40.7, -74.0);
        let conn = pool.get().unwrap();

        let item = create_want_to_go(&conn, user_id, &create_request(place_id)).unwrap();

        let request = WantToGoConvertRequest {
            want_to_go_id: item.id,
            rating: 5,
            notes: None,
            tags: Vec::new(),
            photos: Vec::new(),
        };
        let spot = convert_want_to_go(&conn, user_id, &request).unwrap();

        assert_eq!(spot.place_id, place_id);
        // Notes carry over from the want-to-go entry.
        assert_eq!(spot.notes, Some("someday".to_string()));

        let err = fetch_want_to_go(&conn, item.id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_convert_conflicts_when_spot_exists() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "A", 40.7, -74.0);
        create_test_spot(&pool, user_id, place_id);
        let conn = pool.get().unwrap();

        let item = create_want_to_go(&conn, user_id, &create_request(place_id)).unwrap();

        let request = WantToGoConvertRequest {
            want_to_go_id: item.id,
            rating: 5,
            notes: None,
            tags: Vec::new(),
            photos: Vec::new(),
        };
        let err = convert_want_to_go(&conn, user_id, &request).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
