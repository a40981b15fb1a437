use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{AppState, CurrentUser};
use crate::constants::{MAX_SPOT_PHOTOS, MAX_SPOT_RATING, MIN_SPOT_RATING};
use crate::database::{execute_query, fetch_one, insert_returning_id, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{
    encode_string_list, parse_string_list, PlaceSummary, SpotCreateRequest, SpotDeleteRequest,
    SpotGetRequest, SpotResponse, SpotUpdateRequest,
};
use crate::routes::feed::spawn_feed_fanout;
use crate::routes::places::ensure_place_exists;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/spot/create", post(create_spot_handler))
        .route("/spot/get", post(get_spot_handler))
        .route("/spot/update", post(update_spot_handler))
        .route("/spot/delete", post(delete_spot_handler))
}

pub fn map_spot_row(row: &rusqlite::Row) -> rusqlite::Result<SpotResponse> {
    let tags: Option<String> = row.get(5)?;
    let photos: Option<String> = row.get(6)?;
    let categories: Option<String> = row.get(11)?;

    Ok(SpotResponse {
        id: row.get(0)?,
        user_id: row.get(1)?,
        place_id: row.get(2)?,
        rating: row.get(3)?,
        notes: row.get(4)?,
        tags: parse_string_list(tags),
        photos: parse_string_list(photos),
        created_at: row.get(7)?,
        place: PlaceSummary {
            id: row.get(2)?,
            name: row.get(8)?,
            latitude: row.get(9)?,
            longitude: row.get(10)?,
            categories: parse_string_list(categories),
        },
    })
}

pub fn fetch_spot(conn: &DbConn, spot_id: i64) -> AppResult<SpotResponse> {
    fetch_one(conn, queries::spots::SELECT_BY_ID, &[&spot_id], map_spot_row)?
        .ok_or_else(|| AppError::NotFound("Spot not found".to_string()))
}

fn validate_rating(rating: i64) -> AppResult<()> {
    if !(MIN_SPOT_RATING..=MAX_SPOT_RATING).contains(&rating) {
        return Err(AppError::Validation(format!(
            "Rating must be between {} and {}",
            MIN_SPOT_RATING, MAX_SPOT_RATING
        )));
    }
    Ok(())
}

fn validate_photos(photos: &[String]) -> AppResult<()> {
    if photos.len() > MAX_SPOT_PHOTOS {
        return Err(AppError::Validation(format!(
            "Maximum {} photos allowed per spot",
            MAX_SPOT_PHOTOS
        )));
    }
    Ok(())
}

fn spot_owner(conn: &DbConn, spot_id: i64) -> AppResult<i64> {
    fetch_one(conn, queries::spots::SELECT_OWNER, &[&spot_id], |row| {
        row.get(0)
    })?
    .ok_or_else(|| AppError::NotFound("Spot not found".to_string()))
}

pub fn create_spot(conn: &DbConn, user_id: i64, request: &SpotCreateRequest) -> AppResult<SpotResponse> {
    ensure_place_exists(conn, request.place_id)?;

    let existing = fetch_one(
        conn,
        queries::spots::CHECK_EXISTS_FOR_PLACE,
        &[&user_id, &request.place_id],
        |row| row.get::<_, i64>(0),
    )?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "You already have a spot for this place".to_string(),
        ));
    }

    validate_rating(request.rating)?;
    validate_photos(&request.photos)?;

    let spot_id = insert_returning_id(
        conn,
        queries::spots::INSERT,
        &[
            &user_id,
            &request.place_id,
            &request.rating,
            &request.notes,
            &encode_string_list(&request.tags),
            &encode_string_list(&request.photos),
        ],
    )?;

    fetch_spot(conn, spot_id)
}

pub fn update_spot(
    conn: &DbConn,
    user_id: i64,
    request: &SpotUpdateRequest,
) -> AppResult<SpotResponse> {
    let owner = spot_owner(conn, request.spot_id)?;
    if owner != user_id {
        return Err(AppError::Authorization(
            "You do not have permission to update this spot".to_string(),
        ));
    }

    if let Some(rating) = request.rating {
        validate_rating(rating)?;
    }
    if let Some(ref photos) = request.photos {
        validate_photos(photos)?;
    }

    let mut updates = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(rating) = request.rating {
        updates.push("rating = ?");
        params.push(Box::new(rating));
    }

    if let Some(ref notes) = request.notes {
        updates.push("notes = ?");
        params.push(Box::new(notes.clone()));
    }

    if let Some(ref tags) = request.tags {
        updates.push("tags = ?");
        params.push(Box::new(encode_string_list(tags)));
    }

    if let Some(ref photos) = request.photos {
        updates.push("photos = ?");
        params.push(Box::new(encode_string_list(photos)));
    }

    if !updates.is_empty() {
        params.push(Box::new(request.spot_id));
        let sql = format!("UPDATE spots SET {} WHERE id = ?", updates.join(", "));
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        execute_query(conn, &sql, &param_refs)?;
    }

    fetch_spot(conn, request.spot_id)
}

pub fn delete_spot(conn: &DbConn, user_id: i64, spot_id: i64) -> AppResult<()> {
    let owner = spot_owner(conn, spot_id)?;
    if owner != user_id {
        return Err(AppError::Authorization(
            "You do not have permission to delete this spot".to_string(),
        ));
    }

    execute_query(conn, queries::spots::DELETE, &[&spot_id])?;
    Ok(())
}

async fn create_spot_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<SpotCreateRequest>,
) -> AppResult<Json<SpotResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    let spot = create_spot(&conn, current_user.id, &request)?;

    spawn_feed_fanout(state.pool.clone(), current_user.id, "spot", spot.id);

    Ok(Json(spot))
}

async fn get_spot_handler(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<SpotGetRequest>,
) -> AppResult<Json<SpotResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(fetch_spot(&conn, request.spot_id)?))
}

async fn update_spot_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<SpotUpdateRequest>,
) -> AppResult<Json<SpotResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(update_spot(&conn, current_user.id, &request)?))
}

async fn delete_spot_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<SpotDeleteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    delete_spot(&conn, current_user.id, request.spot_id)?;

    Ok(Json(
        serde_json::json!({"message": "Spot deleted successfully"}),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_db, create_test_place, create_test_user};

    fn create_request(place_id: i64) -> SpotCreateRequest {
        SpotCreateRequest {
            place_id,
            rating: 4,
            notes: Some("great".to_string()),
            tags: vec!["pizza".to_string()],
            photos: Vec::new(),
        }
    }

    #[test]
    fn test_create_spot_roundtrip() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        let spot = create_spot(&conn, user_id, &create_request(place_id)).unwrap();
        assert_eq!(spot.user_id, user_id);
        assert_eq!(spot.place_id, place_id);
        assert_eq!(spot.rating, 4);
        assert_eq!(spot.tags, vec!["pizza".to_string()]);
        assert_eq!(spot.place.name, "Joe's Pizza");
    }

    #[test]
    fn test_create_spot_unknown_place() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let conn = pool.get().unwrap();

        let err = create_spot(&conn, user_id, &create_request(9999)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_create_spot_duplicate_place_conflicts() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        create_spot(&conn, user_id, &create_request(place_id)).unwrap();
        let err = create_spot(&conn, user_id, &create_request(place_id)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_create_spot_rejects_bad_rating() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        let mut request = create_request(place_id);
        request.rating = 6;
        let err = create_spot(&conn, user_id, &request).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_create_spot_rejects_too_many_photos() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        let mut request = create_request(place_id);
        request.photos = (0..6).map(|i| format!("photo{}.jpg", i)).collect();
        let err = create_spot(&conn, user_id, &request).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_update_spot_requires_ownership() {
        let pool = create_test_db();
        let owner = create_test_user(&pool, "alice", "alice@example.com");
        let other = create_test_user(&pool, "bob", "bob@example.com");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        let spot = create_spot(&conn, owner, &create_request(place_id)).unwrap();

        let request = SpotUpdateRequest {
            spot_id: spot.id,
            rating: Some(5),
            notes: None,
            tags: None,
            photos: None,
        };
        let err = update_spot(&conn, other, &request).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn test_update_spot_partial_fields() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        let spot = create_spot(&conn, user_id, &create_request(place_id)).unwrap();

        let request = SpotUpdateRequest {
            spot_id: spot.id,
            rating: Some(5),
            notes: None,
            tags: None,
            photos: None,
        };
        let updated = update_spot(&conn, user_id, &request).unwrap();
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.notes, Some("great".to_string()));
    }

    #[test]
    fn test_delete_spot() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "alice", "alice@example.com");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        let spot = create_spot(&conn, user_id, &create_request(place_id)).unwrap();
        delete_spot(&conn, user_id, spot.id).unwrap();

        let err = fetch_spot(&conn, spot.id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
