use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{AppState, CurrentUser};
use crate::database::{fetch_one, insert_returning_id, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{encode_string_list, parse_string_list, PlaceCreateRequest, PlaceGetRequest, PlaceResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/place/create", post(create_place))
        .route("/place/get", post(get_place))
}

fn map_place_row(row: &rusqlite::Row) -> rusqlite::Result<PlaceResponse> {
    let categories: Option<String> = row.get(4)?;
    Ok(PlaceResponse {
        id: row.get(0)?,
        name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        categories: parse_string_list(categories),
        created_at: row.get(5)?,
    })
}

pub fn fetch_place(conn: &DbConn, place_id: i64) -> AppResult<PlaceResponse> {
    fetch_one(conn, queries::places::SELECT_BY_ID, &[&place_id], map_place_row)?
        .ok_or_else(|| AppError::NotFound("Place not found".to_string()))
}

pub fn ensure_place_exists(conn: &DbConn, place_id: i64) -> AppResult<()> {
    let exists = fetch_one(conn, queries::places::CHECK_EXISTS, &[&place_id], |row| {
        row.get::<_, i64>(0)
    })?;

    if exists.is_none() {
        return Err(AppError::NotFound("Place not found".to_string()));
    }
    Ok(())
}

async fn create_place(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<PlaceCreateRequest>,
) -> AppResult<Json<PlaceResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;

    let place_id = insert_returning_id(
        &conn,
        queries::places::INSERT,
        &[
            &request.name,
            &request.latitude,
            &request.longitude,
            &encode_string_list(&request.categories),
        ],
    )?;

    Ok(Json(fetch_place(&conn, place_id)?))
}

async fn get_place(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<PlaceGetRequest>,
) -> AppResult<Json<PlaceResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(fetch_place(&conn, request.place_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_db, create_test_place};

    #[test]
    fn test_fetch_place_not_found() {
        let pool = create_test_db();
        let conn = pool.get().unwrap();

        let err = fetch_place(&conn, 9999).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_fetch_place_roundtrip() {
        let pool = create_test_db();
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        let place = fetch_place(&conn, place_id).unwrap();
        assert_eq!(place.name, "Joe's Pizza");
        assert_eq!(place.latitude, 40.7305);
    }
}
