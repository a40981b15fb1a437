use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{AppState, CurrentUser};
use crate::database::{execute_query, fetch_all, fetch_one, insert_returning_id, queries, DbConn};
use crate::error::{AppError, AppResult};
use crate::models::{
    PlaylistAddSpotsRequest, PlaylistCreateRequest, PlaylistDeleteRequest, PlaylistDetailResponse,
    PlaylistGetRequest, PlaylistListRequest, PlaylistListResponse, PlaylistPublishRequest,
    PlaylistRemoveSpotRequest, PlaylistReorderRequest, PlaylistResponse, PlaylistUpdateRequest,
};
use crate::routes::feed::spawn_feed_fanout;
use crate::routes::spots::map_spot_row;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/playlist/create", post(create_handler))
        .route("/playlist/get", post(get_handler))
        .route("/playlist/list", post(list_handler))
        .route("/playlist/update", post(update_handler))
        .route("/playlist/publish", post(publish_handler))
        .route("/playlist/delete", post(delete_handler))
        .route("/playlist/add-spots", post(add_spots_handler))
        .route("/playlist/remove-spot", post(remove_spot_handler))
        .route("/playlist/reorder", post(reorder_handler))
}

fn map_playlist_row(row: &rusqlite::Row) -> rusqlite::Result<PlaylistResponse> {
    Ok(PlaylistResponse {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        cover_image_url: row.get(4)?,
        is_published: row.get(5)?,
        created_at: row.get(6)?,
        spot_count: row.get(7)?,
    })
}

fn fetch_playlist(conn: &DbConn, playlist_id: i64) -> AppResult<PlaylistResponse> {
    fetch_one(
        conn,
        queries::playlists::SELECT_WITH_COUNT,
        &[&playlist_id],
        map_playlist_row,
    )?
    .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))
}

fn owned_playlist(
    conn: &DbConn,
    user_id: i64,
    playlist_id: i64,
    action: &str,
) -> AppResult<PlaylistResponse> {
    let playlist = fetch_playlist(conn, playlist_id)?;
    if playlist.user_id != user_id {
        return Err(AppError::Authorization(format!(
            "You do not have permission to {} this playlist",
            action
        )));
    }
    Ok(playlist)
}

/// Returns the subset of `spot_ids` that do NOT belong to `user_id`.
fn foreign_spot_ids(conn: &DbConn, user_id: i64, spot_ids: &[i64]) -> AppResult<Vec<i64>> {
    if spot_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; spot_ids.len()].join(", ");
    let sql = format!(
        "SELECT id FROM spots WHERE user_id = ? AND id IN ({})",
        placeholders
    );

    let mut params: Vec<&dyn rusqlite::ToSql> = vec![&user_id];
    for id in spot_ids {
        params.push(id);
    }

    let owned = fetch_all(conn, &sql, &params, |row| row.get::<_, i64>(0))?;
    Ok(spot_ids
        .iter()
        .copied()
        .filter(|id| !owned.contains(id))
        .collect())
}

pub fn create_playlist(
    conn: &DbConn,
    user_id: i64,
    request: &PlaylistCreateRequest,
) -> AppResult<PlaylistResponse> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let foreign = foreign_spot_ids(conn, user_id, &request.spot_ids)?;
    if !foreign.is_empty() {
        let ids = foreign
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::Authorization(format!(
            "Spots do not belong to you: {}",
            ids
        )));
    }

    let playlist_id = insert_returning_id(
        conn,
        queries::playlists::INSERT,
        &[
            &user_id,
            &request.title,
            &request.description,
            &request.cover_image_url,
        ],
    )?;

    for (position, spot_id) in request.spot_ids.iter().enumerate() {
        execute_query(
            conn,
            queries::playlists::ADD_SPOT,
            &[&playlist_id, spot_id, &(position as i64)],
        )?;
    }

    fetch_playlist(conn, playlist_id)
}

/// Unpublished playlists are only visible to their owner.
pub fn get_playlist(
    conn: &DbConn,
    user_id: i64,
    playlist_id: i64,
) -> AppResult<PlaylistDetailResponse> {
    let playlist = fetch_playlist(conn, playlist_id)?;
    if !playlist.is_published && playlist.user_id != user_id {
        return Err(AppError::NotFound("Playlist not found".to_string()));
    }

    let spots = fetch_all(
        conn,
        queries::playlists::SELECT_SPOTS,
        &[&playlist_id],
        map_spot_row,
    )?;

    Ok(PlaylistDetailResponse {
        id: playlist.id,
        user_id: playlist.user_id,
        title: playlist.title,
        description: playlist.description,
        cover_image_url: playlist.cover_image_url,
        is_published: playlist.is_published,
        spots,
        created_at: playlist.created_at,
    })
}

pub fn list_playlists(
    conn: &DbConn,
    user_id: i64,
    request: &PlaylistListRequest,
) -> AppResult<PlaylistListResponse> {
    let target = request.user_id.unwrap_or(user_id);

    let sql = if target == user_id {
        queries::playlists::SELECT_FOR_USER
    } else {
        queries::playlists::SELECT_PUBLISHED_FOR_USER
    };

    let playlists = fetch_all(conn, sql, &[&target], map_playlist_row)?;
    Ok(PlaylistListResponse { playlists })
}

pub fn update_playlist(
    conn: &DbConn,
    user_id: i64,
    request: &PlaylistUpdateRequest,
) -> AppResult<PlaylistResponse> {
    owned_playlist(conn, user_id, request.playlist_id, "update")?;

    let mut assignments: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        assignments.push("title = ?");
        params.push(Box::new(title.clone()));
    }
    if let Some(description) = &request.description {
        assignments.push("description = ?");
        params.push(Box::new(description.clone()));
    }
    if let Some(cover_image_url) = &request.cover_image_url {
        assignments.push("cover_image_url = ?");
        params.push(Box::new(cover_image_url.clone()));
    }

    if !assignments.is_empty() {
        let sql = format!(
            "UPDATE playlists SET {} WHERE id = ?",
            assignments.join(", ")
        );
        params.push(Box::new(request.playlist_id));

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        execute_query(conn, &sql, &param_refs)?;
    }

    fetch_playlist(conn, request.playlist_id)
}

pub fn publish_playlist(
    conn: &DbConn,
    user_id: i64,
    playlist_id: i64,
) -> AppResult<PlaylistResponse> {
    owned_playlist(conn, user_id, playlist_id, "publish")?;
    execute_query(conn, queries::playlists::SET_PUBLISHED, &[&playlist_id])?;
    fetch_playlist(conn, playlist_id)
}

pub fn delete_playlist(conn: &DbConn, user_id: i64, playlist_id: i64) -> AppResult<()> {
    owned_playlist(conn, user_id, playlist_id, "delete")?;
    execute_query(conn, queries::playlists::DELETE, &[&playlist_id])?;
    Ok(())
}

/// Appends the caller's spots after the current last position. Spots the
/// caller does not own are skipped, duplicates are ignored by the insert.
pub fn add_spots(
    conn: &DbConn,
    user_id: i64,
    request: &PlaylistAddSpotsRequest,
) -> AppResult<PlaylistResponse> {
    owned_playlist(conn, user_id, request.playlist_id, "update")?;

    let foreign = foreign_spot_ids(conn, user_id, &request.spot_ids)?;

    let max_position: Option<i64> = fetch_one(
        conn,
        queries::playlists::SELECT_MAX_POSITION,
        &[&request.playlist_id],
        |row| row.get(0),
    )?
    .flatten();
    let mut next_position = max_position.map_or(0, |p| p + 1);

    for spot_id in &request.spot_ids {
        if foreign.contains(spot_id) {
            continue;
        }
        execute_query(
            conn,
            queries::playlists::ADD_SPOT,
            &[&request.playlist_id, spot_id, &next_position],
        )?;
        next_position += 1;
    }

    fetch_playlist(conn, request.playlist_id)
}

pub fn remove_spot(
    conn: &DbConn,
    user_id: i64,
    request: &PlaylistRemoveSpotRequest,
) -> AppResult<PlaylistResponse> {
    owned_playlist(conn, user_id, request.playlist_id, "update")?;

    execute_query(
        conn,
        queries::playlists::REMOVE_SPOT,
        &[&request.playlist_id, &request.spot_id],
    )?;

    fetch_playlist(conn, request.playlist_id)
}

/// Rewrites display_order to match the order of `spot_ids`. Spots missing
/// from the list keep their old position.
pub fn reorder_playlist(
    conn: &DbConn,
    user_id: i64,
    request: &PlaylistReorderRequest,
) -> AppResult<PlaylistDetailResponse> {
    owned_playlist(conn, user_id, request.playlist_id, "update")?;

    for (position, spot_id) in request.spot_ids.iter().enumerate() {
        execute_query(
            conn,
            queries::playlists::UPDATE_POSITION,
            &[&(position as i64), &request.playlist_id, spot_id],
        )?;
    }

    get_playlist(conn, user_id, request.playlist_id)
}

async fn create_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistCreateRequest>,
) -> AppResult<Json<PlaylistResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(create_playlist(&conn, current_user.id, &request)?))
}

async fn get_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistGetRequest>,
) -> AppResult<Json<PlaylistDetailResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(get_playlist(&conn, current_user.id, request.playlist_id)?))
}

async fn list_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistListRequest>,
) -> AppResult<Json<PlaylistListResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(list_playlists(&conn, current_user.id, &request)?))
}

async fn update_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistUpdateRequest>,
) -> AppResult<Json<PlaylistResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(update_playlist(&conn, current_user.id, &request)?))
}

async fn publish_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistPublishRequest>,
) -> AppResult<Json<PlaylistResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    let playlist = publish_playlist(&conn, current_user.id, request.playlist_id)?;

    spawn_feed_fanout(state.pool.clone(), current_user.id, "playlist", playlist.id);

    Ok(Json(playlist))
}

async fn delete_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistDeleteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    delete_playlist(&conn, current_user.id, request.playlist_id)?;

    Ok(Json(serde_json::json!({"message": "Playlist deleted successfully"})))
}

async fn add_spots_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistAddSpotsRequest>,
) -> AppResult<Json<PlaylistResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(add_spots(&conn, current_user.id, &request)?))
}

async fn remove_spot_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistRemoveSpotRequest>,
) -> AppResult<Json<PlaylistResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(remove_spot(&conn, current_user.id, &request)?))
}

async fn reorder_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PlaylistReorderRequest>,
) -> AppResult<Json<PlaylistDetailResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(reorder_playlist(&conn, current_user.id, &request)?))
}
