use axum::{extract::State, routing::post, Json, Router};
use tracing::warn;

use crate::auth::{AppState, CurrentUser};
use crate::constants::{DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT};
use crate::database::{execute_query, fetch_all, fetch_one, queries, DbConn, DbPool};
use crate::error::{AppError, AppResult};
use crate::logging::log_error;
use crate::models::{
    parse_string_list, FeedItemResponse, FeedListRequest, FeedListResponse, FeedPlaylistContent,
    FeedSpotContent, UserSummary,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/feed/list", post(list_handler))
}

struct FeedRow {
    id: i64,
    content_type: String,
    content_id: i64,
    created_at: String,
    author: UserSummary,
}

fn map_feed_row(row: &rusqlite::Row) -> rusqlite::Result<FeedRow> {
    Ok(FeedRow {
        id: row.get(0)?,
        content_type: row.get(1)?,
        content_id: row.get(2)?,
        created_at: row.get(3)?,
        author: UserSummary {
            id: row.get(4)?,
            username: row.get(5)?,
            profile_picture_url: row.get(6)?,
        },
    })
}

fn fetch_spot_content(conn: &DbConn, spot_id: i64) -> AppResult<Option<FeedSpotContent>> {
    let content = fetch_one(conn, queries::feed::SELECT_SPOT_CONTENT, &[&spot_id], |row| {
        let tags: Option<String> = row.get(3)?;
        let photos: Option<String> = row.get(4)?;
        let categories: Option<String> = row.get(6)?;
        Ok(FeedSpotContent {
            id: row.get(0)?,
            rating: row.get(1)?,
            notes: row.get(2)?,
            tags: parse_string_list(tags),
            photos: parse_string_list(photos),
            place_name: row.get(5)?,
            categories: parse_string_list(categories),
        })
    })?;
    Ok(content)
}

fn fetch_playlist_content(conn: &DbConn, playlist_id: i64) -> AppResult<Option<FeedPlaylistContent>> {
    let content = fetch_one(
        conn,
        queries::feed::SELECT_PLAYLIST_CONTENT,
        &[&playlist_id],
        |row| {
            Ok(FeedPlaylistContent {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                cover_image_url: row.get(3)?,
                spot_count: row.get(4)?,
            })
        },
    )?;
    Ok(content)
}

/// Pages the feed newest-first with a `created_at` cursor. One extra row is
/// fetched to detect whether another page exists. Items whose content has
/// since been deleted are dropped from the page.
pub fn list_feed(conn: &DbConn, user_id: i64, request: &FeedListRequest) -> AppResult<FeedListResponse> {
    let limit = request
        .limit
        .unwrap_or(DEFAULT_FEED_LIMIT)
        .clamp(1, MAX_FEED_LIMIT);
    let probe_limit = limit + 1;

    let rows = match &request.cursor {
        Some(cursor) => fetch_all(
            conn,
            queries::feed::SELECT_FOR_USER_BEFORE,
            &[&user_id, cursor, &probe_limit],
            map_feed_row,
        )?,
        None => fetch_all(
            conn,
            queries::feed::SELECT_FOR_USER,
            &[&user_id, &probe_limit],
            map_feed_row,
        )?,
    };

    let has_more = rows.len() as i64 > limit;
    let page: Vec<FeedRow> = rows.into_iter().take(limit as usize).collect();
    let next_cursor = if has_more {
        page.last().map(|row| row.created_at.clone())
    } else {
        None
    };

    let mut items = Vec::with_capacity(page.len());
    for row in page {
        let (spot, playlist) = match row.content_type.as_str() {
            "spot" => (fetch_spot_content(conn, row.content_id)?, None),
            "playlist" => (None, fetch_playlist_content(conn, row.content_id)?),
            other => {
                warn!("skipping feed item {} with unknown type {}", row.id, other);
                continue;
            }
        };

        // Content deleted after fan-out.
        if spot.is_none() && playlist.is_none() {
            continue;
        }

        items.push(FeedItemResponse {
            id: row.id,
            item_type: row.content_type,
            spot,
            playlist,
            author: row.author,
            created_at: row.created_at,
        });
    }

    Ok(FeedListResponse {
        items,
        next_cursor,
        has_more,
    })
}

/// Writes one feed item per active follower of the author.
pub fn fan_out_to_followers(
    conn: &DbConn,
    author_id: i64,
    content_type: &str,
    content_id: i64,
) -> AppResult<usize> {
    let follower_ids = fetch_all(
        conn,
        queries::follows::SELECT_ACTIVE_FOLLOWER_IDS,
        &[&author_id],
        |row| row.get::<_, i64>(0),
    )?;

    for follower_id in &follower_ids {
        execute_query(
            conn,
            queries::feed::INSERT_ITEM,
            &[follower_id, &content_type, &content_id, &author_id],
        )?;
    }

    Ok(follower_ids.len())
}

/// Runs the fan-out off the request path. Failures are logged and never
/// surface to the publishing request.
pub fn spawn_feed_fanout(pool: DbPool, author_id: i64, content_type: &'static str, content_id: i64) {
    tokio::spawn(async move {
        let result = pool
            .get()
            .map_err(AppError::Pool)
            .and_then(|conn| fan_out_to_followers(&conn, author_id, content_type, content_id));

        if let Err(err) = result {
            log_error(
                &format!("feed fan-out for {} {}", content_type, content_id),
                &err,
            );
        }
    });
}

async fn list_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<FeedListRequest>,
) -> AppResult<Json<FeedListResponse>> {
    let conn = state.pool.get().map_err(AppError::Pool)?;
    Ok(Json(list_feed(&conn, current_user.id, &request)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpotCreateRequest;
    use crate::routes::spots::{create_spot, delete_spot};
    use crate::test_utils::{
        create_test_db, create_test_follow, create_test_place, create_test_user,
    };

    fn publish_spot(conn: &DbConn, author: i64, place_id: i64) -> i64 {
        let spot = create_spot(
            conn,
            author,
            &SpotCreateRequest {
                place_id,
                rating: 4,
                notes: None,
                tags: Vec::new(),
                photos: Vec::new(),
            },
        )
        .unwrap();
        fan_out_to_followers(conn, author, "spot", spot.id).unwrap();
        spot.id
    }

    #[test]
    fn test_fan_out_reaches_active_followers_only() {
        let pool = create_test_db();
        let author = create_test_user(&pool, "alice", "alice@example.com");
        let active = create_test_user(&pool, "bob", "bob@example.com");
        let pending = create_test_user(&pool, "carol", "carol@example.com");
        create_test_follow(&pool, active, author, "active");
        create_test_follow(&pool, pending, author, "pending");
        let place_id = create_test_place(&pool, "A", 40.7, -74.0);
        let conn = pool.get().unwrap();

        publish_spot(&conn, author, place_id);

        let active_feed = list_feed(&conn, active, &FeedListRequest { limit: None, cursor: None }).unwrap();
        assert_eq!(active_feed.items.len(), 1);
        assert_eq!(active_feed.items[0].item_type, "spot");
        assert_eq!(active_feed.items[0].author.username, "alice");

        let pending_feed = list_feed(&conn, pending, &FeedListRequest { limit: None, cursor: None }).unwrap();
        assert!(pending_feed.items.is_empty());
    }

    #[test]
    fn test_feed_hydrates_spot_content() {
        let pool = create_test_db();
        let author = create_test_user(&pool, "alice", "alice@example.com");
        let follower = create_test_user(&pool, "bob", "bob@example.com");
        create_test_follow(&pool, follower, author, "active");
        let place_id = create_test_place(&pool, "Joe's Pizza", 40.7305, -74.0021);
        let conn = pool.get().unwrap();

        publish_spot(&conn, author, place_id);

        let feed = list_feed(&conn, follower, &FeedListRequest { limit: None, cursor: None }).unwrap();
        let spot = feed.items[0].spot.as_ref().unwrap();
        assert_eq!(spot.place_name, "Joe's Pizza");
        assert_eq!(spot.rating, 4);
    }

    #[test]
    fn test_feed_skips_deleted_content() {
        let pool = create_test_db();
        let author = create_test_user(&pool, "alice", "alice@example.com");
        let follower = create_test_user(&pool, "bob", "bob@example.com");
        create_test_follow(&pool, follower, author, "active");
        let place_id = create_test_place(&pool, "A", 40.7, -74.0);
        let conn = pool.get().unwrap();

        let spot_id = publish_spot(&conn, author, place_id);
        delete_spot(&conn, author, spot_id).unwrap();

        let feed = list_feed(&conn, follower, &FeedListRequest { limit: None, cursor: None }).unwrap();
        assert!(feed.items.is_empty());
    }

    #[test]
    fn test_feed_pagination() {
        let pool = create_test_db();
        let author = create_test_user(&pool, "alice", "alice@example.com");
        let follower = create_test_user(&pool, "bob", "bob@example.com");
        create_test_follow(&pool, follower, author, "active");
        let conn = pool.get().unwrap();

        // Distinct created_at values so the cursor can separate pages.
        for i in 0..3 {
            let place_id = crate::test_utils::create_test_place(&pool, "P", 40.7 + i as f64 * 0.01, -74.0);
            let spot = create_spot(
                &conn,
                author,
                &SpotCreateRequest {
                    place_id,
                    rating: 4,
                    notes: None,
                    tags: Vec::new(),
                    photos: Vec::new(),
                },
            )
            .unwrap();
            execute_query(
                &conn,
                r#"
                INSERT INTO feed_items (user_id, content_type, content_id, author_id, created_at)
                VALUES (?, 'spot', ?, ?, ?)
                "#,
                &[&follower, &spot.id, &author, &format!("2026-01-0{} 12:00:00", i + 1)],
            )
            .unwrap();
        }

        let first = list_feed(&conn, follower, &FeedListRequest { limit: Some(2), cursor: None }).unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.has_more);
        let cursor = first.next_cursor.clone().unwrap();

        let second = list_feed(
            &conn,
            follower,
            &FeedListRequest {
                limit: Some(2),
                cursor: Some(cursor),
            },
        )
        .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(!second.has_more);
        assert!(second.next_cursor.is_none());
    }

    #[test]
    fn test_feed_limit_is_clamped() {
        let pool = create_test_db();
        let follower = create_test_user(&pool, "bob", "bob@example.com");
        let conn = pool.get().unwrap();

        let feed = list_feed(
            &conn,
            follower,
            &FeedListRequest {
                limit: Some(10_000),
                cursor: None,
            },
        )
        .unwrap();
        assert!(feed.items.is_empty());
        assert!(!feed.has_more);
    }
}
