#![cfg(test)]

use crate::app::create_app;
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::database::{init_database, DbPool};
use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

static DB_COUNTER: AtomicI64 = AtomicI64::new(1);

/// Create an in-memory SQLite database pool with full schema applied.
/// Each call gets its own named shared-cache database so every pooled
/// connection sees the same data.
pub fn create_test_db() -> DbPool {
    let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let uri = format!("file:spotmap_test_{}?mode=memory&cache=shared", db_id);

    let manager = SqliteConnectionManager::file(uri)
        .with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON")?;
            Ok(())
        });

    let pool = Pool::builder()
        .max_size(5)
        .build(manager)
        .expect("Failed to create test database pool");

    let conn = pool.get().expect("Failed to get connection from pool");
    init_database(&conn).expect("Failed to initialize test database schema");

    pool
}

/// Create a test app with in-memory database and cache
pub fn create_test_app() -> (Router, DbPool) {
    let pool = create_test_db();
    let config = Arc::new(Config::default());
    let cache = Arc::new(MemoryCache::new(config.cache.max_capacity));
    let app = create_app(config, pool.clone(), cache);
    (app, pool)
}

/// Test fixture: create a public user
pub fn create_test_user(pool: &DbPool, username: &str, email: &str) -> i64 {
    insert_user(pool, username, email, "consumer", 0)
}

/// Test fixture: create a private user whose follows start pending
pub fn create_test_private_user(pool: &DbPool, username: &str, email: &str) -> i64 {
    insert_user(pool, username, email, "consumer", 1)
}

fn insert_user(pool: &DbPool, username: &str, email: &str, role: &str, is_private: i64) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO users (username, email, role, is_private, is_active) VALUES (?, ?, ?, ?, 1)",
        rusqlite::params![username, email, role, is_private],
    )
    .expect("Failed to insert test user");

    conn.last_insert_rowid()
}

/// Test fixture: create a place at the given coordinates
pub fn create_test_place(pool: &DbPool, name: &str, latitude: f64, longitude: f64) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO places (name, latitude, longitude, categories) VALUES (?, ?, ?, ?)",
        rusqlite::params![name, latitude, longitude, "[]"],
    )
    .expect("Failed to insert test place");

    conn.last_insert_rowid()
}

/// Test fixture: create a spot for a user at a place
pub fn create_test_spot(pool: &DbPool, user_id: i64, place_id: i64) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO spots (user_id, place_id, rating, notes, tags, photos) VALUES (?, ?, 4, NULL, '[]', '[]')",
        rusqlite::params![user_id, place_id],
    )
    .expect("Failed to insert test spot");

    conn.last_insert_rowid()
}

/// Test fixture: create a want-to-go entry for a user at a place
pub fn create_test_want_to_go(pool: &DbPool, user_id: i64, place_id: i64) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO want_to_go (user_id, place_id, notes) VALUES (?, ?, NULL)",
        rusqlite::params![user_id, place_id],
    )
    .expect("Failed to insert test want-to-go entry");

    conn.last_insert_rowid()
}

/// Test fixture: create a follow edge with an explicit status
pub fn create_test_follow(pool: &DbPool, follower_id: i64, followee_id: i64, status: &str) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO follows (follower_id, followee_id, status) VALUES (?, ?, ?)",
        rusqlite::params![follower_id, followee_id, status],
    )
    .expect("Failed to insert test follow");

    conn.last_insert_rowid()
}
