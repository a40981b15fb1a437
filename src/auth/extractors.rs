use crate::cache::ObjectCache;
use crate::config::Config;
use crate::database::{fetch_one, queries, DbPool};
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Header set by the upstream auth gateway after it has verified the
/// caller's token. This service trusts it and only resolves the user row.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub is_private: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: DbPool,
    pub cache: Arc<dyn ObjectCache>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))?;

        let user_id: i64 = header
            .to_str()
            .ok()
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| AppError::Authentication("Invalid user identity".to_string()))?;

        let conn = app_state.pool.get().map_err(AppError::Pool)?;

        let user = fetch_one(
            &conn,
            queries::users::SELECT_FOR_IDENTITY,
            &[&user_id],
            |row| {
                Ok(UserRow {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    role: row.get(2)?,
                    is_private: row.get(3)?,
                    is_active: row.get(4)?,
                })
            },
        )?
        .ok_or_else(|| AppError::Authentication("User not found".to_string()))?;

        if user.is_active == 0 {
            return Err(AppError::Authentication("User is inactive".to_string()));
        }

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            role: user.role,
            is_private: user.is_private != 0,
        })
    }
}

struct UserRow {
    id: i64,
    username: String,
    role: String,
    is_private: i32,
    is_active: i32,
}

// Helper trait for extracting AppState from state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AppState> for AppState {
    fn from_ref(input: &AppState) -> Self {
        input.clone()
    }
}
