mod feed;
mod follows;
mod map;
mod places;
mod playlists;
mod spots;
mod want_to_go;

use crate::auth::AppState;
use axum::Router;

pub use feed::spawn_feed_fanout;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(map::router())
        .merge(places::router())
        .merge(spots::router())
        .merge(want_to_go::router())
        .merge(follows::router())
        .merge(playlists::router())
        .merge(feed::router())
}
