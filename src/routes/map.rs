use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{AppState, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::map::{get_map_pins, MapPinsOptions, SqlitePinSource};
use crate::models::{MapPinsRequest, MapPinsResponse, Viewport};

pub fn router() -> Router<AppState> {
    Router::new().route("/map/pins", post(get_pins))
}

fn validate_viewport(request: &MapPinsRequest) -> AppResult<Viewport> {
    let (north, south, east, west) = match (
        request.north,
        request.south,
        request.east,
        request.west,
    ) {
        (Some(n), Some(s), Some(e), Some(w)) => (n, s, e, w),
        _ => {
            return Err(AppError::BadRequest(
                "Viewport parameters (north, south, east, west) are required".to_string(),
            ))
        }
    };

    if north <= south {
        return Err(AppError::BadRequest(
            "North must be greater than south".to_string(),
        ));
    }

    if east <= west {
        return Err(AppError::BadRequest(
            "East must be greater than west".to_string(),
        ));
    }

    let latitudes_valid = (-90.0..=90.0).contains(&north) && (-90.0..=90.0).contains(&south);
    let longitudes_valid = (-180.0..=180.0).contains(&east) && (-180.0..=180.0).contains(&west);
    if !latitudes_valid || !longitudes_valid {
        return Err(AppError::BadRequest(
            "Invalid viewport coordinates".to_string(),
        ));
    }

    Ok(Viewport {
        north,
        south,
        east,
        west,
    })
}

async fn get_pins(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<MapPinsRequest>,
) -> AppResult<Json<MapPinsResponse>> {
    let viewport = validate_viewport(&request)?;
    let options = MapPinsOptions {
        zoom: request.zoom,
        include_network: request.include_network.unwrap_or(true),
    };

    let conn = state.pool.get().map_err(AppError::Pool)?;
    let source = SqlitePinSource::new(&conn);

    let response = get_map_pins(
        &source,
        state.cache.as_ref(),
        current_user.id,
        &viewport,
        &options,
    )?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(north: f64, south: f64, east: f64, west: f64) -> MapPinsRequest {
        MapPinsRequest {
            north: Some(north),
            south: Some(south),
            east: Some(east),
            west: Some(west),
            zoom: None,
            include_network: None,
        }
    }

    fn message(result: AppResult<Viewport>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_validate_viewport_ok() {
        let viewport = validate_viewport(&request(40.8, 40.7, -73.9, -74.0)).unwrap();
        assert_eq!(viewport.north, 40.8);
        assert_eq!(viewport.west, -74.0);
    }

    #[test]
    fn test_validate_viewport_requires_all_bounds() {
        let mut req = request(40.8, 40.7, -73.9, -74.0);
        req.west = None;
        assert_eq!(
            message(validate_viewport(&req)),
            "Viewport parameters (north, south, east, west) are required"
        );
    }

    #[test]
    fn test_validate_viewport_rejects_inverted_latitudes() {
        assert_eq!(
            message(validate_viewport(&request(40.7, 40.8, -73.9, -74.0))),
            "North must be greater than south"
        );
    }

    #[test]
    fn test_validate_viewport_rejects_inverted_longitudes() {
        assert_eq!(
            message(validate_viewport(&request(40.8, 40.7, -74.0, -73.9))),
            "East must be greater than west"
        );
    }

    #[test]
    fn test_validate_viewport_rejects_out_of_range_coordinates() {
        assert_eq!(
            message(validate_viewport(&request(91.0, 40.7, -73.9, -74.0))),
            "Invalid viewport coordinates"
        );
    }
}
