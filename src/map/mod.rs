//! Viewport pin aggregation for the map screen.
//!
//! Fetches the user's own spots, their want-to-go list and (optionally) the
//! spots of followed users within a bounding box, merges them into one pin
//! per place, and collapses pins into grid clusters at low zoom levels.
//! Results are cached for five minutes under a key derived from the rounded
//! viewport bounds.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::cache::ObjectCache;
use crate::constants::{CLUSTER_ZOOM_THRESHOLD, MAP_PINS_CACHE_TTL_SECS};
use crate::database::{fetch_all, queries, DbConn};
use crate::error::AppResult;
use crate::models::{MapCluster, MapPin, MapPinsResponse, PinType, Viewport};

#[derive(Debug, Clone, Copy)]
pub struct MapPinsOptions {
    pub zoom: Option<u8>,
    pub include_network: bool,
}

impl Default for MapPinsOptions {
    fn default() -> Self {
        Self {
            zoom: None,
            include_network: true,
        }
    }
}

/// A place with coordinates, as returned by the bounding-box queries.
#[derive(Debug, Clone)]
pub struct PlacePoint {
    pub place_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Data-store seam for the aggregator. Implemented over SQLite in
/// production and mocked in tests.
pub trait PinSource {
    fn own_spots(&self, user_id: i64, viewport: &Viewport) -> AppResult<Vec<PlacePoint>>;
    fn own_want_to_go(&self, user_id: i64, viewport: &Viewport) -> AppResult<Vec<PlacePoint>>;
    fn followed_user_ids(&self, user_id: i64) -> AppResult<Vec<i64>>;
    fn network_spots(&self, followee_ids: &[i64], viewport: &Viewport)
        -> AppResult<Vec<PlacePoint>>;
}

pub struct SqlitePinSource<'a> {
    conn: &'a DbConn,
}

impl<'a> SqlitePinSource<'a> {
    pub fn new(conn: &'a DbConn) -> Self {
        Self { conn }
    }
}

fn map_place_point(row: &rusqlite::Row) -> rusqlite::Result<PlacePoint> {
    Ok(PlacePoint {
        place_id: row.get(0)?,
        latitude: row.get(1)?,
        longitude: row.get(2)?,
    })
}

impl PinSource for SqlitePinSource<'_> {
    fn own_spots(&self, user_id: i64, viewport: &Viewport) -> AppResult<Vec<PlacePoint>> {
        fetch_all(
            self.conn,
            queries::map::SELECT_OWN_SPOTS_IN_BBOX,
            &[
                &user_id,
                &viewport.south,
                &viewport.north,
                &viewport.west,
                &viewport.east,
            ],
            map_place_point,
        )
    }

    fn own_want_to_go(&self, user_id: i64, viewport: &Viewport) -> AppResult<Vec<PlacePoint>> {
        fetch_all(
            self.conn,
            queries::map::SELECT_OWN_WANT_TO_GO_IN_BBOX,
            &[
                &user_id,
                &viewport.south,
                &viewport.north,
                &viewport.west,
                &viewport.east,
            ],
            map_place_point,
        )
    }

    fn followed_user_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        fetch_all(
            self.conn,
            queries::map::SELECT_ACTIVE_FOLLOWEE_IDS,
            &[&user_id],
            |row| row.get(0),
        )
    }

    fn network_spots(
        &self,
        followee_ids: &[i64],
        viewport: &Viewport,
    ) -> AppResult<Vec<PlacePoint>> {
        if followee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; followee_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT s.place_id
                 , p.latitude
                 , p.longitude
              FROM spots AS s
              JOIN places AS p ON s.place_id = p.id
             WHERE s.user_id IN ({placeholders})
               AND p.latitude BETWEEN ? AND ?
               AND p.longitude BETWEEN ? AND ?
            "#
        );

        let mut params: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(followee_ids.len() + 4);
        for id in followee_ids {
            params.push(id);
        }
        params.push(&viewport.south);
        params.push(&viewport.north);
        params.push(&viewport.west);
        params.push(&viewport.east);

        fetch_all(self.conn, &sql, &params, map_place_point)
    }
}

/// Round to 6 decimal places, half away from zero. ~0.11 m at the equator;
/// viewports that differ only below that share a cache entry.
fn round_coord(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

pub fn cache_key(viewport: &Viewport, user_id: Option<i64>, include_network: bool) -> String {
    let user = user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "anonymous".to_string());
    let scope = if include_network { "network" } else { "own" };

    format!(
        "map_pins:{:.6}:{:.6}:{:.6}:{:.6}:{}:{}",
        round_coord(viewport.north),
        round_coord(viewport.south),
        round_coord(viewport.east),
        round_coord(viewport.west),
        user,
        scope
    )
}

/// Cache-first map-pin aggregation.
///
/// A cache hit short-circuits every data-store query. On a miss the computed
/// response is stored unconditionally, empty results included. Cache
/// problems (unavailable backend, undecodable entry) degrade to a miss;
/// data-store errors propagate unmodified.
pub fn get_map_pins(
    source: &dyn PinSource,
    cache: &dyn ObjectCache,
    user_id: i64,
    viewport: &Viewport,
    options: &MapPinsOptions,
) -> AppResult<MapPinsResponse> {
    let key = cache_key(viewport, Some(user_id), options.include_network);

    if let Some(raw) = cache.get(&key) {
        match serde_json::from_str::<MapPinsResponse>(&raw) {
            Ok(cached) => return Ok(cached),
            Err(e) => {
                tracing::warn!("discarding undecodable cache entry {}: {}", key, e);
            }
        }
    }

    let own_spots = source.own_spots(user_id, viewport)?;
    let own_want_to_go = source.own_want_to_go(user_id, viewport)?;

    let network = if options.include_network {
        let followees = source.followed_user_ids(user_id)?;
        if followees.is_empty() {
            Vec::new()
        } else {
            source.network_spots(&followees, viewport)?
        }
    } else {
        Vec::new()
    };

    let pins = merge_pins(&own_spots, &own_want_to_go, &network);

    let response = match options.zoom {
        Some(zoom) if zoom < CLUSTER_ZOOM_THRESHOLD => cluster_pins(pins, zoom),
        _ => MapPinsResponse {
            pins,
            clusters: Vec::new(),
        },
    };

    match serde_json::to_string(&response) {
        Ok(blob) => cache.set(&key, blob, Duration::from_secs(MAP_PINS_CACHE_TTL_SECS)),
        Err(e) => tracing::warn!("failed to serialize map pins for cache: {}", e),
    }

    Ok(response)
}

/// One pin per place, priority own spot > own want-to-go > network.
/// `spot_count` carries the network-spot tally for the place regardless of
/// the winning pin type.
fn merge_pins(
    own_spots: &[PlacePoint],
    own_want_to_go: &[PlacePoint],
    network: &[PlacePoint],
) -> Vec<MapPin> {
    let mut pins: Vec<MapPin> = Vec::new();
    let mut by_place: HashMap<i64, usize> = HashMap::new();

    for point in own_spots {
        if by_place.contains_key(&point.place_id) {
            continue;
        }
        by_place.insert(point.place_id, pins.len());
        pins.push(MapPin {
            place_id: point.place_id,
            latitude: point.latitude,
            longitude: point.longitude,
            pin_type: PinType::Spot,
            spot_count: 0,
        });
    }

    for point in own_want_to_go {
        if by_place.contains_key(&point.place_id) {
            continue;
        }
        by_place.insert(point.place_id, pins.len());
        pins.push(MapPin {
            place_id: point.place_id,
            latitude: point.latitude,
            longitude: point.longitude,
            pin_type: PinType::WantToGo,
            spot_count: 0,
        });
    }

    let mut network_counts: HashMap<i64, i64> = HashMap::new();
    for point in network {
        *network_counts.entry(point.place_id).or_insert(0) += 1;
    }

    for point in network {
        if by_place.contains_key(&point.place_id) {
            continue;
        }
        by_place.insert(point.place_id, pins.len());
        pins.push(MapPin {
            place_id: point.place_id,
            latitude: point.latitude,
            longitude: point.longitude,
            pin_type: PinType::Network,
            spot_count: 0,
        });
    }

    for pin in &mut pins {
        pin.spot_count = network_counts.get(&pin.place_id).copied().unwrap_or(0);
    }

    pins
}

/// Equal-degree grid clustering. The cell size is 360 / 2^zoom on both axes;
/// latitude compression is deliberately not corrected for.
fn cluster_pins(pins: Vec<MapPin>, zoom: u8) -> MapPinsResponse {
    let cell_size = 360.0 / f64::powi(2.0, i32::from(zoom));

    let mut cells: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
    for (index, pin) in pins.iter().enumerate() {
        let cell_x = (pin.longitude / cell_size).floor() as i64;
        let cell_y = (pin.latitude / cell_size).floor() as i64;
        cells.entry((cell_x, cell_y)).or_default().push(index);
    }

    let mut keep = vec![true; pins.len()];
    let mut clusters = Vec::new();

    for members in cells.values() {
        if members.len() < 2 {
            continue;
        }
        let count = members.len() as i64;
        let latitude = members.iter().map(|&i| pins[i].latitude).sum::<f64>() / count as f64;
        let longitude = members.iter().map(|&i| pins[i].longitude).sum::<f64>() / count as f64;
        clusters.push(MapCluster {
            latitude,
            longitude,
            count,
        });
        for &i in members {
            keep[i] = false;
        }
    }

    let pins = pins
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep[*i])
        .map(|(_, pin)| pin)
        .collect();

    MapPinsResponse { pins, clusters }
}
