use serde::{Deserialize, Serialize};

/// Geographic bounding box, decimal degrees. `north > south`, `east > west`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Viewport {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Wire request for `/map/pins`. Bounds are optional so that missing
/// parameters produce the dedicated 400 message instead of a decode error.
#[derive(Debug, Deserialize)]
pub struct MapPinsRequest {
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
    pub zoom: Option<u8>,
    pub include_network: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    Spot,
    WantToGo,
    Network,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPin {
    pub place_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub pin_type: PinType,
    /// Number of network spots at this place. Stays 0 when followed users
    /// have no spot here, including on the user's own pins.
    pub spot_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCluster {
    pub latitude: f64,
    pub longitude: f64,
    pub count: i64,
}

/// Pins and clusters are disjoint: a place either appears as a standalone
/// pin or is absorbed into a cluster, never both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapPinsResponse {
    pub pins: Vec<MapPin>,
    pub clusters: Vec<MapCluster>,
}
