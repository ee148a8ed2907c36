// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Feed source
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

// Initial view: geographic center of the contiguous US
pub const MAP_CENTER: [f64; 2] = [39.8283, -98.5785];
pub const MAP_ZOOM: u8 = 3;

// Marker radius multiplier (radius = magnitude * MARKER_SCALE)
pub const MARKER_SCALE: f64 = 5.0;

// Tile provider
pub const TILE_URL_BASE: &str = "https://api.mapbox.com/styles/v1/mapbox";
pub const TILE_SIZE: u16 = 256;
pub const TILE_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, Imagery &copy; <a href=\"https://www.mapbox.com/\">Mapbox</a>";

// Layer names as shown in the layer switcher
pub const OUTDOORS_LAYER: &str = "Outdoors";
pub const SATELLITE_LAYER: &str = "Satellite";
pub const DARK_LAYER: &str = "Dark Map";
pub const EARTHQUAKE_OVERLAY: &str = "Earthquakes";

// DOM id the page mounts the map into
pub const MAP_CONTAINER_ID: &str = "map";
