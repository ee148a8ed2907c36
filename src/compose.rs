use serde::{Deserialize, Serialize};

use crate::constants::{
    DARK_LAYER, EARTHQUAKE_OVERLAY, MAP_CENTER, MAP_CONTAINER_ID, MAP_ZOOM, OUTDOORS_LAYER,
    SATELLITE_LAYER, TILE_ATTRIBUTION, TILE_SIZE, TILE_URL_BASE,
};
use crate::render::{color_for, LatLng, MagnitudeColor, Marker};

/// Tile provider access, supplied from settings.
#[derive(Debug, Clone, Default)]
pub struct TileConfig {
    pub access_token: String,
}

impl TileConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Leaflet URL template for a Mapbox style; `{z}/{x}/{y}` are left for the browser.
    pub fn url_template(&self, style_id: &str) -> String {
        format!(
            "{}/{}/tiles/{}/{{z}}/{{x}}/{{y}}?access_token={}",
            TILE_URL_BASE, style_id, TILE_SIZE, self.access_token
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayer {
    pub name: String,
    pub style_id: String,
    pub url_template: String,
    pub attribution: String,
    pub tile_size: u16,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayer {
    pub name: String,
    pub active: bool,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerControl {
    pub collapsed: bool,
    pub position: ControlPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: MagnitudeColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub position: ControlPosition,
    pub entries: Vec<LegendEntry>,
}

// Lower bounds of the legend buckets
const LEGEND_GRADES: [u8; 6] = [0, 1, 2, 3, 4, 5];

/// Fixed magnitude legend, independent of the fetched data.
///
/// Each bucket is colored with `color_for(lower + 1)`. With strict thresholds
/// that paints a bucket with the color of its own upper bound, e.g. "1-2" is
/// `color_for(2.0)` = yellowgreen.
pub fn legend() -> Legend {
    let entries = LEGEND_GRADES
        .iter()
        .enumerate()
        .map(|(i, &grade)| {
            let label = match LEGEND_GRADES.get(i + 1) {
                Some(next) => format!("{}-{}", grade, next),
                None => format!("{}+", grade),
            };
            LegendEntry {
                label,
                color: color_for(f64::from(grade) + 1.0),
            }
        })
        .collect();

    Legend {
        position: ControlPosition::BottomRight,
        entries,
    }
}

impl Legend {
    /// Inner HTML of the `info legend` control.
    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let label = entry.label.replace('-', "&ndash;");
                let line_break = if entry.label.ends_with('+') { "" } else { "<br>" };
                format!(
                    "<i style=\"background:{}\"></i> {}{}",
                    entry.color, label, line_break
                )
            })
            .collect()
    }
}

/// Everything the page needs to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub container_id: String,
    pub center: LatLng,
    pub zoom: u8,
    pub scroll_wheel_zoom: bool,
    pub base_layers: Vec<BaseLayer>,
    pub overlays: Vec<OverlayLayer>,
    pub layer_control: LayerControl,
    pub legend: Legend,
}

impl MapView {
    /// Names of the layers switched on when the page loads.
    pub fn active_layers(&self) -> Vec<&str> {
        self.base_layers
            .iter()
            .filter(|l| l.active)
            .map(|l| l.name.as_str())
            .chain(
                self.overlays
                    .iter()
                    .filter(|o| o.active)
                    .map(|o| o.name.as_str()),
            )
            .collect()
    }

    pub fn markers(&self) -> &[Marker] {
        self.overlays
            .iter()
            .find(|o| o.name == EARTHQUAKE_OVERLAY)
            .map(|o| o.markers.as_slice())
            .unwrap_or(&[])
    }
}

pub fn base_layers(tiles: &TileConfig) -> Vec<BaseLayer> {
    [
        (OUTDOORS_LAYER, "outdoors-v10", true),
        (SATELLITE_LAYER, "satellite-v9", false),
        (DARK_LAYER, "dark-v9", false),
    ]
    .into_iter()
    .map(|(name, style_id, active)| BaseLayer {
        name: name.to_string(),
        style_id: style_id.to_string(),
        url_template: tiles.url_template(style_id),
        attribution: TILE_ATTRIBUTION.to_string(),
        tile_size: TILE_SIZE,
        active,
    })
    .collect()
}

pub fn compose_map(markers: Vec<Marker>, tiles: &TileConfig) -> MapView {
    MapView {
        container_id: MAP_CONTAINER_ID.to_string(),
        center: LatLng {
            lat: MAP_CENTER[0],
            lng: MAP_CENTER[1],
        },
        zoom: MAP_ZOOM,
        scroll_wheel_zoom: false,
        base_layers: base_layers(tiles),
        overlays: vec![OverlayLayer {
            name: EARTHQUAKE_OVERLAY.to_string(),
            active: true,
            markers,
        }],
        layer_control: LayerControl {
            collapsed: true,
            position: ControlPosition::TopRight,
        },
        legend: legend(),
    }
}
