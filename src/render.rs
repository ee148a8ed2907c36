use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MARKER_SCALE;
use crate::feed::{FeedDocument, Feature};

/// CSS color names used for magnitude buckets, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeColor {
    Red,
    Orange,
    Gold,
    Yellow,
    YellowGreen,
    GreenYellow,
}

impl MagnitudeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MagnitudeColor::Red => "red",
            MagnitudeColor::Orange => "orange",
            MagnitudeColor::Gold => "gold",
            MagnitudeColor::Yellow => "yellow",
            MagnitudeColor::YellowGreen => "yellowgreen",
            MagnitudeColor::GreenYellow => "greenyellow",
        }
    }
}

impl fmt::Display for MagnitudeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Evaluated top to bottom, first strict match wins
const COLOR_THRESHOLDS: &[(f64, MagnitudeColor)] = &[
    (5.0, MagnitudeColor::Red),
    (4.0, MagnitudeColor::Orange),
    (3.0, MagnitudeColor::Gold),
    (2.0, MagnitudeColor::Yellow),
    (1.0, MagnitudeColor::YellowGreen),
];

pub fn color_for(magnitude: f64) -> MagnitudeColor {
    COLOR_THRESHOLDS
        .iter()
        .find(|(threshold, _)| magnitude > *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(MagnitudeColor::GreenYellow)
}

/// Linear marker radius. Not clamped: negative magnitudes give a negative radius.
pub fn radius_for(magnitude: f64) -> f64 {
    magnitude * MARKER_SCALE
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

// Structure for a rendered circle marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: LatLng,
    pub color: MagnitudeColor,
    pub fill_color: MagnitudeColor,
    pub fill_opacity: f64,
    pub radius: f64,
    pub popup: String,
}

/// A missing time falls back to the epoch, as `new Date(null)` does in the browser.
pub fn format_event_time(epoch_ms: Option<i64>) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms.unwrap_or(0))
        .map(|t| t.format("%a %b %d %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_magnitude(magnitude: Option<f64>) -> String {
    // f64's Display already prints 5.0 as "5", same as the browser does
    // except for -0, which JS prints as "0"
    match magnitude {
        None => "null".to_string(),
        Some(m) if m == 0.0 => "0".to_string(),
        Some(m) => m.to_string(),
    }
}

pub fn popup_for(feature: &Feature) -> String {
    let props = &feature.properties;
    let place = props.place.as_deref().map(escape_html).unwrap_or_else(|| "null".to_string());
    format!(
        "<h4>{}</h4><hr><h4>Magnitude: {}</h4>@ {}",
        place,
        format_magnitude(props.mag),
        format_event_time(props.time)
    )
}

pub fn render_feature(feature: &Feature) -> Result<Marker> {
    let (lon, lat) = feature.lon_lat()?;
    // A null magnitude behaves like 0 for sizing and coloring
    let magnitude = feature.properties.mag.unwrap_or(0.0);
    let color = color_for(magnitude);

    Ok(Marker {
        position: LatLng { lat, lng: lon },
        color,
        fill_color: color,
        fill_opacity: 1.0,
        radius: radius_for(magnitude),
        popup: popup_for(feature),
    })
}

/// Renders every record in feed order. The first malformed record aborts the whole pass.
pub fn render_features(document: &FeedDocument) -> Result<Vec<Marker>> {
    let markers = document
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let marker = render_feature(feature)
                .with_context(|| format!("Failed to render earthquake record #{}", index))?;
            tracing::debug!(
                "📍 {} at ({}, {}) {} r={}",
                feature.display_id(),
                marker.position.lat,
                marker.position.lng,
                marker.color,
                marker.radius
            );
            Ok(marker)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("🗺️  Rendered {} markers", markers.len());
    Ok(markers)
}
