use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A GeoJSON `FeatureCollection` as published by the USGS summary feeds.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedDocument {
    #[serde(default)]
    pub metadata: Option<FeedMetadata>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub generated: Option<i64>,
    #[serde(default)]
    pub count: Option<usize>,
}

// One earthquake record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    pub geometry: Geometry,
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude]` with an optional trailing depth in km.
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Properties {
    /// Magnitude; the live feed occasionally publishes `null`.
    #[serde(default)]
    pub mag: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    /// Event time in epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
}

impl Feature {
    /// Returns `(longitude, latitude)` in feed order.
    pub fn lon_lat(&self) -> Result<(f64, f64)> {
        let coords = &self.geometry.coordinates;
        if coords.len() < 2 {
            bail!(
                "feature {} has {} coordinate(s), expected [lon, lat]",
                self.display_id(),
                coords.len()
            );
        }
        let (lon, lat) = (coords[0], coords[1]);
        if !lon.is_finite() || !lat.is_finite() {
            bail!("feature {} has non-finite coordinates", self.display_id());
        }
        Ok((lon, lat))
    }

    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<unnamed>")
    }
}

/// Decodes a feed body.
pub fn parse_feed(body: &str) -> Result<FeedDocument> {
    serde_json::from_str(body).context("Failed to decode GeoJSON feed")
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads the feed once from `source`.
///
/// HTTP(S) sources are fetched with a single GET, anything else is read as a
/// local file path. There is no retry and no timeout.
pub async fn load_feed(client: &reqwest::Client, source: &str) -> Result<FeedDocument> {
    let started = std::time::Instant::now();

    let document = if is_remote(source) {
        tracing::info!("🌐 Fetching earthquake feed: {}", source);
        let response = client
            .get(source)
            .send()
            .await
            .with_context(|| format!("Failed to request feed {}", source))?
            .error_for_status()
            .with_context(|| format!("Feed server rejected request for {}", source))?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read feed body from {}", source))?;
        parse_feed(&body)?
    } else {
        tracing::info!("📂 Reading earthquake feed from file: {}", source);
        let body = tokio::fs::read_to_string(Path::new(source))
            .await
            .with_context(|| format!("Failed to read feed file {}", source))?;
        parse_feed(&body)?
    };

    tracing::info!(
        "✅ Loaded {} earthquake records in {:?}",
        document.features.len(),
        started.elapsed()
    );
    Ok(document)
}
