//! Live earthquake map: fetch the USGS GeoJSON feed, derive magnitude-styled
//! markers and serve them on a Leaflet page with switchable basemaps and a legend.

pub mod compose;
pub mod constants;
pub mod feed;
pub mod html_template;
pub mod render;
pub mod server;
pub mod settings;
pub mod utils;

use anyhow::Result;

pub use compose::{compose_map, MapView, TileConfig};
pub use feed::{load_feed, FeedDocument};
pub use render::{render_features, Marker};

/// Fetch, render and compose in one pass.
pub async fn build_map_view(
    client: &reqwest::Client,
    feed_source: &str,
    tiles: &TileConfig,
) -> Result<MapView> {
    let document = load_feed(client, feed_source).await?;
    let markers = render_features(&document)?;
    Ok(compose_map(markers, tiles))
}
