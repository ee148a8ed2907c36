use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use quakemap::compose::TileConfig;
use quakemap::server::{self, AppState};
use quakemap::settings::Settings;
use quakemap::{build_map_view, html_template, utils};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quakemap=info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    tracing::info!("🌋 QuakeMap v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("Failed to load settings")?;
    tracing::info!("⚙️  Config: {}", Settings::config_path().display());

    let token = settings.mapbox_token.clone().unwrap_or_else(|| {
        tracing::warn!("⚠️  No Mapbox token configured (set MAPBOX_ACCESS_TOKEN); basemap tiles will not load");
        String::new()
    });
    let tiles = TileConfig::new(token);

    let client = reqwest::Client::builder()
        .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let view = build_map_view(&client, &settings.feed_url, &tiles).await?;

    if let Some(ref export_path) = settings.export_path {
        html_template::export_page(&view, export_path).await?;
        if !settings.serve_after_export {
            return Ok(());
        }
    }

    let state = AppState::new(view)?;
    let listener = server::bind(settings.port).await?;
    let url = utils::local_url(settings.port);
    tracing::info!("✅ HTTP server started successfully at {}", url);

    if settings.auto_open_browser {
        if let Err(e) = utils::open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    server::serve(listener, state).await
}
