use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{get_legend, get_map_view, get_quakes, health, index_html};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/api/map", get(get_map_view))
        .route("/api/quakes", get(get_quakes))
        .route("/api/legend", get(get_legend))
        .route("/api/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", addr))
}

/// Serves until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose_map, TileConfig};
    use crate::render::{LatLng, MagnitudeColor, Marker};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let marker = Marker {
            position: LatLng { lat: 37.8, lng: -122.4 },
            color: MagnitudeColor::Yellow,
            fill_color: MagnitudeColor::Yellow,
            fill_opacity: 1.0,
            radius: 12.5,
            popup: "<h4>Bay Area</h4>".to_string(),
        };
        let view = compose_map(vec![marker], &TileConfig::new("pk.router"));
        create_app(AppState::new(view).unwrap())
    }

    async fn get_json(uri: &str) -> serde_json::Value {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn index_serves_the_map_page() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("access_token=pk.router"));
    }

    #[tokio::test]
    async fn quakes_endpoint_lists_markers() {
        let quakes = get_json("/api/quakes").await;
        assert_eq!(quakes.as_array().unwrap().len(), 1);
        assert_eq!(quakes[0]["position"]["lat"], 37.8);
        assert_eq!(quakes[0]["color"], "yellow");
    }

    #[tokio::test]
    async fn map_endpoint_reports_default_view() {
        let map = get_json("/api/map").await;
        assert_eq!(map["scroll_wheel_zoom"], false);
        assert_eq!(map["zoom"], 3);
        assert_eq!(map["base_layers"][0]["name"], "Outdoors");
        assert_eq!(map["base_layers"][0]["active"], true);
        assert_eq!(map["legend"]["position"], "bottomright");
    }

    #[tokio::test]
    async fn legend_and_health_endpoints() {
        let legend = get_json("/api/legend").await;
        assert_eq!(legend.as_array().unwrap().len(), 6);
        assert_eq!(legend[5]["label"], "5+");

        let health = get_json("/api/health").await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["markers"], 1);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app()
            .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
