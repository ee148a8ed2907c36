use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::compose::{LegendEntry, MapView};
use crate::render::Marker;

use super::state::AppState;

pub async fn index_html(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

pub async fn get_map_view(State(state): State<AppState>) -> Json<MapView> {
    Json((*state.view).clone())
}

pub async fn get_quakes(State(state): State<AppState>) -> Response {
    let markers: Vec<Marker> = state.view.markers().to_vec();
    (
        [(header::CACHE_CONTROL, "public, max-age=300")],
        Json(markers),
    )
        .into_response()
}

pub async fn get_legend(State(state): State<AppState>) -> Json<Vec<LegendEntry>> {
    Json(state.view.legend.entries.clone())
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub markers: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        markers: state.view.markers().len(),
    })
}
