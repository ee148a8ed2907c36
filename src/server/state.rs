use std::sync::Arc;

use crate::compose::MapView;

// Composed once at startup, read-only afterwards
#[derive(Clone)]
pub struct AppState {
    pub view: Arc<MapView>,
    pub page: Arc<str>,
}

impl AppState {
    pub fn new(view: MapView) -> anyhow::Result<Self> {
        let page = crate::html_template::render_page(&view)?;
        Ok(Self {
            view: Arc::new(view),
            page: Arc::from(page),
        })
    }
}
