use anyhow::{Context, Result};
use rust_embed::RustEmbed;

use crate::compose::MapView;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

fn asset(name: &str) -> Result<String> {
    let file = Asset::get(name).with_context(|| format!("Missing embedded asset {}", name))?;
    String::from_utf8(file.data.into_owned())
        .with_context(|| format!("Embedded asset {} is not UTF-8", name))
}

// Keeps embedded JSON from closing the surrounding <script> element
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

/// Renders the self-contained Leaflet page for `view`.
///
/// Styles, the drawing script and the composed view are all inlined, so the
/// result works both when served and when saved to disk.
pub fn render_page(view: &MapView) -> Result<String> {
    let template = asset("index.html")?;
    let style = asset("style.css")?;
    let script = asset("quakemap.js")?;

    let view_json = serde_json::to_string(view).context("Failed to serialize map view")?;
    let legend_json =
        serde_json::to_string(&view.legend.to_html()).context("Failed to serialize legend")?;

    // Feed text lives only in the view JSON, so it goes in last
    Ok(template
        .replace("<!-- STYLE_PLACEHOLDER -->", &style)
        .replace("<!-- SCRIPT_PLACEHOLDER -->", &script)
        .replace("<!-- CONTAINER_PLACEHOLDER -->", &view.container_id)
        .replace("/* LEGEND_PLACEHOLDER */", &script_safe(legend_json))
        .replace("/* MAP_VIEW_PLACEHOLDER */", &script_safe(view_json)))
}

/// Writes the standalone page to `path`, creating parent directories.
pub async fn export_page(view: &MapView, path: &std::path::Path) -> Result<()> {
    let page = render_page(view)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .context("Creating export directory")?;
    }
    tokio::fs::write(path, page)
        .await
        .with_context(|| format!("Failed to write map page to {}", path.display()))?;
    tracing::info!("💾 Map page exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose_map, TileConfig};
    use crate::render::{LatLng, MagnitudeColor, Marker};

    fn sample_view() -> MapView {
        let marker = Marker {
            position: LatLng { lat: 40.0, lng: -100.0 },
            color: MagnitudeColor::Orange,
            fill_color: MagnitudeColor::Orange,
            fill_opacity: 1.0,
            radius: 22.5,
            popup: "<h4>Nowhere</h4></script><script>alert(1)".to_string(),
        };
        compose_map(vec![marker], &TileConfig::new("pk.page"))
    }

    #[test]
    fn page_inlines_assets_and_view() {
        let page = render_page(&sample_view()).unwrap();
        assert!(!page.contains("PLACEHOLDER"));
        assert!(page.contains("<div id=\"map\"></div>"));
        assert!(page.contains("leaflet@1.9.4/dist/leaflet.js"));
        assert!(page.contains("L.control.layers"));
        assert!(page.contains(".legend i"));
        assert!(page.contains("\"scroll_wheel_zoom\":false"));
        assert!(page.contains("access_token=pk.page"));
        assert!(page.contains("\"radius\":22.5"));
    }

    #[test]
    fn embedded_json_cannot_close_the_script_tag() {
        let page = render_page(&sample_view()).unwrap();
        assert!(!page.contains("</script><script>alert(1)"));
        assert!(page.contains("<\\/script><script>alert(1)"));
    }

    #[test]
    fn legend_markup_is_embedded() {
        let page = render_page(&sample_view()).unwrap();
        assert!(page.contains("0&ndash;1<br>"));
    }

    fn embedded_view(page: &str) -> serde_json::Value {
        let (_, rest) = page.split_once("const MAP_VIEW = ").unwrap();
        let (json, _) = rest.split_once(";\n").unwrap();
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn feed_text_resembling_placeholders_stays_inside_the_view() {
        let mut view = sample_view();
        let popup = "<h4>/* LEGEND_PLACEHOLDER */ <!-- SCRIPT_PLACEHOLDER --></h4>".to_string();
        view.overlays[0].markers[0].popup = popup.clone();

        let page = render_page(&view).unwrap();
        let embedded = embedded_view(&page);
        assert_eq!(embedded["overlays"][0]["markers"][0]["popup"], popup.as_str());
        assert_eq!(page.matches("L.control.layers").count(), 1);
    }

    #[tokio::test]
    async fn export_writes_standalone_file() {
        let dir = std::env::temp_dir().join(format!("quakemap-export-{}", std::process::id()));
        let path = dir.join("nested").join("map.html");
        export_page(&sample_view(), &path).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
