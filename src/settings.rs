use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_FEED_URL, DEFAULT_PORT};

#[derive(Debug, Clone)]
pub struct Settings {
    pub feed_url: String,
    pub port: u16,
    pub auto_open_browser: bool,
    pub export_path: Option<PathBuf>,
    pub serve_after_export: bool,
    pub mapbox_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            port: DEFAULT_PORT,
            auto_open_browser: false,
            export_path: None,
            serve_after_export: false,
            mapbox_token: None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim().trim_matches('"');
    (!value.is_empty()).then(|| value.to_string())
}

impl Settings {
    /// Loads `quakemap.ini` (if present) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::config_path())?;
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Settings::default());
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Ok(Self::from_map(&config_map))
    }

    fn from_map(config_map: &HashMap<String, String>) -> Self {
        let mut settings = Settings::default();

        if let Some(feed_url) = config_map.get("feed_url").and_then(|v| non_empty(v)) {
            settings.feed_url = feed_url;
        }
        if let Some(port) = config_map.get("port").and_then(|v| v.parse::<u16>().ok()) {
            settings.port = port;
        }
        if let Some(auto_open) = config_map
            .get("auto_open_browser")
            .and_then(|v| v.parse::<bool>().ok())
        {
            settings.auto_open_browser = auto_open;
        }
        if let Some(export_path) = config_map.get("export_path").and_then(|v| non_empty(v)) {
            settings.export_path = Some(PathBuf::from(export_path));
        }
        if let Some(serve) = config_map
            .get("serve_after_export")
            .and_then(|v| v.parse::<bool>().ok())
        {
            settings.serve_after_export = serve;
        }
        if let Some(token) = config_map.get("mapbox_token").and_then(|v| non_empty(v)) {
            settings.mapbox_token = Some(token);
        }

        settings
    }

    /// Environment wins over the config file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(feed_url) = lookup("QUAKEMAP_FEED_URL").as_deref().and_then(non_empty) {
            self.feed_url = feed_url;
        }
        if let Some(port) = lookup("QUAKEMAP_PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(path) = lookup("QUAKEMAP_EXPORT_PATH").as_deref().and_then(non_empty) {
            self.export_path = Some(PathBuf::from(path));
        }
        if let Some(token) = lookup("MAPBOX_ACCESS_TOKEN").as_deref().and_then(non_empty) {
            self.mapbox_token = Some(token);
        }
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("quakemap.ini");
        path
    }
}
