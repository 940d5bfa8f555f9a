use std::{collections::HashMap, fs};

#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog_url: String,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: "http://127.0.0.1:8000".into(),
            page_size: client_core::DEFAULT_PAGE_SIZE,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("desktop.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("CATALOG_URL") {
        settings.catalog_url = v;
    }
    if let Ok(v) = std::env::var("APP__CATALOG_URL") {
        settings.catalog_url = v;
    }

    if let Ok(v) = std::env::var("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.page_size = parsed;
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("catalog_url") {
            settings.catalog_url = v.clone();
        }
        if let Some(v) = file_cfg.get("page_size") {
            if let Ok(parsed) = v.parse::<u32>() {
                settings.page_size = parsed;
            }
        }
    }
}
