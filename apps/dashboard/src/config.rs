use std::{collections::HashMap, fs};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub database_url: String,
    pub insight_endpoint: String,
    pub insight_model: String,
    pub insight_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            database_url: "sqlite://./data/dashboard.db".into(),
            insight_endpoint: "http://127.0.0.1:8080/summarize".into(),
            insight_model: "gemini-2.5-flash".into(),
            insight_api_key: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("dashboard.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_overrides(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Ok(v) = std::env::var("INSIGHT_ENDPOINT") {
        settings.insight_endpoint = v;
    }
    if let Ok(v) = std::env::var("APP__INSIGHT_ENDPOINT") {
        settings.insight_endpoint = v;
    }

    if let Ok(v) = std::env::var("INSIGHT_MODEL") {
        settings.insight_model = v;
    }
    if let Ok(v) = std::env::var("APP__INSIGHT_MODEL") {
        settings.insight_model = v;
    }

    if let Ok(v) = std::env::var("API_KEY") {
        settings.insight_api_key = Some(v);
    }
    if let Ok(v) = std::env::var("INSIGHT_API_KEY") {
        settings.insight_api_key = Some(v);
    }
    if let Ok(v) = std::env::var("APP__INSIGHT_API_KEY") {
        settings.insight_api_key = Some(v);
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("insight_endpoint") {
        settings.insight_endpoint = v.clone();
    }
    if let Some(v) = file_cfg.get("insight_model") {
        settings.insight_model = v.clone();
    }
    if let Some(v) = file_cfg.get("insight_api_key") {
        settings.insight_api_key = Some(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_insight_credential_unset() {
        let settings = Settings::default();
        assert!(settings.insight_api_key.is_none());
        assert!(settings.database_url.starts_with("sqlite://"));
    }

    #[test]
    fn file_overrides_replace_only_named_keys() {
        let mut settings = Settings::default();
        let mut file_cfg = HashMap::new();
        file_cfg.insert("server_url".to_string(), "http://example.test".to_string());
        file_cfg.insert("insight_api_key".to_string(), "key-123".to_string());

        apply_file_overrides(&mut settings, &file_cfg);

        assert_eq!(settings.server_url, "http://example.test");
        assert_eq!(settings.insight_api_key.as_deref(), Some("key-123"));
        assert_eq!(settings.database_url, Settings::default().database_url);
    }

    #[test]
    fn aliased_env_var_overrides_insight_model() {
        std::env::set_var("APP__INSIGHT_MODEL", "summarizer-test");
        let settings = load_settings();
        std::env::remove_var("APP__INSIGHT_MODEL");

        assert_eq!(settings.insight_model, "summarizer-test");
    }

    #[test]
    fn unknown_file_keys_are_ignored() {
        let mut settings = Settings::default();
        let mut file_cfg = HashMap::new();
        file_cfg.insert("not_a_setting".to_string(), "value".to_string());

        apply_file_overrides(&mut settings, &file_cfg);

        assert_eq!(settings.server_url, Settings::default().server_url);
    }
}
