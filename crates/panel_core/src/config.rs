use std::{collections::HashMap, fs};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Channel,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub transport: Transport,
    pub action_endpoint: String,
    pub query_parameter: String,
    pub refresh_worksheet: Option<String>,
    pub refresh_data_source: Option<String>,
    pub request_timeout_seconds: u64,
    pub cycle_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transport: Transport::Channel,
            action_endpoint: "http://127.0.0.1:5000".into(),
            query_parameter: "Query".into(),
            refresh_worksheet: None,
            refresh_data_source: None,
            request_timeout_seconds: 10,
            cycle_timeout_seconds: 30,
        }
    }
}

impl Settings {
    /// The refresh step runs only when both names are configured. A partial
    /// pair is disabled with a warning rather than failing every cycle.
    pub fn refresh_target(&self) -> Option<(String, String)> {
        match (&self.refresh_worksheet, &self.refresh_data_source) {
            (Some(worksheet), Some(data_source)) => {
                Some((worksheet.clone(), data_source.clone()))
            }
            (None, None) => None,
            _ => {
                warn!(
                    "config: refresh requires both worksheet and data source names; \
                     refresh step disabled"
                );
                None
            }
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("panel.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_config(&mut settings, &file_cfg);
        }
    }

    apply_env_overrides(&mut settings);
    settings
}

pub fn parse_transport(raw: &str) -> Option<Transport> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "channel" => Some(Transport::Channel),
        "http" => Some(Transport::Http),
        _ => None,
    }
}

fn apply_file_config(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("transport") {
        if let Some(transport) = parse_transport(v) {
            settings.transport = transport;
        }
    }
    if let Some(v) = file_cfg.get("action_endpoint") {
        settings.action_endpoint = v.clone();
    }
    if let Some(v) = file_cfg.get("query_parameter") {
        settings.query_parameter = v.clone();
    }
    if let Some(v) = file_cfg.get("refresh_worksheet") {
        settings.refresh_worksheet = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("refresh_data_source") {
        settings.refresh_data_source = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("request_timeout_seconds") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }
    if let Some(v) = file_cfg.get("cycle_timeout_seconds") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.cycle_timeout_seconds = parsed;
        }
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(v) = std::env::var("PANEL__TRANSPORT") {
        if let Some(transport) = parse_transport(&v) {
            settings.transport = transport;
        }
    }
    if let Ok(v) = std::env::var("PANEL__ACTION_ENDPOINT") {
        settings.action_endpoint = v;
    }
    if let Ok(v) = std::env::var("PANEL__QUERY_PARAMETER") {
        settings.query_parameter = v;
    }
    if let Ok(v) = std::env::var("PANEL__REFRESH_WORKSHEET") {
        settings.refresh_worksheet = Some(v);
    }
    if let Ok(v) = std::env::var("PANEL__REFRESH_DATA_SOURCE") {
        settings.refresh_data_source = Some(v);
    }
    if let Ok(v) = std::env::var("PANEL__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }
    if let Ok(v) = std::env::var("PANEL__CYCLE_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.cycle_timeout_seconds = parsed;
        }
    }
}
