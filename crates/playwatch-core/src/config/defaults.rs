//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Playwatch".to_string()
}

pub fn default_data_dir() -> String {
    "~/.playwatch".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_webhook_listen() -> String {
    "0.0.0.0:8443".to_string()
}

pub fn default_webhook_path() -> String {
    "/telegram/webhook".to_string()
}

pub fn default_steam_base_url() -> String {
    "https://api.steampowered.com".to_string()
}

pub fn default_ubisoft_base_url() -> String {
    "https://game-status-api.ubisoft.com/v1".to_string()
}

pub fn default_tick_interval() -> u64 {
    60
}

pub fn default_health_min_interval() -> u64 {
    300
}

pub fn default_request_timeout() -> u64 {
    10
}
