use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Optional relay endpoint for submission notifications. Unset means
    /// notifications are dropped on the floor.
    pub notify_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            db_path: PathBuf::from("pulse.db"),
            log_level: "info".to_string(),
            notify_url: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("PULSE_PORT") {
            if let Ok(n) = v.parse() {
                cfg.port = n;
            }
        }
        if let Ok(v) = env::var("PULSE_DB") {
            if !v.is_empty() {
                cfg.db_path = PathBuf::from(v);
            }
        }
        if let Ok(v) = env::var("PULSE_LOG") {
            cfg.log_level = v;
        }
        if let Ok(v) = env::var("PULSE_NOTIFY_URL") {
            if !v.is_empty() {
                cfg.notify_url = Some(v);
            }
        }
        cfg
    }
}
