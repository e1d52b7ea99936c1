use std::path::PathBuf;

use crate::models::Settings;

const ENV_API_KEY: &str = "OPENAI_API_KEY";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

pub fn api_key_from_env() -> Option<String> {
    std::env::var(ENV_API_KEY)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn apply_env_defaults(settings: &mut Settings) {
    if settings.ai.api_key.trim().is_empty() {
        settings.ai.api_key = api_key_from_env().unwrap_or_default();
    }
}

pub fn data_dir() -> PathBuf {
    std::env::var("MIND_HAVEN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

pub fn server_addr() -> String {
    let host = std::env::var("MIND_HAVEN_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("MIND_HAVEN_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    format!("{}:{}", host, port)
}
