use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at start-up from the environment
/// (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub app_name: String,
    pub store_path: PathBuf,
    pub allow_self_validation: bool,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            session_key: env::var("SESSION_KEY").ok(),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "Customisation Database".to_string()),
            store_path: env::var("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("store")),
            allow_self_validation: env::var("ALLOW_SELF_VALIDATION")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
        })
    }

    /// Configuration for tests and tooling that never touch a database.
    pub fn for_tests(store_path: impl Into<PathBuf>) -> Self {
        Self {
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".to_string(),
            session_key: None,
            app_name: "Customisation Database".to_string(),
            store_path: store_path.into(),
            allow_self_validation: false,
            db_max_connections: 1,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
