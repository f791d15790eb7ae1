use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
///
/// The LLM credential is deliberately optional: analysis endpoints degrade to
/// fallback results when it is absent instead of refusing to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub groq_api_key: Option<String>,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub admin_alert_email: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            groq_api_key: optional_env("GROQ_API_KEY"),
            mail_api_url: optional_env("MAIL_API_URL"),
            mail_api_key: optional_env("MAIL_API_KEY"),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@truthhire.app".to_string()),
            admin_alert_email: optional_env("ADMIN_ALERT_EMAIL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
