mod analysis;
mod auth;
mod cache;
mod config;
mod db;
mod email;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod sanitize;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::gap::GapAnalysisEngine;
use crate::analysis::trust::TrustScorer;
use crate::auth::otp::InMemoryOtpStore;
use crate::cache::InMemoryResultCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::email::{HttpMailer, Mailer, NoopMailer};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

/// Default `RUST_LOG`-style directive covering this crate's own modules.
/// Log targets use the underscored crate name, not the hyphenated package
/// name, so the target here must stay underscored.
fn default_filter_directive(level: &str) -> String {
    format!("truthhire_api={level}")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter_directive(&config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TruthHire API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client — optional by design: analysis endpoints degrade
    // to fallback results when no credential is configured.
    let llm = match &config.groq_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(LlmClient::new(key.clone()))
        }
        None => {
            warn!("GROQ_API_KEY not set — analysis endpoints will return fallback results");
            None
        }
    };

    // Analysis engines share the LLM client; the gap engine owns the cache.
    let result_cache = Arc::new(InMemoryResultCache::with_defaults());
    let gap_engine = Arc::new(GapAnalysisEngine::new(llm.clone(), result_cache));
    let trust_scorer = Arc::new(TrustScorer::new(llm));

    // Pending OTP store (in-memory; swap the trait impl for a replicated
    // backend when scaling past one instance)
    let otp = Arc::new(InMemoryOtpStore::new());

    // Outbound mail: HTTP API when configured, log-only otherwise
    let mailer: Arc<dyn Mailer> = match &config.mail_api_url {
        Some(url) => {
            info!("HTTP mailer initialized");
            Arc::new(HttpMailer::new(
                url.clone(),
                config.mail_api_key.clone(),
                config.mail_from.clone(),
            ))
        }
        None => {
            warn!("MAIL_API_URL not set — outbound email will only be logged");
            Arc::new(NoopMailer)
        }
    };

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        gap_engine,
        trust_scorer,
        otp,
        mailer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_default_filter_matches_crate_log_targets() {
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(default_filter_directive("info")));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "truthhire_api", Level::INFO));
            assert!(tracing::enabled!(target: "truthhire_api::analysis::gap", Level::WARN));
            assert!(!tracing::enabled!(target: "hyper", Level::INFO));
        });
    }

    #[test]
    fn test_directive_target_is_underscored_package_name() {
        assert_eq!(
            default_filter_directive("info"),
            format!("{}=info", env!("CARGO_PKG_NAME").replace('-', "_"))
        );
    }
}
