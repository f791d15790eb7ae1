use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::gap::GapAnalysisEngine;
use crate::analysis::trust::TrustScorer;
use crate::auth::otp::OtpStore;
use crate::config::Config;
use crate::email::Mailer;

/// Shared application state injected into all route handlers via Axum
/// extractors. The OTP store, mailer, and (inside the gap engine) the
/// result cache sit behind traits so deployments can swap backends.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub gap_engine: Arc<GapAnalysisEngine>,
    pub trust_scorer: Arc<TrustScorer>,
    pub otp: Arc<dyn OtpStore>,
    pub mailer: Arc<dyn Mailer>,
}
