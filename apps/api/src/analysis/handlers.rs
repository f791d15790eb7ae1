use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

/// Endpoint-level display clamp. The engine guarantees [0, 100]; the UI
/// never shows a flat 0 or a perfect 100.
const DISPLAY_SCORE_MIN: i64 = 15;
const DISPLAY_SCORE_MAX: i64 = 95;
const ELIGIBLE_ABOVE: i64 = 60;

/// Per-user daily budget of analysis calls, counted against recent
/// applications as a proxy for activity.
const DAILY_ANALYSIS_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct AnalyzeGapRequest {
    pub resume_text: String,
    pub job_description: String,
    #[serde(default = "default_job_id")]
    pub job_id: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_job_id() -> String {
    "general".to_string()
}

fn default_user_id() -> String {
    "anon".to_string()
}

#[derive(Debug, Serialize)]
pub struct AnalyzeGapResponse {
    pub match_score: i64,
    pub is_eligible: bool,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub coach_message: String,
}

/// POST /analyze-gap
pub async fn handle_analyze_gap(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeGapRequest>,
) -> Result<Json<AnalyzeGapResponse>, AppError> {
    enforce_daily_limit(&state, &req.user_id).await?;

    let analysis = state
        .gap_engine
        .analyze(
            &req.resume_text,
            &req.job_description,
            &req.user_id,
            &req.job_id,
        )
        .await;

    let match_score = analysis.score.clamp(DISPLAY_SCORE_MIN, DISPLAY_SCORE_MAX);

    Ok(Json(AnalyzeGapResponse {
        match_score,
        is_eligible: match_score > ELIGIBLE_ABOVE,
        matched_skills: analysis.matched_skills,
        missing_skills: analysis.missing_skills,
        coach_message: analysis.coach_message,
    }))
}

/// Rejects users who burned through their daily analysis budget.
/// Anonymous callers and non-numeric ids are ignored.
async fn enforce_daily_limit(state: &AppState, user_id: &str) -> Result<(), AppError> {
    if user_id == "anon" {
        return Ok(());
    }
    let Ok(user_id) = user_id.parse::<i32>() else {
        return Ok(());
    };

    let since = Utc::now() - Duration::days(1);
    let usage_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM job_applications WHERE user_id = $1 AND applied_at >= $2",
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(&state.db)
    .await?;

    if usage_count > DAILY_ANALYSIS_LIMIT {
        return Err(AppError::RateLimited(
            "Daily limit reached. To ensure fair usage, please try again tomorrow.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_clamp_floors_engine_zero() {
        assert_eq!(0_i64.clamp(DISPLAY_SCORE_MIN, DISPLAY_SCORE_MAX), 15);
    }

    #[test]
    fn test_display_clamp_caps_perfect_score() {
        assert_eq!(100_i64.clamp(DISPLAY_SCORE_MIN, DISPLAY_SCORE_MAX), 95);
    }

    #[test]
    fn test_midrange_scores_pass_through() {
        assert_eq!(62_i64.clamp(DISPLAY_SCORE_MIN, DISPLAY_SCORE_MAX), 62);
    }

    #[test]
    fn test_request_defaults_for_optional_ids() {
        let req: AnalyzeGapRequest = serde_json::from_str(
            r#"{"resume_text": "r", "job_description": "jd"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, "anon");
        assert_eq!(req.job_id, "general");
    }
}
