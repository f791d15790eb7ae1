use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Job posting row.
///
/// `status` lifecycle: "active" (auto-published), "pending_review" (held for
/// manual review by trust policy), "closed", "inactive". `trust_score` is
/// the AI fraud-likelihood estimate recorded at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i32,
    pub recruiter_id: Option<i32>,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub location: String,
    pub location_type: String,
    pub employment_type: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub currency: String,
    pub salary_frequency: String,
    pub equity: bool,
    pub experience_level: Option<String>,
    pub skills_required: Option<String>,
    pub is_verified: bool,
    pub trust_score: i32,
    pub status: String,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}
