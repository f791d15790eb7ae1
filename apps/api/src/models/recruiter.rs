use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Recruiter account row.
///
/// `verification_status` is "verified" for corporate-domain signups and
/// "pending" for public-domain ones until an admin reviews them; pending
/// recruiters cannot post jobs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recruiter {
    pub id: i32,
    pub name: String,
    pub company_name: String,
    pub official_email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_status: String,
    pub linkedin_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
