//! Job submission and listing. Submission runs every posting through the
//! trust scorer and applies the publish policy before anything is stored.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AuthUser, ROLE_CANDIDATE, ROLE_RECRUITER};
use crate::email::{self, templates};
use crate::errors::AppError;
use crate::models::job::Job;
use crate::models::recruiter::Recruiter;
use crate::models::user::User;
use crate::state::AppState;

/// Submissions scoring below this are rejected outright.
pub const TRUST_REJECT_BELOW: i64 = 50;

/// At or above this the job auto-publishes; between the two bounds it is
/// queued for manual review.
pub const TRUST_AUTO_PUBLISH_AT: i64 = 75;

/// Disclosing a full salary range is a good-faith signal worth a bonus.
pub const SALARY_DISCLOSURE_BONUS: i64 = 10;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PENDING_REVIEW: &str = "pending_review";

/// Applies the salary-disclosure bonus, capped at 100.
pub fn adjusted_trust_score(base: i64, salary_disclosed: bool) -> i64 {
    if salary_disclosed {
        (base + SALARY_DISCLOSURE_BONUS).min(100)
    } else {
        base
    }
}

/// Publish decision for an adjusted trust score. `None` means the
/// submission is rejected.
pub fn publish_status(score: i64) -> Option<&'static str> {
    if score < TRUST_REJECT_BELOW {
        None
    } else if score >= TRUST_AUTO_PUBLISH_AT {
        Some(STATUS_ACTIVE)
    } else {
        Some(STATUS_PENDING_REVIEW)
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_frequency() -> String {
    "Monthly".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PostJobRequest {
    pub title: String,
    pub employment_type: String,
    pub location_type: String,
    pub location: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_frequency")]
    pub salary_frequency: String,
    #[serde(default)]
    pub equity: bool,
    pub description: String,
    pub skills_required: String,
    pub experience_level: String,
}

#[derive(Debug, Serialize)]
pub struct PostJobResponse {
    pub job_id: i32,
    pub status: String,
    pub trust_score: i64,
}

/// POST /recruiters/post-job
pub async fn handle_post_job(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<PostJobRequest>,
) -> Result<Json<PostJobResponse>, AppError> {
    if claims.role != ROLE_RECRUITER {
        return Err(AppError::Forbidden(
            "Only recruiters can post jobs".to_string(),
        ));
    }
    let recruiter_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized)?;

    let recruiter: Option<Recruiter> = sqlx::query_as(
        r#"
        SELECT id, name, company_name, official_email, password_hash,
               is_verified, verification_status, linkedin_url, created_at
        FROM recruiters WHERE id = $1
        "#,
    )
    .bind(recruiter_id)
    .fetch_optional(&state.db)
    .await?;
    let recruiter = recruiter.ok_or(AppError::Unauthorized)?;

    if recruiter.verification_status == "pending" {
        return Err(AppError::Forbidden(
            "Account pending verification.".to_string(),
        ));
    }

    let verdict = state
        .trust_scorer
        .score(
            &req.title,
            &req.description,
            req.salary_min,
            req.salary_max,
            &req.currency,
            &req.location_type,
        )
        .await;

    let salary_disclosed = req.salary_min.is_some() && req.salary_max.is_some();
    let trust_score = adjusted_trust_score(verdict.trust_score, salary_disclosed);

    let Some(status) = publish_status(trust_score) else {
        return Err(AppError::Validation(format!(
            "Job blocked: {}",
            verdict.verdict
        )));
    };

    let job_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO jobs
            (recruiter_id, company_name, title, description, location, location_type,
             employment_type, salary_min, salary_max, currency, salary_frequency, equity,
             experience_level, skills_required, trust_score, status, is_verified, views)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, 0)
        RETURNING id
        "#,
    )
    .bind(recruiter.id)
    .bind(&recruiter.company_name)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.location)
    .bind(&req.location_type)
    .bind(&req.employment_type)
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(&req.currency)
    .bind(&req.salary_frequency)
    .bind(req.equity)
    .bind(&req.experience_level)
    .bind(&req.skills_required)
    .bind(trust_score as i32)
    .bind(status)
    .bind(recruiter.is_verified)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(PostJobResponse {
        job_id,
        status: status.to_string(),
        trust_score,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub job_id: i32,
    pub resume_text: String,
    #[serde(default)]
    pub cover_note: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub message: String,
    pub application_id: i32,
    pub match_score: i64,
}

/// POST /jobs/apply — one application per (candidate, job). The gap engine
/// scores the application and the recruiter gets the match summary.
pub async fn handle_apply(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    if claims.role != ROLE_CANDIDATE {
        return Err(AppError::Forbidden(
            "Only candidates can apply".to_string(),
        ));
    }
    let user_id: i32 = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;
    let user = user.ok_or(AppError::Unauthorized)?;

    let job: Option<Job> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(req.job_id)
        .fetch_optional(&state.db)
        .await?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job {} not found", req.job_id)))?;

    let existing: Option<i32> = sqlx::query_scalar(
        "SELECT id FROM job_applications WHERE job_id = $1 AND user_id = $2",
    )
    .bind(job.id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Already applied".to_string()));
    }

    let analysis = state
        .gap_engine
        .analyze(
            &req.resume_text,
            &job.description,
            &user.id.to_string(),
            &job.id.to_string(),
        )
        .await;
    let match_score = analysis.score;

    let application_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO job_applications
            (job_id, user_id, applicant_name, applicant_email, resume_text, match_score, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'applied')
        RETURNING id
        "#,
    )
    .bind(job.id)
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&req.resume_text)
    .bind(match_score as i32)
    .fetch_one(&state.db)
    .await?;

    // Notification routing: the posting recruiter when there is one, the
    // admin inbox for admin-posted jobs.
    let notify_to: Option<String> = match job.recruiter_id {
        Some(rid) => {
            sqlx::query_scalar("SELECT official_email FROM recruiters WHERE id = $1")
                .bind(rid)
                .fetch_optional(&state.db)
                .await?
        }
        None => state.config.admin_alert_email.clone(),
    };
    if let Some(to) = notify_to {
        email::dispatch(
            Arc::clone(&state.mailer),
            templates::application_notice(
                &to,
                &job.title,
                &user.name,
                &user.email,
                match_score,
                &analysis.matched_skills,
                &analysis.missing_skills,
                &req.cover_note,
            ),
        );
    }
    email::dispatch(
        Arc::clone(&state.mailer),
        templates::application_confirmation(&user.email, &user.name, &job.title, &job.company_name),
    );

    Ok(Json(ApplyResponse {
        message: "Applied successfully".to_string(),
        application_id,
        match_score,
    }))
}

/// GET /jobs — the public board lists only auto-published postings.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Job>>, AppError> {
    let jobs: Vec<Job> = sqlx::query_as(
        "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at DESC LIMIT 100",
    )
    .bind(STATUS_ACTIVE)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(jobs))
}
