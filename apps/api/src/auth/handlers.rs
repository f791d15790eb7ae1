//! Signup/login endpoints. Accounts are only persisted after OTP
//! verification; everything before that lives in the pending store.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::otp::{begin, take_verified, Purpose, PurposeKind};
use crate::auth::{
    create_access_token, hash_password, is_public_domain, verify_password, ROLE_CANDIDATE,
    ROLE_RECRUITER,
};
use crate::email::{self, templates};
use crate::errors::AppError;
use crate::models::recruiter::Recruiter;
use crate::models::user::User;
use crate::state::AppState;

const MIN_LINKEDIN_URL_LEN: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct RecruiterRegisterRequest {
    pub name: String,
    pub company_name: String,
    pub official_email: String,
    pub password: String,
    pub linkedin_url: Option<String>,
}

/// Returned whenever an OTP has been dispatched and the client must come
/// back with the code. The code itself never appears in the response.
#[derive(Debug, Serialize)]
pub struct OtpChallengeResponse {
    pub message: String,
    pub email: String,
    pub requires_otp: bool,
}

impl OtpChallengeResponse {
    fn sent(email: String) -> Self {
        Self {
            message: "OTP sent to your email".to_string(),
            email,
            requires_otp: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RecruiterTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub recruiter_id: i32,
    pub name: String,
    pub company_name: String,
    pub is_verified: bool,
    pub status: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// POST /users/signup
pub async fn handle_candidate_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<OtpChallengeResponse>, AppError> {
    let email = normalize_email(&req.email);

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let code = begin(
        state.otp.as_ref(),
        &email,
        Purpose::CandidateSignup {
            name: req.name.clone(),
            password_hash,
        },
    );

    email::dispatch(
        Arc::clone(&state.mailer),
        templates::candidate_otp(&email, &code, &req.name),
    );

    Ok(Json(OtpChallengeResponse::sent(email)))
}

/// POST /users/verify-signup-otp
pub async fn handle_verify_signup_otp(
    State(state): State<AppState>,
    Json(req): Json<OtpVerifyRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    let email = normalize_email(&req.email);
    let purpose = take_verified(
        state.otp.as_ref(),
        &email,
        &req.otp,
        PurposeKind::CandidateSignup,
    )?;
    let Purpose::CandidateSignup {
        name,
        password_hash,
    } = purpose
    else {
        unreachable!("take_verified returned wrong purpose kind");
    };

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    let access_token = create_access_token(&state.config.jwt_secret, user_id, ROLE_CANDIDATE)?;

    email::dispatch(Arc::clone(&state.mailer), templates::welcome(&email, &name));

    Ok(Json(AuthTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user_id,
        name,
        email,
    }))
}

/// POST /users/login
pub async fn handle_candidate_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<OtpChallengeResponse>, AppError> {
    let email = normalize_email(&req.email);

    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;
    let user = user.ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let code = begin(
        state.otp.as_ref(),
        &email,
        Purpose::CandidateLogin {
            user_id: user.id,
            name: user.name.clone(),
        },
    );

    email::dispatch(
        Arc::clone(&state.mailer),
        templates::candidate_otp(&email, &code, &user.name),
    );

    Ok(Json(OtpChallengeResponse::sent(email)))
}

/// POST /users/verify-otp
pub async fn handle_verify_login_otp(
    State(state): State<AppState>,
    Json(req): Json<OtpVerifyRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    let email = normalize_email(&req.email);
    let purpose = take_verified(
        state.otp.as_ref(),
        &email,
        &req.otp,
        PurposeKind::CandidateLogin,
    )?;
    let Purpose::CandidateLogin { user_id, name } = purpose else {
        unreachable!("take_verified returned wrong purpose kind");
    };

    let access_token = create_access_token(&state.config.jwt_secret, user_id, ROLE_CANDIDATE)?;

    email::dispatch(
        Arc::clone(&state.mailer),
        templates::login_notice(&email, &name),
    );

    Ok(Json(AuthTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user_id,
        name,
        email,
    }))
}

/// POST /recruiters/register
pub async fn handle_recruiter_register(
    State(state): State<AppState>,
    Json(req): Json<RecruiterRegisterRequest>,
) -> Result<Json<OtpChallengeResponse>, AppError> {
    let email = normalize_email(&req.official_email);

    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM recruiters WHERE official_email = $1")
            .bind(&email)
            .fetch_optional(&state.db)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let public_domain = is_public_domain(&email);

    // Public-domain recruiters need some verifiable identity anchor.
    let linkedin_ok = req
        .linkedin_url
        .as_deref()
        .is_some_and(|url| url.trim().len() >= MIN_LINKEDIN_URL_LEN);
    if public_domain && !linkedin_ok {
        return Err(AppError::Validation(
            "LinkedIn profile is required for verification when using public email domains."
                .to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let code = begin(
        state.otp.as_ref(),
        &email,
        Purpose::RecruiterSignup {
            name: req.name.clone(),
            company_name: req.company_name,
            password_hash,
            linkedin_url: req.linkedin_url,
            public_domain,
        },
    );

    email::dispatch(
        Arc::clone(&state.mailer),
        templates::recruiter_otp(&email, &code, &req.name),
    );

    Ok(Json(OtpChallengeResponse::sent(email)))
}

/// POST /recruiters/verify-signup-otp
pub async fn handle_recruiter_verify_signup(
    State(state): State<AppState>,
    Json(req): Json<OtpVerifyRequest>,
) -> Result<Json<RecruiterTokenResponse>, AppError> {
    let email = normalize_email(&req.email);
    let purpose = take_verified(
        state.otp.as_ref(),
        &email,
        &req.otp,
        PurposeKind::RecruiterSignup,
    )?;
    let Purpose::RecruiterSignup {
        name,
        company_name,
        password_hash,
        linkedin_url,
        public_domain,
    } = purpose
    else {
        unreachable!("take_verified returned wrong purpose kind");
    };

    // Corporate domains are trusted outright; public ones wait for review.
    let (verification_status, is_verified) = if public_domain {
        ("pending", false)
    } else {
        ("verified", true)
    };

    let recruiter_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO recruiters
            (name, company_name, official_email, password_hash,
             is_verified, verification_status, linkedin_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&name)
    .bind(&company_name)
    .bind(&email)
    .bind(&password_hash)
    .bind(is_verified)
    .bind(verification_status)
    .bind(&linkedin_url)
    .fetch_one(&state.db)
    .await?;

    let access_token = create_access_token(&state.config.jwt_secret, recruiter_id, ROLE_RECRUITER)?;

    if public_domain {
        if let Some(admin) = &state.config.admin_alert_email {
            email::dispatch(
                Arc::clone(&state.mailer),
                templates::admin_recruiter_alert(admin, &name, &email, linkedin_url.as_deref()),
            );
        }
    }
    email::dispatch(
        Arc::clone(&state.mailer),
        templates::recruiter_status(&email, &name, verification_status),
    );

    Ok(Json(RecruiterTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        recruiter_id,
        name,
        company_name,
        is_verified,
        status: verification_status.to_string(),
    }))
}

/// POST /recruiters/login
pub async fn handle_recruiter_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<OtpChallengeResponse>, AppError> {
    let email = normalize_email(&req.email);

    let recruiter: Option<Recruiter> = sqlx::query_as(
        r#"
        SELECT id, name, company_name, official_email, password_hash,
               is_verified, verification_status, linkedin_url, created_at
        FROM recruiters WHERE official_email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;
    let recruiter = recruiter.ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &recruiter.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let code = begin(
        state.otp.as_ref(),
        &email,
        Purpose::RecruiterLogin {
            recruiter_id: recruiter.id,
            name: recruiter.name.clone(),
            company_name: recruiter.company_name,
        },
    );

    email::dispatch(
        Arc::clone(&state.mailer),
        templates::recruiter_otp(&email, &code, &recruiter.name),
    );

    Ok(Json(OtpChallengeResponse::sent(email)))
}

/// POST /recruiters/verify-login-otp
pub async fn handle_recruiter_verify_login(
    State(state): State<AppState>,
    Json(req): Json<OtpVerifyRequest>,
) -> Result<Json<RecruiterTokenResponse>, AppError> {
    let email = normalize_email(&req.email);
    let purpose = take_verified(
        state.otp.as_ref(),
        &email,
        &req.otp,
        PurposeKind::RecruiterLogin,
    )?;
    let Purpose::RecruiterLogin {
        recruiter_id,
        name,
        company_name,
    } = purpose
    else {
        unreachable!("take_verified returned wrong purpose kind");
    };

    let (is_verified, status): (bool, String) = sqlx::query_as(
        "SELECT is_verified, verification_status FROM recruiters WHERE id = $1",
    )
    .bind(recruiter_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Recruiter {recruiter_id} not found")))?;

    let access_token = create_access_token(&state.config.jwt_secret, recruiter_id, ROLE_RECRUITER)?;

    Ok(Json(RecruiterTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        recruiter_id,
        name,
        company_name,
        is_verified,
        status,
    }))
}
