pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::auth::handlers as auth_handlers;
use crate::jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI analysis
        .route("/analyze-gap", post(analysis_handlers::handle_analyze_gap))
        // Candidate auth (OTP-gated)
        .route("/users/signup", post(auth_handlers::handle_candidate_signup))
        .route(
            "/users/verify-signup-otp",
            post(auth_handlers::handle_verify_signup_otp),
        )
        .route("/users/login", post(auth_handlers::handle_candidate_login))
        .route(
            "/users/verify-otp",
            post(auth_handlers::handle_verify_login_otp),
        )
        // Recruiter auth (OTP-gated)
        .route(
            "/recruiters/register",
            post(auth_handlers::handle_recruiter_register),
        )
        .route(
            "/recruiters/verify-signup-otp",
            post(auth_handlers::handle_recruiter_verify_signup),
        )
        .route(
            "/recruiters/login",
            post(auth_handlers::handle_recruiter_login),
        )
        .route(
            "/recruiters/verify-login-otp",
            post(auth_handlers::handle_recruiter_verify_login),
        )
        // Jobs
        .route("/recruiters/post-job", post(jobs::handle_post_job))
        .route("/jobs", get(jobs::handle_list_jobs))
        .route("/jobs/apply", post(jobs::handle_apply))
        .with_state(state)
}
