//! OTP verification store — the pending-registration state machine.
//!
//! Per email key: absent → pending → consumed | expired. A new begin call
//! overwrites any existing pending record, so at most one valid code exists
//! per email at any time. The store is a trait so the in-memory default can
//! be swapped for a replicated backend without touching the handlers.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};

use crate::errors::AppError;

/// Codes are valid for five minutes from creation.
pub const OTP_TTL_SECS: i64 = 300;

const OTP_CODE_LEN: usize = 6;

/// What the pending verification will turn into once the code checks out.
/// Signup variants carry everything needed to create the account; login
/// variants reference an account that already exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Purpose {
    CandidateSignup {
        name: String,
        password_hash: String,
    },
    CandidateLogin {
        user_id: i32,
        name: String,
    },
    RecruiterSignup {
        name: String,
        company_name: String,
        password_hash: String,
        linkedin_url: Option<String>,
        public_domain: bool,
    },
    RecruiterLogin {
        recruiter_id: i32,
        name: String,
        company_name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurposeKind {
    CandidateSignup,
    CandidateLogin,
    RecruiterSignup,
    RecruiterLogin,
}

impl Purpose {
    pub fn kind(&self) -> PurposeKind {
        match self {
            Purpose::CandidateSignup { .. } => PurposeKind::CandidateSignup,
            Purpose::CandidateLogin { .. } => PurposeKind::CandidateLogin,
            Purpose::RecruiterSignup { .. } => PurposeKind::RecruiterSignup,
            Purpose::RecruiterLogin { .. } => PurposeKind::RecruiterLogin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PendingVerification {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub purpose: Purpose,
}

/// Keyed by lowercased email. `put` overwrites; `take` removes and returns
/// in one step so verification consumes the record atomically.
pub trait OtpStore: Send + Sync {
    fn put(&self, email: &str, pending: PendingVerification);
    fn take(&self, email: &str) -> Option<PendingVerification>;
    /// Re-inserts a record taken for inspection. A fresh record stored for
    /// the same email in the meantime wins over the restored one.
    fn put_if_absent(&self, email: &str, pending: PendingVerification);
}

#[derive(Default)]
pub struct InMemoryOtpStore {
    inner: Mutex<HashMap<String, PendingVerification>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OtpStore for InMemoryOtpStore {
    fn put(&self, email: &str, pending: PendingVerification) {
        self.inner
            .lock()
            .expect("otp store lock poisoned")
            .insert(email.to_string(), pending);
    }

    fn take(&self, email: &str) -> Option<PendingVerification> {
        self.inner
            .lock()
            .expect("otp store lock poisoned")
            .remove(email)
    }

    fn put_if_absent(&self, email: &str, pending: PendingVerification) {
        self.inner
            .lock()
            .expect("otp store lock poisoned")
            .entry(email.to_string())
            .or_insert(pending);
    }
}

/// Generates a fixed-length numeric code from the OS entropy source.
pub fn generate_code() -> String {
    let mut rng = OsRng;
    (0..OTP_CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Stores a fresh pending verification for `email`, invalidating any prior
/// code, and returns the new code for out-of-band delivery.
pub fn begin(store: &dyn OtpStore, email: &str, purpose: Purpose) -> String {
    let code = generate_code();
    store.put(
        email,
        PendingVerification {
            code: code.clone(),
            expires_at: Utc::now() + Duration::seconds(OTP_TTL_SECS),
            purpose,
        },
    );
    code
}

/// Consumes the pending record for `email` if `code` matches.
///
/// Failure semantics: no record → `OtpNotFound`; expired records are
/// deleted before `OtpExpired` is returned, regardless of kind or code; a
/// record of another kind is put back untouched and reported as a
/// validation error; a mismatched code puts the record back (retry allowed
/// until expiry) and returns `OtpMismatch`. Put-backs never clobber a
/// record stored concurrently for the same email.
pub fn take_verified(
    store: &dyn OtpStore,
    email: &str,
    code: &str,
    want: PurposeKind,
) -> Result<Purpose, AppError> {
    let pending = store.take(email).ok_or(AppError::OtpNotFound)?;

    if Utc::now() > pending.expires_at {
        // Already removed from the store — expired records are deleted.
        return Err(AppError::OtpExpired);
    }

    if pending.purpose.kind() != want {
        store.put_if_absent(email, pending);
        return Err(AppError::Validation("Invalid OTP type".to_string()));
    }

    if pending.code != code {
        store.put_if_absent(email, pending);
        return Err(AppError::OtpMismatch);
    }

    Ok(pending.purpose)
}
