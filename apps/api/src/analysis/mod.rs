//! AI analysis — gap analysis between resume and job description, and
//! trust scoring of job postings. Both go through the shared LLM client
//! and degrade gracefully when the provider is missing or failing.

pub mod gap;
pub mod handlers;
pub mod prompts;
pub mod trust;
