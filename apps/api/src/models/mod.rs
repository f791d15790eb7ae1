pub mod job;
pub mod recruiter;
pub mod user;
