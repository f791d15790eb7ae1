//! Message builders for every email the service sends. Minimal inline HTML;
//! real rendering belongs to whatever sits behind the Mailer trait.

use super::EmailMessage;

pub fn candidate_otp(to: &str, code: &str, name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Your TruthHire Login Code: {code}"),
        html: format!(
            "<p>Hi {name},</p>\
             <p>Your one-time code is:</p>\
             <p style=\"font-size:32px;font-weight:800;letter-spacing:8px;font-family:monospace;\">{code}</p>\
             <p>It expires in 5 minutes. If you didn't request this, you can ignore this email.</p>"
        ),
    }
}

pub fn recruiter_otp(to: &str, code: &str, name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("{code} is your verification code"),
        html: format!(
            "<p>Hi {name},</p>\
             <p>Use this code to verify your recruiter account:</p>\
             <p style=\"font-size:32px;font-weight:700;letter-spacing:6px;font-family:monospace;\">{code}</p>\
             <p>The code expires in 5 minutes.</p>"
        ),
    }
}

pub fn welcome(to: &str, name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Welcome to TruthHire".to_string(),
        html: format!(
            "<p>Hi {name},</p>\
             <p>Your account is ready. Upload your resume to get AI-matched with verified jobs.</p>"
        ),
    }
}

pub fn login_notice(to: &str, name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "New login to your TruthHire account".to_string(),
        html: format!(
            "<p>Hi {name},</p>\
             <p>Your account was just signed in to. If this wasn't you, reset your password.</p>"
        ),
    }
}

/// Sent after recruiter signup verification. `verified` recruiters can post
/// immediately; `pending` ones are waiting on manual review.
pub fn recruiter_status(to: &str, name: &str, status: &str) -> EmailMessage {
    let (subject, body) = match status {
        "verified" => (
            "Your recruiter account is verified".to_string(),
            format!("<p>Hi {name},</p><p>Your company email checked out — you can post jobs right away.</p>"),
        ),
        _ => (
            "Your recruiter account is under review".to_string(),
            format!("<p>Hi {name},</p><p>We verified your email. Our team is reviewing your profile; you'll hear from us within 1-2 business days.</p>"),
        ),
    };
    EmailMessage {
        to: to.to_string(),
        subject,
        html: body,
    }
}

/// Sent to the posting recruiter (or the admin inbox for orphaned jobs)
/// when a candidate applies.
pub fn application_notice(
    to: &str,
    job_title: &str,
    candidate_name: &str,
    candidate_email: &str,
    match_score: i64,
    matched: &[String],
    missing: &[String],
    cover_note: &str,
) -> EmailMessage {
    let note = if cover_note.trim().is_empty() {
        String::new()
    } else {
        format!("<p><em>{}</em></p>", cover_note.trim())
    };
    EmailMessage {
        to: to.to_string(),
        subject: format!("New application for {job_title}: {candidate_name}"),
        html: format!(
            "<p>{candidate_name} ({candidate_email}) applied to <strong>{job_title}</strong>.</p>\
             <p>AI match score: <strong>{match_score}</strong></p>\
             <ul><li>Matched: {}</li><li>Missing: {}</li></ul>{note}",
            matched.join(", "),
            missing.join(", ")
        ),
    }
}

pub fn application_confirmation(
    to: &str,
    name: &str,
    job_title: &str,
    company: &str,
) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Application received: {job_title}"),
        html: format!(
            "<p>Hi {name},</p>\
             <p>Your application to <strong>{job_title}</strong> at {company} is in. \
             The recruiter has your AI match summary; we'll let you know of updates.</p>"
        ),
    }
}

pub fn admin_recruiter_alert(
    to: &str,
    recruiter_name: &str,
    recruiter_email: &str,
    linkedin_url: Option<&str>,
) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Recruiter pending review: {recruiter_name}"),
        html: format!(
            "<p>A recruiter signed up with a public email domain and needs manual review.</p>\
             <ul><li>Name: {recruiter_name}</li><li>Email: {recruiter_email}</li><li>LinkedIn: {}</li></ul>",
            linkedin_url.unwrap_or("not provided")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_otp_embeds_code_in_subject_and_body() {
        let msg = candidate_otp("a@example.com", "123456", "Asha");
        assert!(msg.subject.contains("123456"));
        assert!(msg.html.contains("123456"));
        assert!(msg.html.contains("Asha"));
    }

    #[test]
    fn test_recruiter_otp_subject_leads_with_code() {
        let msg = recruiter_otp("hr@acme.com", "654321", "Lee");
        assert!(msg.subject.starts_with("654321"));
    }

    #[test]
    fn test_recruiter_status_branches_on_verification() {
        let verified = recruiter_status("hr@acme.com", "Lee", "verified");
        let pending = recruiter_status("hr@acme.com", "Lee", "pending");
        assert!(verified.subject.contains("verified"));
        assert!(pending.subject.contains("review"));
        assert_ne!(verified.html, pending.html);
    }

    #[test]
    fn test_application_notice_includes_score_and_skills() {
        let msg = application_notice(
            "hr@acme.com",
            "Platform Engineer",
            "Asha",
            "asha@example.com",
            72,
            &["Python".to_string()],
            &["Kubernetes".to_string()],
            "Excited about this role.",
        );
        assert!(msg.subject.contains("Platform Engineer"));
        assert!(msg.html.contains("72"));
        assert!(msg.html.contains("Kubernetes"));
        assert!(msg.html.contains("Excited about this role."));
    }

    #[test]
    fn test_application_notice_omits_empty_cover_note() {
        let msg = application_notice("hr@acme.com", "Role", "Asha", "a@b.c", 50, &[], &[], "  ");
        assert!(!msg.html.contains("<em>"));
    }

    #[test]
    fn test_application_confirmation_names_job_and_company() {
        let msg = application_confirmation("a@b.c", "Asha", "Platform Engineer", "Acme");
        assert!(msg.subject.contains("Platform Engineer"));
        assert!(msg.html.contains("Acme"));
    }

    #[test]
    fn test_admin_alert_lists_missing_linkedin() {
        let msg = admin_recruiter_alert("admin@truthhire.app", "Lee", "lee@gmail.com", None);
        assert!(msg.html.contains("not provided"));
    }
}
