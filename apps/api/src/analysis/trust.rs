//! Job trust scorer — LLM-backed fraud-likelihood estimate for a posting.
//!
//! Fails OPEN: an unreachable fraud model must not block legitimate
//! postings, so every failure path yields a SAFE-biased fallback verdict.
//! Results are not cached — job content is unique per posting.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::{ANALYSIS_TEMPERATURE, TRUST_AUDIT_PROMPT_TEMPLATE};
use crate::llm_client::LlmClient;
use crate::sanitize::{bounded_prefix, clean_for_ai};

/// Description text beyond this prefix is not sent to the model.
const DESCRIPTION_PROMPT_LIMIT: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "SAFE")]
    Safe,
    #[serde(rename = "SUSPICIOUS")]
    Suspicious,
    #[serde(rename = "SCAM")]
    Scam,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Safe => "SAFE",
            Verdict::Suspicious => "SUSPICIOUS",
            Verdict::Scam => "SCAM",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustVerdict {
    pub trust_score: i64,
    pub reason: String,
    pub verdict: Verdict,
}

/// Raw model output; unknown fields are rejected nowhere, missing fields
/// fall back to SUSPICIOUS-leaning defaults.
#[derive(Debug, Deserialize)]
struct RawTrustResponse {
    #[serde(default = "default_trust_score")]
    trust_score: i64,
    #[serde(default)]
    flagged_issues: Vec<String>,
    #[serde(default)]
    verdict: Option<Verdict>,
}

fn default_trust_score() -> i64 {
    60
}

pub struct TrustScorer {
    llm: Option<LlmClient>,
}

impl TrustScorer {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn score(
        &self,
        title: &str,
        description: &str,
        salary_min: Option<i32>,
        salary_max: Option<i32>,
        currency: &str,
        location_type: &str,
    ) -> TrustVerdict {
        let Some(llm) = &self.llm else {
            warn!("trust scoring requested but LLM credential is not configured");
            return TrustVerdict {
                trust_score: 85,
                reason: "AI Config Missing".to_string(),
                verdict: Verdict::Safe,
            };
        };

        let clean_description = clean_for_ai(description);
        let salary_info = match (salary_min, salary_max) {
            (Some(min), Some(max)) => format!("{currency} {min} - {max}"),
            _ => "Not Disclosed".to_string(),
        };

        let prompt = TRUST_AUDIT_PROMPT_TEMPLATE
            .replace("{title}", title)
            .replace("{salary_info}", &salary_info)
            .replace("{location_type}", location_type)
            .replace(
                "{description}",
                bounded_prefix(&clean_description, DESCRIPTION_PROMPT_LIMIT),
            );

        match llm
            .chat_json::<RawTrustResponse>(&prompt, ANALYSIS_TEMPERATURE)
            .await
        {
            Ok(raw) => TrustVerdict {
                trust_score: raw.trust_score.clamp(0, 100),
                reason: raw.flagged_issues.join(", "),
                verdict: raw.verdict.unwrap_or(Verdict::Suspicious),
            },
            Err(e) => {
                warn!("job trust analysis failed, failing open: {e}");
                TrustVerdict {
                    trust_score: 80,
                    reason: "AI Service Unavailable".to_string(),
                    verdict: Verdict::Safe,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credential_fails_open_safe() {
        let scorer = TrustScorer::new(None);
        let verdict = scorer
            .score(
                "Data Entry",
                "send $50 registration fee via Telegram",
                None,
                None,
                "INR",
                "Remote",
            )
            .await;

        assert_eq!(verdict.verdict, Verdict::Safe);
        assert_eq!(verdict.trust_score, 85);
        assert_eq!(verdict.reason, "AI Config Missing");
    }

    #[test]
    fn test_raw_response_parses_full_shape() {
        let raw: RawTrustResponse = serde_json::from_str(
            r#"{
                "trust_score": 12,
                "flagged_issues": ["Telegram contact", "Registration fee request"],
                "verdict": "SCAM"
            }"#,
        )
        .unwrap();
        assert_eq!(raw.trust_score, 12);
        assert_eq!(raw.verdict, Some(Verdict::Scam));
        assert_eq!(raw.flagged_issues.len(), 2);
    }

    #[test]
    fn test_raw_response_defaults_on_missing_fields() {
        let raw: RawTrustResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(raw.trust_score, 60);
        assert!(raw.flagged_issues.is_empty());
        assert_eq!(raw.verdict, None);
    }

    #[test]
    fn test_verdict_serde_round_trip() {
        for (verdict, label) in [
            (Verdict::Safe, "\"SAFE\""),
            (Verdict::Suspicious, "\"SUSPICIOUS\""),
            (Verdict::Scam, "\"SCAM\""),
        ] {
            assert_eq!(serde_json::to_string(&verdict).unwrap(), label);
            let parsed: Verdict = serde_json::from_str(label).unwrap();
            assert_eq!(parsed, verdict);
        }
    }

    #[test]
    fn test_verdict_display_labels() {
        assert_eq!(Verdict::Scam.to_string(), "SCAM");
        assert_eq!(Verdict::Safe.to_string(), "SAFE");
    }
}
