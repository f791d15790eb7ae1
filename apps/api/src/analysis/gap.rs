//! Gap analysis engine — resume vs job description, with caching and
//! self-healing normalization of model output.
//!
//! `analyze` never fails: every error path collapses into a well-shaped
//! zero-score result with an explanatory missing-skill entry, so callers
//! need no special-case handling for "AI down".

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::prompts::{ANALYSIS_TEMPERATURE, GAP_ANALYSIS_PROMPT_TEMPLATE};
use crate::cache::{fingerprint, ResultCache};
use crate::llm_client::LlmClient;
use crate::sanitize::{bounded_prefix, clean_for_ai};

/// Sanitized resumes shorter than this are treated as unreadable extractions.
const MIN_RESUME_LEN: usize = 50;

/// Prompt inputs are truncated to this prefix to bound token cost.
const PROMPT_INPUT_LIMIT: usize = 3000;

/// Skill lists from the model are clamped to this many entries.
const MAX_SKILLS: usize = 10;

/// Immutable analysis outcome. Scores are always within [0, 100] and every
/// missing skill carries a defense strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: i64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub defense_strategies: BTreeMap<String, String>,
    pub coach_message: String,
}

/// Raw model output. Every field is defaulted: the model omitting a key is
/// an expected condition, not a parse failure.
#[derive(Debug, Deserialize)]
struct RawGapResponse {
    #[serde(default)]
    score: i64,
    #[serde(default)]
    matched_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    defense_strategies: BTreeMap<String, String>,
    #[serde(default)]
    experience_verdict: String,
    #[serde(default)]
    coach_message: String,
}

pub struct GapAnalysisEngine {
    llm: Option<LlmClient>,
    cache: Arc<dyn ResultCache>,
}

impl GapAnalysisEngine {
    /// `llm: None` means the credential is absent; analysis degrades to a
    /// configuration-error result instead of calling out.
    pub fn new(llm: Option<LlmClient>, cache: Arc<dyn ResultCache>) -> Self {
        Self { llm, cache }
    }

    /// Runs the full pipeline: sanitize, cache lookup, model call, repair,
    /// normalize, cache store. Infallible by design.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
        candidate_id: &str,
        job_id: &str,
    ) -> AnalysisResult {
        let clean_resume = clean_for_ai(resume_text);
        let clean_jd = clean_for_ai(job_description);

        if clean_resume.len() < MIN_RESUME_LEN {
            return unreadable_resume_result();
        }

        // Cache check must happen before any model call for this fingerprint.
        let key = fingerprint(candidate_id, job_id, &clean_resume, &clean_jd);
        if let Some(cached) = self.cache.get(&key) {
            info!(%candidate_id, %job_id, "gap analysis cache hit");
            return cached;
        }

        let Some(llm) = &self.llm else {
            warn!("gap analysis requested but LLM credential is not configured");
            return config_error_result();
        };

        let prompt = GAP_ANALYSIS_PROMPT_TEMPLATE
            .replace("{job_description}", bounded_prefix(&clean_jd, PROMPT_INPUT_LIMIT))
            .replace("{resume_text}", bounded_prefix(&clean_resume, PROMPT_INPUT_LIMIT));

        match llm
            .chat_json::<RawGapResponse>(&prompt, ANALYSIS_TEMPERATURE)
            .await
        {
            Ok(raw) => {
                let result = normalize(raw);
                // Only successes are cached; failures must stay retryable.
                self.cache.put(key, result.clone());
                result
            }
            Err(e) => {
                warn!("gap analysis failed: {e}");
                service_error_result()
            }
        }
    }
}

/// Normalizes raw model output into the final result shape.
///
/// Clamps both skill lists, resolves a defense strategy for every missing
/// skill (exact key, then case-insensitive substring, then a synthesized
/// fallback), and composes the coach message from the experience verdict.
fn normalize(raw: RawGapResponse) -> AnalysisResult {
    let mut missing = raw.missing_skills;
    missing.truncate(MAX_SKILLS);
    let mut matched = raw.matched_skills;
    matched.truncate(MAX_SKILLS);

    let mut strategies = BTreeMap::new();
    for skill in &missing {
        let strategy = lookup_strategy(&raw.defense_strategies, skill)
            .unwrap_or_else(|| fallback_strategy(skill));
        strategies.insert(skill.clone(), strategy);
    }

    let verdict = raw.experience_verdict.trim();
    let message = raw.coach_message.trim();
    let coach_message = match (verdict.is_empty(), message.is_empty()) {
        (true, true) => String::new(),
        (true, false) => message.to_string(),
        (false, true) => verdict.to_string(),
        (false, false) => format!("{verdict}. {message}"),
    };

    AnalysisResult {
        score: raw.score.clamp(0, 100),
        matched_skills: matched,
        missing_skills: missing,
        defense_strategies: strategies,
        coach_message,
    }
}

fn lookup_strategy(strategies: &BTreeMap<String, String>, skill: &str) -> Option<String> {
    if let Some(s) = strategies.get(skill) {
        return Some(s.clone());
    }
    let skill_lower = skill.to_lowercase();
    strategies
        .iter()
        .find(|(key, _)| key.to_lowercase().contains(&skill_lower))
        .map(|(_, v)| v.clone())
}

fn fallback_strategy(skill: &str) -> String {
    format!("Although I haven't used {skill} commercially, my experience allows me to adapt fast.")
}

fn unreadable_resume_result() -> AnalysisResult {
    AnalysisResult {
        score: 0,
        matched_skills: vec![],
        missing_skills: vec!["Resume unreadable".to_string()],
        defense_strategies: BTreeMap::new(),
        coach_message: "Please upload a clear PDF resume.".to_string(),
    }
}

fn config_error_result() -> AnalysisResult {
    AnalysisResult {
        score: 0,
        matched_skills: vec![],
        missing_skills: vec!["Config Error".to_string()],
        defense_strategies: BTreeMap::new(),
        coach_message: "API key missing.".to_string(),
    }
}

fn service_error_result() -> AnalysisResult {
    AnalysisResult {
        score: 0,
        matched_skills: vec![],
        missing_skills: vec!["AI Service Error".to_string()],
        defense_strategies: BTreeMap::new(),
        coach_message: "Analysis failed. Please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryResultCache;
    use std::time::Duration;

    const READABLE_RESUME: &str =
        "Experienced backend engineer, Python, SQL, 4 years of production work";
    const JOB_TEXT: &str = "We need Python and Kubernetes experience for our platform team.";

    fn engine_without_llm() -> (GapAnalysisEngine, Arc<InMemoryResultCache>) {
        let cache = Arc::new(InMemoryResultCache::new(16, Duration::from_secs(60)));
        (
            GapAnalysisEngine::new(None, Arc::clone(&cache) as Arc<dyn ResultCache>),
            cache,
        )
    }

    #[tokio::test]
    async fn test_short_resume_short_circuits() {
        let (engine, cache) = engine_without_llm();
        let result = engine.analyze("too short", JOB_TEXT, "anon", "general").await;

        assert_eq!(result.score, 0);
        assert_eq!(result.missing_skills, vec!["Resume unreadable"]);
        assert!(result.coach_message.contains("upload"));
        // Short-circuit happens before fingerprinting; nothing is cached.
        let key = fingerprint("anon", "general", &clean_for_ai("too short"), &clean_for_ai(JOB_TEXT));
        assert!(cache.get(&key).is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_returns_config_error_without_cache_write() {
        let (engine, cache) = engine_without_llm();
        let result = engine
            .analyze(READABLE_RESUME, JOB_TEXT, "42", "j1")
            .await;

        assert_eq!(result.score, 0);
        assert_eq!(result.missing_skills, vec!["Config Error"]);
        let key = fingerprint("42", "j1", &clean_for_ai(READABLE_RESUME), &clean_for_ai(JOB_TEXT));
        assert!(cache.get(&key).is_none());
    }

    #[tokio::test]
    async fn test_cache_hit_returns_stored_result_without_llm() {
        let (engine, cache) = engine_without_llm();
        let stored = AnalysisResult {
            score: 77,
            matched_skills: vec!["Python".to_string()],
            missing_skills: vec!["Kubernetes".to_string()],
            defense_strategies: BTreeMap::from([(
                "Kubernetes".to_string(),
                "Adjacent container experience.".to_string(),
            )]),
            coach_message: "Strong profile.".to_string(),
        };
        let key = fingerprint("42", "j1", &clean_for_ai(READABLE_RESUME), &clean_for_ai(JOB_TEXT));
        cache.put(key, stored.clone());

        // The engine has no credential, so only a cache hit can produce this.
        let first = engine.analyze(READABLE_RESUME, JOB_TEXT, "42", "j1").await;
        let second = engine.analyze(READABLE_RESUME, JOB_TEXT, "42", "j1").await;
        assert_eq!(first, stored);
        assert_eq!(first, second);
    }

    fn raw(json: &str) -> RawGapResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_keeps_exact_strategy() {
        let result = normalize(raw(r#"{
            "score": 70,
            "matched_skills": ["Python"],
            "missing_skills": ["Kubernetes"],
            "defense_strategies": {"Kubernetes": "I ran containerized workloads with Docker Compose."},
            "experience_verdict": "Matches seniority",
            "coach_message": "Solid base."
        }"#));
        assert_eq!(
            result.defense_strategies["Kubernetes"],
            "I ran containerized workloads with Docker Compose."
        );
    }

    #[test]
    fn test_normalize_substring_strategy_match_is_case_insensitive() {
        let result = normalize(raw(r#"{
            "missing_skills": ["kubernetes"],
            "defense_strategies": {"Kubernetes (K8s)": "Covered by container experience."}
        }"#));
        assert_eq!(
            result.defense_strategies["kubernetes"],
            "Covered by container experience."
        );
    }

    #[test]
    fn test_normalize_synthesizes_missing_strategy() {
        let result = normalize(raw(r#"{
            "missing_skills": ["Terraform"],
            "defense_strategies": {}
        }"#));
        let strategy = &result.defense_strategies["Terraform"];
        assert!(strategy.contains("Terraform"));
        assert!(!strategy.is_empty());
    }

    #[test]
    fn test_normalize_every_missing_skill_has_strategy() {
        let result = normalize(raw(r#"{
            "missing_skills": ["A", "B", "C"],
            "defense_strategies": {"A": "covered"}
        }"#));
        for skill in &result.missing_skills {
            let strategy = result.defense_strategies.get(skill);
            assert!(strategy.is_some_and(|s| !s.is_empty()), "no strategy for {skill}");
        }
    }

    #[test]
    fn test_normalize_clamps_skill_lists_to_ten() {
        let skills: Vec<String> = (0..15).map(|i| format!("\"s{i}\"")).collect();
        let json = format!(
            r#"{{"matched_skills": [{0}], "missing_skills": [{0}]}}"#,
            skills.join(",")
        );
        let result = normalize(raw(&json));
        assert_eq!(result.matched_skills.len(), 10);
        assert_eq!(result.missing_skills.len(), 10);
        assert_eq!(result.defense_strategies.len(), 10);
    }

    #[test]
    fn test_normalize_clamps_score_into_range() {
        assert_eq!(normalize(raw(r#"{"score": 250}"#)).score, 100);
        assert_eq!(normalize(raw(r#"{"score": -5}"#)).score, 0);
        assert_eq!(normalize(raw(r#"{"score": 55}"#)).score, 55);
    }

    #[test]
    fn test_normalize_composes_coach_message() {
        let result = normalize(raw(r#"{
            "experience_verdict": "Matches seniority",
            "coach_message": "Lead with your Python depth"
        }"#));
        assert_eq!(
            result.coach_message,
            "Matches seniority. Lead with your Python depth"
        );
    }

    #[test]
    fn test_normalize_empty_verdict_and_message() {
        let result = normalize(raw(r#"{}"#));
        assert_eq!(result.coach_message, "");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_raw_response_tolerates_missing_keys() {
        let parsed = raw(r#"{"score": 40}"#);
        assert_eq!(parsed.score, 40);
        assert!(parsed.matched_skills.is_empty());
        assert!(parsed.defense_strategies.is_empty());
    }
}
