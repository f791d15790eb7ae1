// All LLM prompt constants for the analysis module.

/// Low temperature for consistent, strict analysis across both prompts.
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

/// Gap-analysis prompt template.
/// Replace `{job_description}` and `{resume_text}` before sending.
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Role: Expert Talent Acquisition Specialist (Domain Agnostic).
Task: Perform a Gap Analysis and provide INTERVIEW DEFENSE STRATEGIES.

### STEP 1: ANALYZE THE JOB DOMAIN
- Read the job description to understand if it is Technical (Coding), Non-Technical (Sales, Marketing), Operational (Admin, HR), or Data-focused.
- Only look for skills RELEVANT to that specific domain.

### JOB DESCRIPTION
{job_description}

### RESUME TEXT
{resume_text}

### STRICT INSTRUCTIONS (CRITICAL)
1. NO HALLUCINATIONS: Only list skills EXPLICITLY mentioned in the job description.
2. Soft Skills Matter: If non-technical, weigh Communication and Leadership higher.
3. Experience Check: Compare "Required Years" vs "Actual Years".
4. DEFENSE STRATEGY: For every MISSING skill, provide a UNIQUE 1-sentence strategic answer.

### OUTPUT JSON ONLY
{
    "score": <integer 0-100>,
    "matched_skills": ["Skill1 found"],
    "missing_skills": ["Skill2 missing"],
    "defense_strategies": {
        "Skill2": "Strategy sentence..."
    },
    "experience_verdict": "Matches seniority",
    "coach_message": "Constructive advice."
}"#;

/// Job trust-audit prompt template.
/// Replace `{title}`, `{salary_info}`, `{location_type}`, `{description}`.
pub const TRUST_AUDIT_PROMPT_TEMPLATE: &str = r#"Role: Elite Job Board Compliance Auditor & Fraud Analyst.
Task: Analyze this job posting for SCAMS, UNREALISTIC PROMISES, or LOW QUALITY content.

### JOB CONTEXT
- Title: {title}
- Salary Offered: {salary_info}
- Work Mode: {location_type}
- Description Snippet: {description}

### SCORING CRITERIA (0 - 100)

1. FATAL RED FLAGS (Score: 0-30 | Verdict: SCAM)
- Mentions "Telegram", "WhatsApp", or personal emails (gmail/yahoo) for contact.
- Requests for money, security deposits, or "ID card fees".
- "Easy money", "No experience needed" for high-paying roles.
- MLM, Pyramid Schemes, or "Investment" roles disguising as jobs.
- Unrealistic salary for unskilled work.

2. WARNING SIGNS (Score: 40-70 | Verdict: SUSPICIOUS)
- Vague responsibilities (e.g., "Do whatever required").
- Excessive grammar/spelling errors suggesting unprofessionalism.
- All caps text or excessive emojis.
- Title does not match the description.

3. PROFESSIONAL STANDARDS (Score: 71-100 | Verdict: SAFE)
- Clear "About", "Responsibilities", and "Requirements" sections.
- Specific tech stack or hard skills listed.
- Professional tone and formatting.
- Salary is market-standard for the role title.

### INSTRUCTIONS
- Be strict on Remote/Data Entry jobs (high scam risk).
- Be lenient on Sales jobs mentioning "commissions" (normal industry practice).
- If salary is provided, cross-reference it with the job title for realism.

### OUTPUT JSON ONLY
{
    "trust_score": <int 0-100>,
    "flagged_issues": ["Specific Issue 1", "Specific Issue 2"],
    "verdict": "SAFE" or "SUSPICIOUS" or "SCAM"
}"#;
