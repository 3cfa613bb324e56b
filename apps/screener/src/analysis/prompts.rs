// Prompt constants for resume-vs-JD analysis.
// Reuses the JSON-only system instruction from llm_client::prompts.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as ANALYSIS_SYSTEM;

/// Analysis prompt template. Replace `{resume_text}` and `{jd_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the job description. Return STRICT JSON with:
- match_score (0-100)
- matching_skills (list)
- missing_skills (list)
- experience (years)
- suggestions (list)
- summary (str)

Resume:
{resume_text}

Job Description:
{jd_text}

Example Output:
{
    "match_score": 75,
    "matching_skills": ["Python", "ML"],
    "missing_skills": ["AWS"],
    "experience": 2,
    "suggestions": ["Add AWS certification"],
    "summary": "Strong technical skills but lacks cloud experience"
}

Return ONLY valid JSON with no additional text or formatting."#;

/// Fills the analysis template. The JD is substituted last so resume text
/// that happens to contain `{jd_text}` is left untouched.
pub fn build_analysis_prompt(resume_text: &str, jd_text: &str) -> String {
    let (head, tail) = ANALYSIS_PROMPT_TEMPLATE
        .split_once("{jd_text}")
        .unwrap_or((ANALYSIS_PROMPT_TEMPLATE, ""));
    format!(
        "{}{}{}",
        head.replace("{resume_text}", resume_text.trim()),
        jd_text.trim(),
        tail
    )
}
