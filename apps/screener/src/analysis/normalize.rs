//! Response normalization: turns the model's reply into an `AnalysisResult`.
//!
//! Strict JSON is tried first (after stripping code fences). When that fails
//! the raw reply is scanned field by field with regexes, so a truncated or
//! chatty reply still yields a usable report. Absent fields fall back to
//! 0 / empty list / empty string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::models::{
    clamp_score, clamp_years, parse_loose_int, AnalysisResult, Normalization,
};
use crate::llm_client::strip_json_fences;

const FIELD_KEYS: [&str; 6] = [
    "match_score",
    "matching_skills",
    "missing_skills",
    "experience",
    "suggestions",
    "summary",
];

/// Compiled fallback patterns for one field key.
pub struct FieldPatterns {
    scalar: Regex,
    quoted: Regex,
    list: Regex,
}

impl FieldPatterns {
    fn new(key: &str) -> Self {
        Self {
            scalar: key_regex(key, r"([^,\n}]+)"),
            quoted: key_regex(key, r#""((?:[^"\\]|\\.)*)""#),
            list: key_regex(key, r"\[([^\]]+)\]"),
        }
    }
}

static MATCH_SCORE: Lazy<FieldPatterns> = Lazy::new(|| FieldPatterns::new("match_score"));
static MATCHING_SKILLS: Lazy<FieldPatterns> = Lazy::new(|| FieldPatterns::new("matching_skills"));
static MISSING_SKILLS: Lazy<FieldPatterns> = Lazy::new(|| FieldPatterns::new("missing_skills"));
static EXPERIENCE: Lazy<FieldPatterns> = Lazy::new(|| FieldPatterns::new("experience"));
static SUGGESTIONS: Lazy<FieldPatterns> = Lazy::new(|| FieldPatterns::new("suggestions"));
static SUMMARY: Lazy<FieldPatterns> = Lazy::new(|| FieldPatterns::new("summary"));

/// Normalizes a raw model reply. Never fails.
pub fn parse_model_response(response_text: &str) -> (AnalysisResult, Normalization) {
    match parse_strict(strip_json_fences(response_text)) {
        Ok(result) => {
            debug!("Model reply parsed as strict JSON");
            (result, Normalization::StrictJson)
        }
        Err(reason) => {
            warn!("Model reply is not a JSON report ({reason}); falling back to regex extraction");
            (extract_fields(response_text), Normalization::RegexFallback)
        }
    }
}

/// Only a JSON object carrying at least one report key counts as strict JSON.
/// Arrays would otherwise decode positionally into the struct.
fn parse_strict(clean: &str) -> Result<AnalysisResult, String> {
    let value: Value = serde_json::from_str(clean).map_err(|e| e.to_string())?;
    let Value::Object(fields) = &value else {
        return Err("top-level value is not an object".to_string());
    };
    if !FIELD_KEYS.iter().any(|key| fields.contains_key(*key)) {
        return Err("object has none of the report keys".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Best-effort field extraction from near-JSON text.
pub fn extract_fields(text: &str) -> AnalysisResult {
    AnalysisResult {
        match_score: clamp_score(extract_int(text, &MATCH_SCORE)),
        matching_skills: extract_list(text, &MATCHING_SKILLS),
        missing_skills: extract_list(text, &MISSING_SKILLS),
        experience: clamp_years(extract_int(text, &EXPERIENCE)),
        suggestions: extract_list(text, &SUGGESTIONS),
        summary: extract_string(text, &SUMMARY),
    }
}

fn key_regex(key: &str, value_pattern: &str) -> Regex {
    Regex::new(&format!(r#""{}"\s*:\s*{value_pattern}"#, regex::escape(key)))
        .expect("field pattern is a valid regex")
}

fn strip_quotes(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'')
}

/// Raw scalar after `"key":`, up to the next comma, newline or closing brace.
fn extract_scalar<'t>(text: &'t str, field: &FieldPatterns) -> Option<&'t str> {
    let caps = field.scalar.captures(text)?;
    caps.get(1).map(|m| strip_quotes(m.as_str()))
}

/// Integer value for the field, or 0 when absent or unparsable.
pub fn extract_int(text: &str, field: &FieldPatterns) -> i64 {
    extract_scalar(text, field)
        .and_then(parse_loose_int)
        .unwrap_or(0)
}

/// String value for the field. A complete quoted string is preferred (so
/// commas inside it survive); otherwise the bare scalar is used. Empty when
/// absent.
pub fn extract_string(text: &str, field: &FieldPatterns) -> String {
    let quoted = field
        .quoted
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape_json_string(m.as_str()));

    quoted
        .or_else(|| extract_scalar(text, field).map(str::to_string))
        .unwrap_or_default()
}

/// List value for the field: the bracketed items split on commas with quotes
/// trimmed. Empty when absent.
pub fn extract_list(text: &str, field: &FieldPatterns) -> Vec<String> {
    let Some(inner) = field.list.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    inner
        .as_str()
        .split(',')
        .map(strip_quotes)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn unescape_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
