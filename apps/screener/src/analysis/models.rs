use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Structured compatibility report produced by one model call.
///
/// Deserialization is lenient: missing fields default, numbers may arrive as
/// floats or numeric strings, and `match_score` is clamped to 0–100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "score")]
    pub match_score: u8,
    #[serde(deserialize_with = "string_list")]
    pub matching_skills: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub missing_skills: Vec<String>,
    /// Years of relevant experience.
    #[serde(deserialize_with = "years")]
    pub experience: u32,
    #[serde(deserialize_with = "string_list")]
    pub suggestions: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
}

impl AnalysisResult {
    pub fn band(&self) -> MatchBand {
        MatchBand::from_score(self.match_score)
    }
}

/// Coarse reading of the match score, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,
    Moderate,
    Weak,
}

impl MatchBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => MatchBand::Strong,
            50..=74 => MatchBand::Moderate,
            _ => MatchBand::Weak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchBand::Strong => "Strong match",
            MatchBand::Moderate => "Moderate match",
            MatchBand::Weak => "Weak match",
        }
    }
}

/// Which strategy turned the model reply into an `AnalysisResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    StrictJson,
    RegexFallback,
}

/// Envelope returned for one screening request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub parser_backend: String,
    pub resume_chars: usize,
    pub normalization: Normalization,
    /// Non-fatal notices, e.g. the hosted parser failing over to local extraction.
    pub warnings: Vec<String>,
    pub analysis: AnalysisResult,
}

pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

pub fn clamp_years(raw: i64) -> u32 {
    raw.clamp(0, u32::MAX as i64) as u32
}

/// Parses `"75"`, `"75%"`, `"2.5"` (truncated) and similar loose integers.
pub fn parse_loose_int(raw: &str) -> Option<i64> {
    let s = raw.trim().trim_end_matches('%').trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64)
    })
}

fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => parse_loose_int(s),
        _ => None,
    }
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(int_from_value).unwrap_or(0))
}

fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    lenient_int(deserializer).map(clamp_score)
}

fn years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_int(deserializer).map(clamp_years)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    };
    Ok(items)
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string).unwrap_or_default())
}
