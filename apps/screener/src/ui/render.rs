//! Server-rendered HTML for the screening page.
//!
//! One page serves both states: the empty upload form, and the form followed
//! by the analysis results. Errors and warnings render as inline alert boxes.

use crate::analysis::models::{MatchBand, ScreeningReport};
use crate::parsing::upload::{JD_FIELD, RESUME_FIELD};

/// Everything the page template needs for one render.
#[derive(Debug, Default)]
pub struct PageView {
    /// JD text echoed back into the textarea after a submit.
    pub jd_text: String,
    pub error: Option<String>,
    pub report: Option<ScreeningReport>,
}

#[derive(Debug, Clone, Copy)]
enum AlertKind {
    Success,
    Error,
    Warning,
    Info,
}

impl AlertKind {
    fn class(self) -> &'static str {
        match self {
            AlertKind::Success => "alert success",
            AlertKind::Error => "alert error",
            AlertKind::Warning => "alert warning",
            AlertKind::Info => "alert info",
        }
    }
}

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #fafafa; color: #262730; }
main { max-width: 1100px; margin: 0 auto; padding: 2rem 1.5rem 4rem; }
h1 { margin-bottom: 0.25rem; }
.lead { color: #555; margin-top: 0; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
@media (max-width: 760px) { .columns { grid-template-columns: 1fr; } }
label { display: block; font-weight: 600; margin-bottom: 0.5rem; }
textarea { width: 100%; min-height: 200px; box-sizing: border-box; font: inherit; padding: 0.5rem; }
button { margin-top: 1rem; padding: 0.6rem 1.4rem; font: inherit; border: 0; border-radius: 6px; background: #ff4b4b; color: #fff; cursor: pointer; }
.alert { padding: 0.6rem 1rem; border-radius: 6px; margin: 0.4rem 0; }
.alert.success { background: #e8f5e9; color: #1b5e20; }
.alert.error { background: #fdecea; color: #8a1c1c; }
.alert.warning { background: #fff8e1; color: #7a5b00; }
.alert.info { background: #e3f2fd; color: #0d47a1; }
.metric { font-size: 2.6rem; font-weight: 700; }
.metric-label { color: #555; }
.band { display: inline-block; margin-left: 0.75rem; font-size: 0.95rem; padding: 0.15rem 0.6rem; border-radius: 999px; background: #eee; }
.band.strong { background: #c8e6c9; }
.band.moderate { background: #fff3c4; }
.band.weak { background: #ffcdd2; }
.meta { color: #777; font-size: 0.85rem; }
"#;

/// Renders the complete HTML document for `view`.
pub fn page(view: &PageView) -> String {
    let mut body = String::new();
    body.push_str("<h1>📄 AI Resume Screener</h1>\n");
    body.push_str(
        "<p class=\"lead\">Upload a resume and job description to analyze compatibility</p>\n",
    );

    if let Some(error) = &view.error {
        body.push_str(&alert(AlertKind::Error, error));
    }

    body.push_str(&upload_form(&view.jd_text));

    if let Some(report) = &view.report {
        body.push_str(&results(report));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>AI Resume Screener</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<main>\n{body}</main>\n</body>\n</html>\n"
    )
}

fn upload_form(jd_text: &str) -> String {
    format!(
        r#"<form method="post" action="/analyze" enctype="multipart/form-data">
<div class="columns">
  <div>
    <label for="{RESUME_FIELD}">Upload Resume (PDF)</label>
    <input id="{RESUME_FIELD}" name="{RESUME_FIELD}" type="file" accept="application/pdf,.pdf" required>
  </div>
  <div>
    <label for="{JD_FIELD}">Paste Job Description</label>
    <textarea id="{JD_FIELD}" name="{JD_FIELD}" required>{jd}</textarea>
  </div>
</div>
<button type="submit">Analyze</button>
</form>
"#,
        jd = escape_html(jd_text)
    )
}

fn results(report: &ScreeningReport) -> String {
    let analysis = &report.analysis;
    let mut html = String::from("<section class=\"results\">\n<h2>Analysis Results</h2>\n");

    for warning in &report.warnings {
        html.push_str(&alert(AlertKind::Warning, warning));
    }

    let band = analysis.band();
    html.push_str(&format!(
        "<div class=\"metric-label\">Match Score</div>\n\
         <div class=\"metric\">{}%<span class=\"band {}\">{}</span></div>\n",
        analysis.match_score,
        band_class(band),
        band.label()
    ));
    if analysis.experience > 0 {
        html.push_str(&format!(
            "<p>Relevant experience: {} year{}</p>\n",
            analysis.experience,
            if analysis.experience == 1 { "" } else { "s" }
        ));
    }

    html.push_str("<div class=\"columns\">\n<div>\n<h3>✅ Matching Skills</h3>\n");
    for skill in &analysis.matching_skills {
        html.push_str(&alert(AlertKind::Success, &format!("- {skill}")));
    }
    html.push_str("</div>\n<div>\n<h3>❌ Missing Skills</h3>\n");
    for skill in &analysis.missing_skills {
        html.push_str(&alert(AlertKind::Error, &format!("- {skill}")));
    }
    html.push_str("</div>\n</div>\n");

    html.push_str("<h3>💡 Improvement Suggestions</h3>\n");
    for suggestion in &analysis.suggestions {
        html.push_str(&alert(AlertKind::Info, &format!("- {suggestion}")));
    }

    if !analysis.summary.trim().is_empty() {
        html.push_str(&format!(
            "<h3>📝 Summary</h3>\n<p>{}</p>\n",
            escape_html(&analysis.summary)
        ));
    }

    html.push_str(&format!(
        "<p class=\"meta\">Request {} · parsed with {} · {} characters · analyzed {}</p>\n</section>\n",
        report.request_id,
        escape_html(&report.parser_backend),
        report.resume_chars,
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html
}

fn band_class(band: MatchBand) -> &'static str {
    match band {
        MatchBand::Strong => "strong",
        MatchBand::Moderate => "moderate",
        MatchBand::Weak => "weak",
    }
}

fn alert(kind: AlertKind, message: &str) -> String {
    format!(
        "<div class=\"{}\">{}</div>\n",
        kind.class(),
        escape_html(message)
    )
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
