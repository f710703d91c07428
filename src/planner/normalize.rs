//! Recovery of a structured plan from raw model output.
//!
//! Models are asked for bare JSON but routinely wrap it in code fences,
//! prose, typographic quotes, or trailing commas. Recovery is a cascade of
//! independent strategies tried in a fixed order; if nothing parses, a
//! fixed fallback plan is returned. This function never errors.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::StructuredPlan;

/// Overview text of the fallback plan returned when every strategy fails.
pub const FALLBACK_OVERVIEW: &str = "Unable to parse AI response. Please regenerate the plan.";

const FALLBACK_LOGISTICS: &str = "Plan details could not be recovered from the AI response.";
const FALLBACK_RECOMMENDATION: &str = "Regenerate the plan to get a fresh structured response.";

/// Map a raw completion text to a plan.
///
/// Strategy order: direct parse, fenced-block extraction, brace-boundary
/// extraction, character sanitation, second parse, fallback object. Each
/// stage that fails simply hands the working text to the next.
pub fn normalize_response(raw: &str) -> StructuredPlan {
    if let Some(plan) = parse_plan(raw) {
        log::debug!("plan normalizer: direct parse succeeded");
        return plan;
    }

    let mut working = match extract_fenced_block(raw) {
        Some(inner) => {
            log::debug!("plan normalizer: extracted fenced code block");
            inner
        }
        None => raw.to_string(),
    };

    if let Some(span) = extract_object_span(&working) {
        log::debug!("plan normalizer: truncated to brace-delimited span");
        working = span.to_string();
    }

    let cleaned = sanitize(&working);
    if let Some(plan) = parse_plan(&cleaned) {
        log::debug!("plan normalizer: parse succeeded after sanitation");
        return plan;
    }

    let residual: Vec<char> = residual_problem_chars(&cleaned);
    if !residual.is_empty() {
        log::warn!(
            "plan normalizer: sanitized text still contains problematic characters: {:?}",
            residual
        );
    }
    log::warn!("plan normalizer: all recovery strategies failed, returning fallback plan");
    fallback_plan()
}

/// The fixed plan returned when no strategy recovers a parseable object.
pub fn fallback_plan() -> StructuredPlan {
    StructuredPlan {
        overview: FALLBACK_OVERVIEW.to_string(),
        logistics: vec![FALLBACK_LOGISTICS.to_string()],
        recommendations: vec![FALLBACK_RECOMMENDATION.to_string()],
        ..Default::default()
    }
}

// ============================================================================
// Individual strategies
// ============================================================================

fn parse_plan(text: &str) -> Option<StructuredPlan> {
    serde_json::from_str(text).ok()
}

/// Pull the inner content out of the first triple-backtick fence,
/// skipping an optional language tag on the opening line.
fn extract_fenced_block(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let newline = after.find('\n')?;
    // Anything between the fence and the newline is a language tag ("json").
    let body = &after[newline + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim().to_string())
}

/// Truncate to the span from the first `{` to the last `}`, discarding
/// surrounding prose. Returns None when no such span exists.
fn extract_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Character-level cleanup: strip backticks, drop trailing commas before a
/// closing brace or bracket, collapse blank lines, trim, and normalize
/// typographic quotes to their ASCII equivalents.
fn sanitize(text: &str) -> String {
    let without_ticks = text.replace('`', "");
    let without_trailing_commas = trailing_comma_re().replace_all(&without_ticks, "$1");
    let collapsed = without_trailing_commas
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    collapsed
        .trim()
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("static pattern"))
}

/// Quote-like characters sanitation does not cover; reported for
/// diagnostics when a response still fails after cleanup.
fn residual_problem_chars(text: &str) -> Vec<char> {
    let mut found: Vec<char> = text
        .chars()
        .filter(|c| {
            matches!(
                c,
                '\u{00AB}' | '\u{00BB}' | '\u{201A}' | '\u{201E}' | '\u{2032}' | '\u{2033}'
            )
        })
        .collect();
    found.dedup();
    found
}
