//! Prompt construction for plan generation, enhancement, and suggestions.
//!
//! The plan-generation payload is exactly three message blocks: fixed
//! system instructions, a line-oriented rendering of the draft, and a
//! fixed output-format contract. Building is total: any draft, however
//! sparse, yields a well-formed payload.

use crate::completion::ChatMessage;
use crate::types::{Activity, EventDraft};

/// Literal token rendered for any field the user left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

const SYSTEM_PROMPT: &str = "You are an expert event planner. Draft a complete, practical plan \
for the event described by the user. Never overwrite details the user has already provided; \
treat them as fixed. For every field marked \"Not specified\", fill in recommendations that \
fit the theme and purpose of the event.";

const QUESTIONS_CLAUSE: &str = " The user has listed questions for you. Address each question \
explicitly within the plan's recommendations.";

const OUTPUT_REQUIREMENTS: &str = r#"Return ONLY a JSON object, with no other text before or after it.
The object must have exactly these keys:

{
  "overview": "2-3 sentence summary of the plan",
  "timeline": [{"time": "6:00 PM", "activity": "what happens at this time"}],
  "schedule": [{"activity": "name", "details": "what it involves", "location": "where"}],
  "logistics": ["logistics item"],
  "materials": ["material or supply"],
  "recommendations": ["recommendation"],
  "tips": ["practical tip"]
}

Format every time as 12-hour H:MM AM/PM (for example 6:30 PM).
When presenting the plan as text, render the schedule as a bulleted list rather than subheadings."#;

// ============================================================================
// Draft rendering
// ============================================================================

/// Per-field label and rendered value, in the fixed line order of the
/// user-input block. `None` means the field is unspecified.
///
/// This is the single source for both the per-line rendering and the
/// "Not specified fields" summary: a label appears in the summary exactly
/// when its line renders the Not-specified token.
fn field_lines(draft: &EventDraft) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("Title", text_value(&draft.title)),
        ("Description", text_value(&draft.description)),
        ("Attendees", draft.attendees.map(|n| n.to_string())),
        ("Location", text_value(&draft.location)),
        ("Purpose", text_value(&draft.purpose)),
        ("Date", dates_value(draft)),
        ("Start Time", text_value(&draft.start_time)),
        ("End Time", text_value(&draft.end_time)),
        ("Recurring", recurring_value(draft)),
        ("Activities", activities_value(&draft.activities)),
        ("Questions for AI", questions_value(&draft.questions)),
    ]
}

fn text_value(field: &Option<String>) -> Option<String> {
    field
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn dates_value(draft: &EventDraft) -> Option<String> {
    if draft.dates.is_empty() {
        return None;
    }
    Some(
        draft
            .dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn recurring_value(draft: &EventDraft) -> Option<String> {
    match draft.recurring {
        Some(true) => {
            let frequency = text_value(&draft.recurrence_frequency)
                .unwrap_or_else(|| "frequency not specified".to_string());
            Some(format!("Yes ({})", frequency))
        }
        Some(false) => Some("No".to_string()),
        None => None,
    }
}

fn activities_value(activities: &[Activity]) -> Option<String> {
    let rendered: Vec<String> = activities
        .iter()
        .filter(|a| !a.name.trim().is_empty())
        .map(|a| match text_value(&a.description) {
            Some(desc) => format!("{} ({})", a.name.trim(), desc),
            None => a.name.trim().to_string(),
        })
        .collect();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join(", "))
    }
}

fn questions_value(questions: &[String]) -> Option<String> {
    let rendered: Vec<&str> = questions
        .iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .collect();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join("; "))
    }
}

/// Render the user-input block: one line per field in fixed order, then
/// the summary line naming every unspecified field.
pub fn render_draft_block(draft: &EventDraft) -> String {
    let mut lines = Vec::new();
    let mut missing = Vec::new();

    for (label, value) in field_lines(draft) {
        match value {
            Some(v) => lines.push(format!("- **{}:** {}", label, v)),
            None => {
                lines.push(format!("- **{}:** {}", label, NOT_SPECIFIED));
                missing.push(label);
            }
        }
    }

    let summary = if missing.is_empty() {
        "None".to_string()
    } else {
        missing.join(", ")
    };
    lines.push(format!("Not specified fields: {}", summary));

    lines.join("\n")
}

/// Assemble the three-block payload around an already-rendered input block.
pub fn assemble_messages(draft: &EventDraft, input_block: String) -> Vec<ChatMessage> {
    let has_questions = draft.questions.iter().any(|q| !q.trim().is_empty());
    let mut system = SYSTEM_PROMPT.to_string();
    if has_questions {
        system.push_str(QUESTIONS_CLAUSE);
    }
    vec![
        ChatMessage::system(system),
        ChatMessage::user(input_block),
        ChatMessage::user(OUTPUT_REQUIREMENTS),
    ]
}

/// Build the full plan-generation payload for a draft.
pub fn build_plan_messages(draft: &EventDraft) -> Vec<ChatMessage> {
    let input_block = render_draft_block(draft);
    assemble_messages(draft, input_block)
}

// ============================================================================
// Secondary prompts
// ============================================================================

/// Single-block prompt for reworking an existing flattened plan.
pub fn build_enhancement_prompt(plan_text: &str, request: &str) -> String {
    format!(
        "Here is an existing event plan:\n\n{}\n\nThe user asks: {}\n\n\
         Rework the plan to satisfy the request. Keep every detail that still \
         applies and return the full updated plan as plain text.",
        plan_text, request
    )
}

/// Short free-text prompt asking for activity name suggestions.
pub fn build_suggestion_prompt(
    event_type: &str,
    attendees: Option<u32>,
    location: Option<&str>,
) -> String {
    let mut prompt = format!("Suggest 5-10 activity names for a {} event.", event_type);
    if let Some(count) = attendees {
        prompt.push_str(&format!(" Around {} people will attend.", count));
    }
    if let Some(loc) = location.map(str::trim).filter(|l| !l.is_empty()) {
        prompt.push_str(&format!(" It takes place at {}.", loc));
    }
    prompt.push_str(" Return one activity name per line, with no numbering or commentary.");
    prompt
}
