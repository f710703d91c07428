//! Core data model: event drafts, structured plans, and persisted events.
//!
//! Everything here crosses the FFI boundary to the mobile shell as JSON,
//! so all types are serde camelCase and tolerant of absent fields.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Draft input
// ============================================================================

/// A planned activity entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// User-entered, possibly-incomplete event description.
///
/// Every field may be absent. Absence means "not specified" — the prompt
/// builder renders it literally as `Not specified` rather than dropping
/// the line, so the model always sees the full field list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    /// One or more calendar dates for the event.
    #[serde(default)]
    pub dates: Vec<NaiveDate>,
    /// Display string, e.g. "6:30 PM". Kept as entered.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub recurring: Option<bool>,
    #[serde(default)]
    pub recurrence_frequency: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Free-text questions the user wants the planner to address.
    #[serde(default)]
    pub questions: Vec<String>,
}

// ============================================================================
// Structured plan
// ============================================================================

/// One timeline row: a 12-hour clock label plus what happens then.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineEntry {
    pub time: String,
    pub activity: String,
}

/// One schedule row with details and a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleEntry {
    pub activity: String,
    pub details: String,
    pub location: String,
}

/// Canonical structured result of plan generation.
///
/// Decoded straight from model output, so every field defaults: a response
/// that omits a section still parses, and consumers treat the missing
/// collections as empty rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredPlan {
    pub overview: String,
    pub timeline: Vec<TimelineEntry>,
    pub schedule: Vec<ScheduleEntry>,
    pub logistics: Vec<String>,
    pub materials: Vec<String>,
    pub recommendations: Vec<String>,
    pub tips: Vec<String>,
}

// ============================================================================
// Persisted event
// ============================================================================

/// A persisted event record: the draft fields plus identity, timestamps,
/// and the flattened text of the most recent generated plan (if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(flatten)]
    pub draft: EventDraft,
    /// Flattened rendering of the latest StructuredPlan. None when
    /// generation failed or hasn't run yet.
    #[serde(default)]
    pub plan: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Event {
    /// Create a new event record from a draft, with a fresh id and
    /// both timestamps set to now.
    pub fn from_draft(draft: EventDraft) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            draft,
            plan: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Bump the updated-at timestamp to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}
