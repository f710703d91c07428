//! Deterministic flattening of a structured plan into display text.
//!
//! Used wherever only a single string is wanted: the event history list,
//! the persisted `plan` field, and enhancement input. Pure and idempotent:
//! the same plan always flattens to byte-identical output.

use crate::types::StructuredPlan;

/// Render a plan as a single markdown-ish string. Sections with no entries
/// are omitted entirely, headers included.
pub fn flatten_plan(plan: &StructuredPlan) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!("# Event Plan\n\n{}", plan.overview));

    if !plan.timeline.is_empty() {
        let body = plan
            .timeline
            .iter()
            .map(|e| format!("- **{}:** {}", e.time, e.activity))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("## Timeline\n{}", body));
    }

    if !plan.schedule.is_empty() {
        let body = plan
            .schedule
            .iter()
            .map(|e| format!("- **{}** - {} (Location: {})", e.activity, e.details, e.location))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("## Schedule\n{}", body));
    }

    let simple_sections: [(&str, &[String]); 4] = [
        ("Logistics", &plan.logistics),
        ("Materials", &plan.materials),
        ("Recommendations", &plan.recommendations),
        ("Tips", &plan.tips),
    ];
    for (label, items) in simple_sections {
        if items.is_empty() {
            continue;
        }
        let body = items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("## {}\n{}", label, body));
    }

    sections.join("\n\n")
}
