//! Terminal and JSON rendering for CLI surfaces.

use crate::core::model::{KNOWN_CASE_TYPES, TestCase};
use crate::core::store::StoreStats;
use crate::importer::ImportReport;
use colored::Colorize;
use serde_json::Value as JsonValue;
use ulid::Ulid;

/// Collapse whitespace and cut to `max_chars`, marking the cut with `...`.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", cut)
}

/// First `max_items` messages as compacted bullet lines, plus a trailing
/// `(+N more)` line when some were left out.
pub fn issue_lines(messages: &[String], max_items: usize, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = messages
        .iter()
        .take(max_items)
        .map(|m| format!("- {}", compact_line(m, max_chars)))
        .collect();
    if messages.len() > max_items {
        lines.push(format!("(+{} more)", messages.len() - max_items));
    }
    lines
}

/// Envelope wrapping every JSON response: `cmd`, `status`, a fresh `event_id`,
/// then the fields of `extra`.
pub fn envelope(cmd: &str, status: &str, extra: JsonValue) -> JsonValue {
    let mut body = serde_json::Map::new();
    body.insert("cmd".into(), cmd.into());
    body.insert("status".into(), status.into());
    body.insert("event_id".into(), Ulid::new().to_string().into());
    if let JsonValue::Object(fields) = extra {
        body.extend(fields);
    }
    JsonValue::Object(body)
}

pub fn render_report(report: &ImportReport, max_issues: usize, max_chars: usize) -> String {
    let source = report.source.as_deref().unwrap_or("<input>");
    let mut out = Vec::new();
    if report.imported > 0 {
        out.push(format!(
            "{} Imported {} test case(s) from {}",
            "✓".bright_green(),
            report.imported,
            source.bright_white()
        ));
    } else {
        out.push(format!(
            "{} No test cases imported from {}",
            "●".yellow(),
            source.bright_white()
        ));
    }
    if !report.issues.is_empty() {
        out.push(format!(
            "{} Some rows could not be imported:",
            "!".bright_yellow()
        ));
        out.extend(issue_lines(&report.errors(), max_issues, max_chars));
    }
    out.join("\n")
}

/// One case the way the listing page shows it.
pub fn render_case(case: &TestCase) -> String {
    let mut out = vec![format!(
        "{} {} {}",
        case.id.bright_white().bold(),
        case.name,
        format!("[{}]", case.case_type).cyan()
    )];
    if !case.description.is_empty() {
        out.push(format!("  Description: {}", case.description));
    }
    if !case.tags.is_empty() {
        out.push(format!("  Tags: {}", case.tags.join(", ")));
    }
    out.push("  Steps:".to_string());
    for (i, step) in case.steps.iter().enumerate() {
        let with_value = if step.value.is_empty() {
            String::new()
        } else {
            format!(" with value `{}`", step.value)
        };
        out.push(format!(
            "  - Step {}: `{}` on `{}`{} -> Expected: `{}`",
            i + 1,
            step.action,
            step.target,
            with_value,
            step.expected_result
        ));
    }
    out.join("\n")
}

pub fn render_stats(stats: &StoreStats) -> String {
    let mut out = vec![format!("Total cases: {}", stats.total.to_string().bold())];
    for known in KNOWN_CASE_TYPES {
        out.push(format!("  {:<12} {}", known, stats.count_of(known)));
    }
    for (case_type, count) in &stats.by_type {
        if !KNOWN_CASE_TYPES.contains(&case_type.as_str()) {
            out.push(format!("  {:<12} {}", case_type, count));
        }
    }
    out.join("\n")
}
