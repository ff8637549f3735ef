//! Correct command: align entry documents with their paired exits.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use od_core::{MatchingResult, ValidationIssue, correct_document_matching};

use super::input;
use super::util::plural;

/// Runs the correct command.
///
/// Writes corrected events as JSON Lines to stdout and the summary to
/// stderr, or the whole result as JSON with `json`.
pub fn run(path: &Path, json: bool) -> Result<()> {
    let events = input::read_events(path)?;
    let result = correct_document_matching(&events);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for event in &result.corrected_events {
        println!("{}", serde_json::to_string(event)?);
    }
    eprint!("{}", format_summary(&result));
    Ok(())
}

/// Formats the human-readable correction summary.
pub fn format_summary(result: &MatchingResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Corrected {} of {}",
        result.corrected_count,
        plural(result.original_count, "record")
    );
    out.push_str(&format_issues(&result.issues));
    out
}

/// Formats issues one per entry, suggestion indented below the message.
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    let mut out = String::new();
    for issue in issues {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            issue.severity.as_str(),
            issue.kind.as_str(),
            issue.message
        );
        let _ = writeln!(out, "    {}", issue.suggestion);
    }
    out
}
