//! Count command for overseas days within a window.
//!
//! Runs the correction pass (unless disabled), then the calculator, and
//! renders the result as text or JSON.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use od_core::{
    AbroadSegment, BorderEvent, CalculationResult, CalendarConfig, DateWindow, DocumentDays,
    ValidationIssue, calculate_overseas_days_as_of, calculate_per_document,
    correct_document_matching,
};
use serde::Serialize;

use super::correct::format_issues;
use super::input;
use super::util::{parse_date, parse_when, plural};
use crate::Config;

/// Options for the count command, as given on the command line.
#[derive(Debug, Clone)]
pub struct CountOptions {
    pub from: String,
    pub to: String,
    pub today: Option<String>,
    pub no_correct: bool,
    pub per_document: bool,
    pub json: bool,
}

/// Computed report data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountReport {
    pub utc_offset: String,
    pub today: NaiveDate,
    #[serde(flatten)]
    pub calculation: CalculationResult,
    pub corrected_count: usize,
    pub issues: Vec<ValidationIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentDays>>,
}

/// Builds the report for a set of validated events.
pub fn build_report(
    events: &[BorderEvent],
    from: &DateTime<FixedOffset>,
    to: &DateTime<FixedOffset>,
    calendar: &CalendarConfig,
    today: NaiveDate,
    correct: bool,
    per_document: bool,
) -> CountReport {
    let matching = correct.then(|| correct_document_matching(events));
    let counted: &[BorderEvent] = matching
        .as_ref()
        .map_or(events, |m| m.corrected_events.as_slice());

    let calculation = calculate_overseas_days_as_of(counted, from, to, calendar, today);
    let documents =
        per_document.then(|| calculate_per_document(counted, calculation.window, today));

    let (corrected_count, issues) =
        matching.map_or((0, Vec::new()), |m| (m.corrected_count, m.issues));

    CountReport {
        utc_offset: calendar.utc_offset().to_string(),
        today,
        calculation,
        corrected_count,
        issues,
        documents,
    }
}

fn overlaps(segment: &AbroadSegment, window: DateWindow, today: NaiveDate) -> bool {
    segment.exit_date <= window.to && segment.end_or(today) >= window.from
}

/// Formats the report for terminal output.
pub fn format_report(report: &CountReport) -> String {
    let mut out = String::new();
    let calc = &report.calculation;
    let window = calc.window;

    let _ = writeln!(
        out,
        "Overseas days: {} / {} ({} to {}, UTC{})",
        calc.total_overseas_days,
        window.len_days(),
        window.from,
        window.to,
        report.utc_offset
    );
    let _ = writeln!(
        out,
        "Records: {} ({} overseas, {} domestic)",
        calc.total_records,
        calc.overseas_records.len(),
        calc.domestic_records.len()
    );

    let segments: Vec<_> = calc
        .segments
        .iter()
        .filter(|s| overlaps(s, window, report.today))
        .collect();
    if !segments.is_empty() {
        out.push_str("\nAbroad segments:\n");
        for segment in segments {
            let end = segment.end_or(report.today);
            let days = (end - segment.exit_date).num_days() + 1;
            let suffix = if segment.is_open() { " (still abroad)" } else { "" };
            let _ = writeln!(
                out,
                "  {} to {}  {}{suffix}",
                segment.exit_date,
                end,
                plural(days, "day")
            );
        }
    }

    if let Some(documents) = &report.documents {
        out.push_str("\nPer document:\n");
        for doc in documents {
            let _ = writeln!(
                out,
                "  {}: {}, {}",
                doc.document,
                plural(doc.overseas_days, "day"),
                plural(doc.records, "record")
            );
        }
    }

    if !report.issues.is_empty() {
        let _ = writeln!(out, "\nIssues ({} corrected):", report.corrected_count);
        out.push_str(&format_issues(&report.issues));
    }

    out
}

/// Formats the report as pretty JSON.
pub fn format_report_json(report: &CountReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report")
}

/// Runs the count command.
pub fn run(path: &Path, options: &CountOptions, config: &Config) -> Result<()> {
    let calendar = config.calendar().context("invalid utc_offset_hours")?;
    let now = Utc::now();
    let from = parse_when(&options.from, &calendar, now).context("invalid --from")?;
    let to = parse_when(&options.to, &calendar, now).context("invalid --to")?;
    let today = options
        .today
        .as_deref()
        .map(parse_date)
        .transpose()
        .context("invalid --today")?
        .unwrap_or_else(|| calendar.today());

    let events = input::read_events(path)?;
    let correct = config.auto_correct && !options.no_correct;
    let report = build_report(
        &events,
        &from,
        &to,
        &calendar,
        today,
        correct,
        options.per_document,
    );

    if options.json {
        println!("{}", format_report_json(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}
