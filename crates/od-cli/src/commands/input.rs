//! Reading border-crossing events at the ingestion boundary.
//!
//! Accepts either a JSON array of events or JSON Lines. Malformed records
//! (bad dates, unknown crossing types, non-numeric ids) are rejected here so
//! the core only ever sees validated events.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use od_core::BorderEvent;

/// Reads events from a file, or from stdin when `path` is `-`.
pub fn read_events(path: &Path) -> Result<Vec<BorderEvent>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read events from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    let events = parse_events(&content)?;
    tracing::debug!(count = events.len(), source = %path.display(), "loaded events");
    Ok(events)
}

/// Parses a JSON array or JSON Lines document into events.
pub fn parse_events(content: &str) -> Result<Vec<BorderEvent>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).context("invalid JSON array of events");
    }

    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event: BorderEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid event on line {}", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}
