//! Line scanner for the IMDb `locations.list` dump.
//!
//! A record looks like
//! `"#1 Single" (2006) {Cats and Dogs (#1.4)}\t\t\tLos Angeles, California, USA`
//! or `Avatar (2009)\t\tKauai, Hawaii, USA\t(some scenes)`.
//! Only a fixed window of lines is looked at.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::config::ScanConfig;
use crate::error::{MovieMapError, Result};

/// One (title, year, location) record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MovieEntry {
    pub title: String,
    pub year: u16,
    pub location: String,
}

/// Lines with 1-based number `n` where `skip < n <= last` are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub skip: usize,
    pub last: usize,
}

impl Default for ScanWindow {
    fn default() -> Self {
        Self {
            skip: 125_000,
            last: 150_000,
        }
    }
}

impl From<&ScanConfig> for ScanWindow {
    fn from(config: &ScanConfig) -> Self {
        Self {
            skip: config.skip_lines,
            last: config.last_line,
        }
    }
}

impl ScanWindow {
    pub fn contains(&self, line_number: usize) -> bool {
        self.skip < line_number && line_number <= self.last
    }
}

/// Open `path` and scan it. See [`scan_entries`].
pub fn scan_file(path: &Path, year: u16, window: ScanWindow) -> Result<Vec<MovieEntry>> {
    let file = File::open(path).map_err(|e| MovieMapError::io(path, e))?;
    scan_entries(BufReader::new(file), year, window).map_err(|e| match e {
        MovieMapError::Io { source, .. } => MovieMapError::io(path, source),
        other => other,
    })
}

/// Collect the unique entries for `year` inside `window`, in first-seen order.
///
/// Lines are decoded lossily since the dump is not reliably UTF-8.
pub fn scan_entries<R: BufRead>(mut reader: R, year: u16, window: ScanWindow) -> Result<Vec<MovieEntry>> {
    let needle = year.to_string();
    let mut seen: HashSet<MovieEntry> = HashSet::new();
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0usize;
    let mut matched_lines = 0usize;

    while line_number < window.last {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| MovieMapError::io("<input>", e))?;
        if read == 0 {
            break;
        }
        line_number += 1;
        if !window.contains(line_number) {
            continue;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if !line.contains(&needle) {
            continue;
        }
        matched_lines += 1;

        match parse_line(line, year) {
            Some(entry) => {
                if seen.insert(entry.clone()) {
                    entries.push(entry);
                }
            }
            None => tracing::trace!(line_number, "skipping line without a location field"),
        }
    }

    tracing::debug!(
        lines_read = line_number,
        matched_lines,
        unique = entries.len(),
        "scan finished"
    );
    Ok(entries)
}

/// Split a record into title and location. `None` when there is no location field.
pub fn parse_line(line: &str, year: u16) -> Option<MovieEntry> {
    let mut fields = line.split('\t').filter(|f| !f.is_empty());
    let body = fields.next()?;
    let location = fields.next()?.trim();
    if location.is_empty() {
        return None;
    }
    Some(MovieEntry {
        title: extract_title(body),
        year,
        location: location.to_string(),
    })
}

/// Series titles are quoted (`"Friends" (1994)`), films end in a year in
/// parentheses (`Avatar (2009)`).
pub fn extract_title(body: &str) -> String {
    if body.contains('"') {
        let mut chars = body.chars();
        chars.next();
        let rest = chars.as_str();
        return match rest.find('"') {
            Some(end) => rest[..end].to_string(),
            // Unterminated quote: keep the rest rather than an empty title.
            None => rest.trim().to_string(),
        };
    }
    match body.find('(') {
        Some(paren) => body[..paren].trim().to_string(),
        None => body.trim().to_string(),
    }
}
