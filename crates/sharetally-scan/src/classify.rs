//! Line classification and field extraction.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use sharetally_core::units::{parse_age, parse_size};
use sharetally_core::{EntryKind, LineFormat, ParsedRecord, RawLine, Rejection};

/// `<type> <owner> <size> <age> <path...>` in one pass.
static DENSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([dDfF])\s+(\S+)\s+(\d+(?:\.\d+)?(?i:[kmgt]i?b|b)?)\s+(\+?(?:\d+[a-zA-Z]+)+)\s+(.+)$",
    )
    .expect("dense record pattern is valid")
});

/// Legacy size column: a number with an optional unit word of any spelling.
static LEGACY_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?[a-zA-Z]*$").expect("legacy size pattern is valid")
});

/// Age column: an optional `+` then one or more `<digits><letters>` groups.
static AGE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?(?:\d+[a-zA-Z]+)+$").expect("age pattern is valid")
});

/// A leading item count followed by `scanned`, e.g. `1,204 scanned, 3 errors`.
static COUNT_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\d,.]+\s+scanned").expect("summary pattern is valid")
});

/// Turns raw scanner lines into records.
#[derive(Debug, Clone)]
pub struct Classifier {
    formats: Vec<LineFormat>,
}

impl Classifier {
    /// Create a classifier trying the given layouts in order.
    pub fn new(formats: impl Into<Vec<LineFormat>>) -> Self {
        Self {
            formats: formats.into(),
        }
    }

    /// Enabled layouts in priority order.
    pub fn formats(&self) -> &[LineFormat] {
        &self.formats
    }

    /// Classify one line.
    pub fn classify<'a>(&self, line: &'a RawLine) -> Result<ParsedRecord<'a>, Rejection> {
        let text = match line {
            RawLine::Error(_) => return Err(Rejection::ErrorSignal),
            RawLine::Output(text) => text.trim_end(),
        };
        self.classify_text(text)
    }

    /// Classify a line of regular output.
    pub fn classify_text<'a>(&self, text: &'a str) -> Result<ParsedRecord<'a>, Rejection> {
        let text = text.trim_end();
        if text.trim_start().is_empty() {
            return Err(Rejection::Blank);
        }
        if is_header(text) {
            return Err(Rejection::Header);
        }

        for format in &self.formats {
            let parsed = match format {
                LineFormat::Dense => parse_dense(text),
                LineFormat::Legacy => parse_legacy(text),
            };
            if let Some(record) = parsed {
                return Ok(record);
            }
        }

        trace!(line = text, "unrecognized scanner line");
        Err(Rejection::Unrecognized)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new([LineFormat::Dense, LineFormat::Legacy])
    }
}

/// Banner, summary and column-rule lines the scanner prints around records.
fn is_header(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with("scanned")
        || text.starts_with("XCP")
        || text.starts_with("xcp")
        || text.starts_with("---")
        || COUNT_SUMMARY.is_match(text)
}

fn parse_dense(text: &str) -> Option<ParsedRecord<'_>> {
    let caps = DENSE.captures(text.trim_start())?;
    let kind = EntryKind::from_code(caps.get(1)?.as_str())?;
    let owner = caps.get(2)?.as_str();
    let size = parse_size(caps.get(3)?.as_str());
    let age = parse_age(caps.get(4)?.as_str());
    let path = caps.get(5)?.as_str().trim();

    Some(build(kind, owner, size, age, path))
}

/// Legacy layout: four whitespace-separated columns, then the path.
///
/// Size and age columns must be number-and-unit shaped or the line is
/// rejected. A well-shaped token with an unknown unit (`12XB`, `3w`) falls back
/// to zero and marks the record. Whitespace inside the path is kept verbatim.
fn parse_legacy(text: &str) -> Option<ParsedRecord<'_>> {
    let mut rest = text.trim_start();
    let mut columns: [&str; 4] = [""; 4];
    for column in &mut columns {
        let end = rest.find(char::is_whitespace)?;
        *column = &rest[..end];
        rest = rest[end..].trim_start();
    }
    let path = rest.trim();
    if path.is_empty() {
        return None;
    }

    let [code, owner, size, age] = columns;
    let kind = EntryKind::from_code(code)?;
    if !LEGACY_SIZE.is_match(size) || !AGE_SHAPE.is_match(age) {
        return None;
    }
    Some(build(kind, owner, parse_size(size), parse_age(age), path))
}

fn build<'a>(
    kind: EntryKind,
    owner: &'a str,
    size: Option<u64>,
    age: Option<u64>,
    path: &'a str,
) -> ParsedRecord<'a> {
    ParsedRecord {
        kind,
        owner,
        size_bytes: size.unwrap_or(0),
        age_seconds: age.unwrap_or(0),
        path,
        unit_fallback: size.is_none() || age.is_none(),
    }
}
