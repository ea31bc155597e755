//! Numeric value recovery.
//!
//! `extract_value` reads one line. `claim_values` walks the window around
//! every test mention and assigns each mention the first line that yields
//! a value. A line is claimed at most once, earlier mentions first.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::{AbnormalFlag, TestMention};
use crate::pipeline_config::SearchWindow;
use crate::reference::LabCatalog;

// A number must not continue a word, another number, a date or a range.
static RE_FLAG_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^A-Za-z0-9./\-–<>])(\d+(?:\.\d+)?)(?:\s*([^\s\d.(][^\s(]*))?\s+(HI|LO)\b")
        .unwrap()
});
// Group 3 is set when the number opens a "low-high" span.
static RE_FLAG_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(HI|LO)\s+(\d+(?:\.\d+)?)(\s*[-–]\s*\d)?").unwrap()
});
static RE_BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)$").unwrap());
static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^A-Za-z0-9./\-–<>])(\d+(?:\.\d+)?)").unwrap());
static RE_PAREN_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^A-Za-z0-9./\-–<>])(\d+(?:\.\d+)?)\s*\(\s*(HI|LO)\s*\)").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedValue {
    pub value: f64,
    pub flag: AbnormalFlag,
}

/// Apply the value templates in precedence order; the first hit wins.
///
/// Units are recognized through the catalog's alias table, so "1 of 2" or
/// "2 hour" never pass for a number with a unit.
pub fn extract_value(line: &str, catalog: &LabCatalog) -> Option<ExtractedValue> {
    let line = line.trim();

    // "11.0 LO 13.5-17.5" carries both flag forms; the trailing one is the result.
    for caps in RE_FLAG_TRAILING.captures_iter(line) {
        let unit_ok = caps
            .get(2)
            .map_or(true, |m| catalog.unit_at_start(m.as_str()).is_some());
        if unit_ok {
            return from_captures(&caps, 1, Some(3));
        }
    }
    if let Some(caps) = RE_FLAG_LEADING
        .captures_iter(line)
        .find(|caps| caps.get(3).is_none())
    {
        return from_captures(&caps, 2, Some(1));
    }
    if let Some(caps) = RE_BARE.captures(line) {
        return from_captures(&caps, 1, None);
    }
    for caps in RE_NUMBER.captures_iter(line) {
        let Some(number) = caps.get(1) else { continue };
        if closes_span(line, number.start()) {
            continue;
        }
        if catalog.unit_at_start(line[number.end()..].trim_start()).is_some() {
            return from_captures(&caps, 1, None);
        }
    }
    if let Some(caps) = RE_PAREN_FLAG.captures(line) {
        return from_captures(&caps, 1, Some(2));
    }
    None
}

/// Whether the number at `start` is the upper end of a spaced-out span
/// ("70 - 100") or follows a comparison sign ("< 200").
fn closes_span(line: &str, start: usize) -> bool {
    let before = line[..start].trim_end();
    if before.ends_with(['<', '>']) {
        return true;
    }
    before
        .strip_suffix(['-', '–'])
        .is_some_and(|rest| rest.trim_end().ends_with(|c: char| c.is_ascii_digit()))
}

fn from_captures(caps: &Captures, value_group: usize, flag_group: Option<usize>) -> Option<ExtractedValue> {
    let value: f64 = caps.get(value_group)?.as_str().parse().ok()?;
    let flag = flag_group
        .and_then(|g| caps.get(g))
        .map(|m| AbnormalFlag::from_token(m.as_str()))
        .unwrap_or_default();
    Some(ExtractedValue { value, flag })
}

/// A mention together with the line its value was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueClaim {
    pub mention: TestMention,
    pub value_line: usize,
    pub value: ExtractedValue,
}

/// Search order around a mention: its own line, then forward lines
/// nearest first, then backward lines nearest first.
fn value_search_order(anchor: usize, window: SearchWindow, line_count: usize) -> Vec<usize> {
    std::iter::once(anchor)
        .chain((1..=window.forward).map(|d| anchor + d))
        .chain((1..=window.backward).filter_map(|d| anchor.checked_sub(d)))
        .filter(|&i| i < line_count)
        .collect()
}

pub fn claim_values(
    lines: &[String],
    mentions: &[TestMention],
    catalog: &LabCatalog,
    window: SearchWindow,
) -> Vec<ValueClaim> {
    let mention_lines: HashSet<usize> = mentions.iter().map(|m| m.line_index).collect();
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut claims = Vec::with_capacity(mentions.len());

    for mention in mentions {
        let anchor = mention.line_index;
        let hit = value_search_order(anchor, window, lines.len())
            .into_iter()
            .filter(|&i| i == anchor || !mention_lines.contains(&i))
            .filter(|i| !claimed.contains(i))
            .find_map(|i| extract_value(&lines[i], catalog).map(|v| (i, v)));

        match hit {
            Some((value_line, value)) => {
                claimed.insert(value_line);
                claims.push(ValueClaim {
                    mention: mention.clone(),
                    value_line,
                    value,
                });
            }
            None => tracing::debug!(
                test = %mention.canonical_name,
                line = anchor,
                "No value found near test mention"
            ),
        }
    }

    claims
}
