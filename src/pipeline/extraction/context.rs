//! Unit and printed reference-range lookup around a value line.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline_config::SearchWindow;
use crate::reference::LabCatalog;

static RE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9./\-–])(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)(?:$|[^0-9./\-–])")
        .unwrap()
});
static RE_DESIRED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdesired\s*:?\s*([<>]=?)\s*(\d+(?:\.\d+)?)").unwrap());
static RE_LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:reference|normal|range)\s*:\s*([<>]=?\s*\d+(?:\.\d+)?|\d+(?:\.\d+)?\s*[-–]\s*\d+(?:\.\d+)?)",
    )
    .unwrap()
});

/// Unit and printed range found near a value. Empty strings mean nothing
/// was found, which is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedContext {
    pub unit: String,
    pub unit_line: Option<usize>,
    pub reference_range_text: String,
    pub range_line: Option<usize>,
}

/// Lines a candidate may read from, and lines that belong to others.
pub struct LineOwnership<'a> {
    /// The candidate's own mention and value lines.
    pub own: [usize; 2],
    /// Mention and value lines of every candidate.
    pub owned: &'a HashSet<usize>,
}

impl LineOwnership<'_> {
    fn readable(&self, line: usize) -> bool {
        self.own.contains(&line) || !self.owned.contains(&line)
    }
}

/// Anchor first, then outward: +1, -1, +2, -2, ... each side bounded by
/// its own window length.
pub fn outward_order(anchor: usize, window: SearchWindow, line_count: usize) -> Vec<usize> {
    let mut order = vec![anchor];
    for d in 1..=window.forward.max(window.backward) {
        if d <= window.forward {
            order.push(anchor + d);
        }
        if d <= window.backward {
            if let Some(i) = anchor.checked_sub(d) {
                order.push(i);
            }
        }
    }
    order.retain(|&i| i < line_count);
    order
}

/// Printed reference range in a single line, normalized without spaces:
/// "230-480", "<1.00", ">1.20".
pub fn find_range_text(line: &str) -> Option<String> {
    if let Some(caps) = RE_SPAN.captures(line) {
        let low = caps.get(1)?.as_str();
        let high = caps.get(2)?.as_str();
        let (l, h): (f64, f64) = (low.parse().ok()?, high.parse().ok()?);
        if l < h {
            return Some(format!("{low}-{high}"));
        }
    }
    if let Some(caps) = RE_DESIRED.captures(line) {
        return Some(format!("{}{}", caps.get(1)?.as_str(), caps.get(2)?.as_str()));
    }
    if let Some(caps) = RE_LABELED.captures(line) {
        let compact: String = caps
            .get(1)?
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '–' { '-' } else { c })
            .collect();
        return Some(compact);
    }
    None
}

pub fn resolve_context(
    lines: &[String],
    value_line: usize,
    ownership: &LineOwnership<'_>,
    catalog: &LabCatalog,
    unit_window: SearchWindow,
    range_window: SearchWindow,
) -> ResolvedContext {
    let mut context = ResolvedContext::default();

    for i in outward_order(value_line, unit_window, lines.len()) {
        if !ownership.readable(i) {
            continue;
        }
        if let Some(unit) = catalog.find_unit(&lines[i]) {
            context.unit = unit.to_string();
            context.unit_line = Some(i);
            break;
        }
    }

    for i in outward_order(value_line, range_window, lines.len()) {
        if !ownership.readable(i) {
            continue;
        }
        if let Some(text) = find_range_text(&lines[i]) {
            context.reference_range_text = text;
            context.range_line = Some(i);
            break;
        }
    }

    context
}
