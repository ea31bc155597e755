use regex::Regex;

use super::catalog::UnitAlias;
use super::CatalogError;

/// One canonical unit with its compiled alias pattern.
#[derive(Debug)]
pub(crate) struct UnitMatcher {
    pub unit: String,
    pattern: Regex,
    leading: Regex,
}

impl UnitMatcher {
    /// Aliases are literal text. A match must not be glued to letters on
    /// either side, so "u/l" does not fire inside "mu/l" or "u/lb".
    pub fn compile(alias: &UnitAlias) -> Result<Self, CatalogError> {
        let alternatives = alias
            .aliases
            .iter()
            .map(|a| regex::escape(a))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"(?i)(?:^|[^A-Za-z/^])({alternatives})(?:$|[^A-Za-z])"
        ))
        .map_err(|e| CatalogError::InvalidPattern(alias.unit.clone(), e.to_string()))?;
        let leading = Regex::new(&format!(r"(?i)^(?:{alternatives})(?:$|[^A-Za-z])"))
            .map_err(|e| CatalogError::InvalidPattern(alias.unit.clone(), e.to_string()))?;

        Ok(Self {
            unit: alias.unit.clone(),
            pattern,
            leading,
        })
    }

    /// Whether `text` begins with one of the aliases.
    pub fn leads(&self, text: &str) -> bool {
        self.leading.is_match(text)
    }

    /// Byte offset of the first alias occurrence in `line`.
    pub fn find(&self, line: &str) -> Option<usize> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.start())
    }
}

/// The earliest unit mention in a line. Ties go to table order.
pub(crate) fn earliest_unit<'a>(matchers: &'a [UnitMatcher], line: &str) -> Option<&'a str> {
    let mut best: Option<(usize, &str)> = None;
    for matcher in matchers {
        if let Some(pos) = matcher.find(line) {
            if best.map_or(true, |(p, _)| pos < p) {
                best = Some((pos, matcher.unit.as_str()));
            }
        }
    }
    best.map(|(_, unit)| unit)
}

/// Canonical unit spellings compare case-insensitively, with the micro
/// sign folded to "u".
pub fn same_unit(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

fn fold(unit: &str) -> String {
    unit.trim()
        .chars()
        .map(|c| match c {
            'µ' | 'μ' => 'u',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
