use crate::models::TestMention;
use crate::pipeline_config::MatchMode;
use crate::reference::LabCatalog;

/// Split OCR text into trimmed, non-empty lines. Line indices used by every
/// later pass refer to this list.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Find every line naming a catalog test. A line names at most one test:
/// the first definition in table order that matches.
pub fn find_mentions(lines: &[String], catalog: &LabCatalog, mode: MatchMode) -> Vec<TestMention> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(line_index, line)| {
            catalog.match_line(line, mode).map(|def| TestMention {
                line_index,
                canonical_name: def.canonical_name.clone(),
                raw_line: line.clone(),
            })
        })
        .collect()
}
