// Plausibility filter between extraction and classification.
// Values outside a test's physiological interval are OCR noise (page numbers,
// dates, merged digits) and are dropped, never surfaced as results.

use std::collections::HashSet;

use crate::models::ExtractedCandidate;
use crate::reference::LabCatalog;

/// Drop implausible candidates, then keep the first surviving candidate
/// for each canonical test.
pub fn validate_candidates(
    candidates: Vec<ExtractedCandidate>,
    catalog: &LabCatalog,
) -> Vec<ExtractedCandidate> {
    let plausible: Vec<_> = candidates
        .into_iter()
        .filter(|c| {
            let keep = c.value.is_finite() && catalog.is_plausible(&c.canonical_name, c.value);
            if !keep {
                tracing::info!(
                    test = %c.canonical_name,
                    value = c.value,
                    line = c.value_line_index,
                    "Dropped implausible lab value"
                );
            }
            keep
        })
        .collect();

    dedupe_by_test(plausible)
}

fn dedupe_by_test(candidates: Vec<ExtractedCandidate>) -> Vec<ExtractedCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            let first = seen.insert(c.canonical_name.clone());
            if !first {
                tracing::debug!(
                    test = %c.canonical_name,
                    line = c.line_index,
                    "Ignoring repeated test mention"
                );
            }
            first
        })
        .collect()
}
