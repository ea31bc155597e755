pub mod context;
pub mod matcher;
pub mod value;

pub use context::{find_range_text, resolve_context, LineOwnership, ResolvedContext};
pub use matcher::{find_mentions, split_lines};
pub use value::{claim_values, extract_value, ExtractedValue, ValueClaim};

use std::collections::{BTreeSet, HashSet};

use crate::models::{ExtractedCandidate, TestMention};
use crate::pipeline_config::AnalysisConfig;
use crate::reference::LabCatalog;

/// Value pass followed by the context pass.
///
/// Context is resolved only once every value line is claimed, so unit and
/// range search can skip lines that belong to other candidates.
pub fn extract_candidates(
    lines: &[String],
    mentions: &[TestMention],
    catalog: &LabCatalog,
    config: &AnalysisConfig,
) -> Vec<ExtractedCandidate> {
    let claims = claim_values(lines, mentions, catalog, config.value_window);

    let owned: HashSet<usize> = claims
        .iter()
        .flat_map(|c| [c.mention.line_index, c.value_line])
        .chain(mentions.iter().map(|m| m.line_index))
        .collect();

    let mut candidates = Vec::with_capacity(claims.len());
    for claim in claims {
        let Some(definition) = catalog.definition(&claim.mention.canonical_name) else {
            continue;
        };
        let ownership = LineOwnership {
            own: [claim.mention.line_index, claim.value_line],
            owned: &owned,
        };
        let ctx = resolve_context(
            lines,
            claim.value_line,
            &ownership,
            catalog,
            config.unit_window,
            config.range_window,
        );

        let source_lines: BTreeSet<usize> = [
            Some(claim.mention.line_index),
            Some(claim.value_line),
            ctx.unit_line,
            ctx.range_line,
        ]
        .into_iter()
        .flatten()
        .collect();

        candidates.push(ExtractedCandidate {
            line_index: claim.mention.line_index,
            value_line_index: claim.value_line,
            canonical_name: definition.canonical_name.clone(),
            raw_matched_text: claim.mention.raw_line,
            display_name: definition.display_name.clone(),
            panel: definition.panel,
            value: claim.value.value,
            flag: claim.value.flag,
            unit: ctx.unit,
            reference_range_text: ctx.reference_range_text,
            source_lines: source_lines.into_iter().map(|i| lines[i].clone()).collect(),
        });
    }

    candidates
}
