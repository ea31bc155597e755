use crate::models::{ClassifiedResult, Panel, ResultCounts};

use super::messages::MessageTemplates;

/// Severity-tiered summary: urgent when anything is critical, a count of
/// abnormal values with panel call-outs otherwise, else all-normal.
pub fn generate_summary(results: &[ClassifiedResult]) -> String {
    if results.is_empty() {
        return MessageTemplates::no_readable_values().into();
    }
    let counts = ResultCounts::tally(results);

    let mut parts: Vec<String> = Vec::new();
    if counts.critical_count > 0 {
        parts.push(MessageTemplates::urgent(
            counts.critical_count,
            counts.other_abnormal(),
        ));
    } else if counts.abnormal_count > 0 {
        parts.push(MessageTemplates::abnormal(counts.abnormal_count));

        let abnormal_in = |panel: Panel| {
            results
                .iter()
                .filter(|r| r.candidate.panel == panel && r.classification.is_abnormal())
                .count()
        };
        let lipid = abnormal_in(Panel::Lipid);
        let metabolic = abnormal_in(Panel::Metabolic);

        if lipid > 0 {
            parts.push(MessageTemplates::lipid_callout(lipid));
        }
        if metabolic > 0 {
            parts.push(MessageTemplates::metabolic_callout(metabolic));
        }
        if let Some(explanation) = MessageTemplates::panel_explanation(lipid > 0, metabolic > 0) {
            parts.push(explanation.into());
        }
        parts.push(MessageTemplates::discuss_with_doctor().into());
    } else {
        parts.push(MessageTemplates::all_normal().into());
    }

    if counts.unknown_count > 0 {
        parts.push(MessageTemplates::unclassified_note(counts.unknown_count));
    }

    parts.join(" ")
}
