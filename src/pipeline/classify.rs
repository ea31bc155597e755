//! Reference-range classification.
//!
//! `classify_value` is the pure tier decision. `classify_candidate` picks
//! the applicable range (catalog first, printed range second), reconciles
//! units and records caveats.

use crate::intelligence::messages::interpretation;
use crate::models::{
    AbnormalFlag, AppliedRange, Classification, ClassifiedResult, ExtractedCandidate, RangeSource,
    ReferenceRange, Sex, UnitConversion,
};
use crate::reference::units::same_unit;
use crate::reference::LabCatalog;

/// Values below `low * CRITICAL_LOW_FACTOR` are critically low.
pub const CRITICAL_LOW_FACTOR: f64 = 0.5;
/// Values above `high * CRITICAL_HIGH_FACTOR` are critically high.
pub const CRITICAL_HIGH_FACTOR: f64 = 2.0;

/// Bounds are inclusive. Critical thresholds are strict, so a value equal
/// to `low * 0.5` is LOW and one equal to `high * 2` is HIGH.
pub fn classify_value(value: f64, range: Option<&ReferenceRange>) -> Classification {
    let Some(range) = range else {
        return Classification::Unknown;
    };

    if value < range.low {
        if value < range.low * CRITICAL_LOW_FACTOR {
            Classification::CriticalLow
        } else {
            Classification::Low
        }
    } else if value > range.high {
        if value > range.high * CRITICAL_HIGH_FACTOR {
            Classification::CriticalHigh
        } else {
            Classification::High
        }
    } else {
        Classification::Normal
    }
}

/// Catalog range first, printed range second. A printed range in the
/// reported unit also replaces a catalog range the value cannot be
/// converted into; the returned caveat records the substitution.
fn applicable_range(
    candidate: &ExtractedCandidate,
    catalog: &LabCatalog,
    sex: Option<Sex>,
) -> (Option<AppliedRange>, Option<String>) {
    let printed = || {
        ReferenceRange::parse_printed(&candidate.reference_range_text, &candidate.unit).map(|range| {
            AppliedRange {
                range,
                source: RangeSource::Document,
            }
        })
    };

    let Some(range) = catalog.reference_range(&candidate.canonical_name, sex) else {
        return (printed(), None);
    };
    if !convertible(candidate, range, catalog) {
        if let Some(applied) = printed() {
            tracing::warn!(
                test = %candidate.canonical_name,
                from = %candidate.unit,
                to = %range.unit,
                "No unit conversion available, using the printed range"
            );
            let caveat = format!(
                "Reported in {} but the standard range is in {}; no conversion is available, so the range printed on the report was used",
                candidate.unit, range.unit
            );
            return (Some(applied), Some(caveat));
        }
    }
    (
        Some(AppliedRange {
            range: range.clone(),
            source: RangeSource::Catalog,
        }),
        None,
    )
}

/// A missing unit is assumed to match.
fn convertible(candidate: &ExtractedCandidate, range: &ReferenceRange, catalog: &LabCatalog) -> bool {
    candidate.unit.is_empty()
        || same_unit(&candidate.unit, &range.unit)
        || catalog
            .conversion_factor(&candidate.canonical_name, &candidate.unit, &range.unit)
            .is_some()
}

/// Bring the value into the range's unit where a conversion rule exists.
fn reconcile_units(
    candidate: &ExtractedCandidate,
    range: &ReferenceRange,
    catalog: &LabCatalog,
) -> (f64, UnitConversion) {
    let value = candidate.value;
    if same_unit(&candidate.unit, &range.unit) {
        return (value, UnitConversion::NotNeeded);
    }
    if candidate.unit.is_empty() {
        return (value, UnitConversion::Assumed);
    }
    match catalog.conversion_factor(&candidate.canonical_name, &candidate.unit, &range.unit) {
        Some(factor) => (
            value * factor,
            UnitConversion::Converted {
                from: candidate.unit.clone(),
                to: range.unit.clone(),
                factor,
            },
        ),
        None => (
            value,
            UnitConversion::Unsupported {
                from: candidate.unit.clone(),
                to: range.unit.clone(),
            },
        ),
    }
}

fn flag_disagrees(flag: AbnormalFlag, classification: Classification) -> bool {
    match flag {
        AbnormalFlag::None => false,
        _ if classification == Classification::Unknown => false,
        AbnormalFlag::High => !classification.is_high(),
        AbnormalFlag::Low => !classification.is_low(),
    }
}

pub fn classify_candidate(
    candidate: ExtractedCandidate,
    catalog: &LabCatalog,
    sex: Option<Sex>,
) -> ClassifiedResult {
    let (applied_range, range_caveat) = applicable_range(&candidate, catalog, sex);

    let (compared_value, unit_conversion) = match &applied_range {
        Some(applied) => reconcile_units(&candidate, &applied.range, catalog),
        None => (candidate.value, UnitConversion::NotNeeded),
    };
    let classification = classify_value(compared_value, applied_range.as_ref().map(|a| &a.range));

    let mut caveats: Vec<String> = range_caveat.into_iter().collect();
    if let UnitConversion::Unsupported { from, to } = &unit_conversion {
        tracing::warn!(
            test = %candidate.canonical_name,
            from = %from,
            to = %to,
            "No unit conversion available, comparing as-is"
        );
        caveats.push(format!(
            "Reported in {from} but the reference range is in {to}; no conversion is available, so the value was compared as-is"
        ));
    }
    if flag_disagrees(candidate.flag, classification) {
        tracing::warn!(
            test = %candidate.canonical_name,
            flag = candidate.flag.as_str(),
            classification = classification.as_str(),
            "Lab flag disagrees with computed classification"
        );
        caveats.push(format!(
            "The lab flagged this result {} but it classifies as {classification} against the applied range",
            candidate.flag
        ));
    }

    ClassifiedResult {
        interpretation: interpretation(&candidate.canonical_name, classification).to_string(),
        status: classification.status_message().to_string(),
        candidate,
        classification,
        applied_range,
        compared_value,
        unit_conversion,
        caveats,
    }
}
