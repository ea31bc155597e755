use crate::models::{ClassifiedResult, EarlyWarning, WarningSeverity, WarningType};

const METABOLIC_MARKERS: [&str; 3] = ["triglycerides", "hdl", "glucose"];

fn find<'a>(results: &'a [ClassifiedResult], name: &str) -> Option<&'a ClassifiedResult> {
    results.iter().find(|r| r.is(name))
}

fn warning(
    warning_type: WarningType,
    severity: WarningSeverity,
    message: &str,
    action: &str,
) -> EarlyWarning {
    EarlyWarning {
        warning_type,
        severity,
        message: message.into(),
        action: action.into(),
    }
}

// ---------------------------------------------------------------------------
// Pattern detectors
// ---------------------------------------------------------------------------

/// Low HDL together with high LDL.
fn detect_atherogenic_pattern(results: &[ClassifiedResult]) -> Option<EarlyWarning> {
    let hdl = find(results, "hdl")?;
    let ldl = find(results, "ldl")?;
    (hdl.classification.is_low() && ldl.classification.is_high()).then(|| {
        warning(
            WarningType::Cardiovascular,
            WarningSeverity::High,
            "Atherogenic lipid pattern detected (low HDL + high LDL)",
            "Immediate lifestyle modification and medical consultation recommended",
        )
    })
}

/// Two or more of triglycerides, HDL and glucose abnormal at once.
fn detect_metabolic_syndrome(results: &[ClassifiedResult]) -> Option<EarlyWarning> {
    let abnormal = METABOLIC_MARKERS
        .iter()
        .filter_map(|name| find(results, name))
        .filter(|r| r.classification.is_abnormal())
        .count();
    (abnormal >= 2).then(|| {
        warning(
            WarningType::Metabolic,
            WarningSeverity::Moderate,
            "Multiple metabolic markers abnormal - possible metabolic syndrome",
            "Comprehensive metabolic assessment recommended",
        )
    })
}

fn detect_gout_risk(results: &[ClassifiedResult]) -> Option<EarlyWarning> {
    let urate = find(results, "urate")?;
    urate.classification.is_high().then(|| {
        warning(
            WarningType::Joint,
            WarningSeverity::Moderate,
            "Elevated urate levels - increased gout risk",
            "Dietary modifications and urate monitoring recommended",
        )
    })
}

/// Run every detector, in fixed order.
pub fn detect_early_warnings(results: &[ClassifiedResult]) -> Vec<EarlyWarning> {
    [
        detect_atherogenic_pattern(results),
        detect_metabolic_syndrome(results),
        detect_gout_risk(results),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::classified;
    use crate::models::Classification;

    #[test]
    fn atherogenic_pattern() {
        let results = vec![
            classified("hdl", 30.0, Classification::Low),
            classified("ldl", 220.0, Classification::CriticalHigh),
        ];
        let warnings = detect_early_warnings(&results);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].warning_type, WarningType::Cardiovascular);
        assert_eq!(warnings[0].severity, WarningSeverity::High);
    }

    #[test]
    fn low_hdl_alone_no_atherogenic_warning() {
        let results = vec![classified("hdl", 30.0, Classification::Low)];
        assert!(detect_early_warnings(&results).is_empty());
    }

    #[test]
    fn metabolic_syndrome_needs_two_markers() {
        let one = vec![
            classified("glucose", 110.0, Classification::High),
            classified("triglycerides", 120.0, Classification::Normal),
        ];
        assert!(detect_early_warnings(&one).is_empty());

        let two = vec![
            classified("glucose", 110.0, Classification::High),
            classified("triglycerides", 220.0, Classification::High),
        ];
        let warnings = detect_early_warnings(&two);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].warning_type, WarningType::Metabolic);
    }

    #[test]
    fn gout_risk() {
        let results = vec![classified("urate", 590.0, Classification::High)];
        let warnings = detect_early_warnings(&results);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Elevated urate levels - increased gout risk");

        let json = serde_json::to_value(&warnings[0]).unwrap();
        assert_eq!(json["type"], "JOINT");
        assert_eq!(json["severity"], "MODERATE");
    }

    #[test]
    fn detectors_report_in_fixed_order() {
        let results = vec![
            classified("urate", 590.0, Classification::High),
            classified("hdl", 30.0, Classification::Low),
            classified("ldl", 160.0, Classification::High),
            classified("glucose", 130.0, Classification::High),
        ];
        let types: Vec<_> = detect_early_warnings(&results)
            .into_iter()
            .map(|w| w.warning_type)
            .collect();
        assert_eq!(
            types,
            vec![WarningType::Cardiovascular, WarningType::Metabolic, WarningType::Joint]
        );
    }
}
