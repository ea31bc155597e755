use crate::models::{ClassifiedResult, RiskAssessment, RiskLevel};

/// Age from which cardiovascular risk is raised to at least MODERATE.
const AGE_RISK_THRESHOLD: u32 = 45;

fn has(results: &[ClassifiedResult], name: &str, predicate: impl Fn(&ClassifiedResult) -> bool) -> bool {
    results.iter().any(|r| r.is(name) && predicate(r))
}

/// Decision table over lipid markers, urate and age.
pub fn assess_risk(results: &[ClassifiedResult], age: Option<u32>) -> RiskAssessment {
    let mut risk_factors = Vec::new();
    let mut risk_level = RiskLevel::Low;

    let high_ldl = has(results, "ldl", |r| r.classification.is_high());
    let low_hdl = has(results, "hdl", |r| r.classification.is_low());
    let high_triglycerides = has(results, "triglycerides", |r| r.classification.is_high());

    if high_ldl {
        risk_factors.push("Elevated LDL cholesterol".to_string());
    }
    if low_hdl {
        risk_factors.push("Low HDL cholesterol".to_string());
    }
    if high_triglycerides {
        risk_factors.push("Elevated triglycerides".to_string());
    }

    if high_ldl && low_hdl {
        risk_level = RiskLevel::High;
    } else if high_ldl || low_hdl {
        risk_level = RiskLevel::Moderate;
    }

    if has(results, "urate", |r| r.classification.is_high()) {
        risk_factors.push("Elevated urate levels (gout risk)".to_string());
        risk_level = risk_level.max(RiskLevel::Moderate);
    }

    if age.is_some_and(|a| a >= AGE_RISK_THRESHOLD) {
        risk_factors.push("Age-related cardiovascular risk".to_string());
        risk_level = risk_level.max(RiskLevel::Moderate);
    }

    RiskAssessment {
        risk_level,
        risk_factors,
        recommendations: risk_based_recommendations(risk_level),
    }
}

fn risk_based_recommendations(level: RiskLevel) -> Vec<String> {
    let recs: &[&str] = match level {
        RiskLevel::High => &[
            "Immediate consultation with cardiologist recommended.",
            "Consider advanced cardiac imaging if recommended by provider.",
            "Aggressive lifestyle modification program needed.",
        ],
        RiskLevel::Moderate => &[
            "Regular cardiovascular monitoring recommended.",
            "Consider cardiac stress testing if recommended by provider.",
            "Moderate lifestyle modifications needed.",
        ],
        RiskLevel::Low => &[
            "Continue regular preventive care.",
            "Maintain healthy lifestyle habits.",
        ],
    };
    recs.iter().map(|r| r.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::classified;
    use crate::models::Classification;

    #[test]
    fn ldl_and_hdl_together_is_high() {
        let results = vec![
            classified("ldl", 160.0, Classification::High),
            classified("hdl", 30.0, Classification::Low),
        ];
        let risk = assess_risk(&results, None);
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(risk.risk_factors, vec!["Elevated LDL cholesterol", "Low HDL cholesterol"]);
        assert_eq!(risk.recommendations[0], "Immediate consultation with cardiologist recommended.");
    }

    #[test]
    fn single_lipid_marker_is_moderate() {
        let results = vec![classified("hdl", 10.0, Classification::CriticalLow)];
        assert_eq!(assess_risk(&results, None).risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn triglycerides_add_factor_only() {
        let results = vec![classified("triglycerides", 250.0, Classification::High)];
        let risk = assess_risk(&results, None);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert_eq!(risk.risk_factors, vec!["Elevated triglycerides"]);
    }

    #[test]
    fn urate_raises_to_moderate_not_beyond() {
        let results = vec![
            classified("urate", 590.0, Classification::High),
            classified("ldl", 160.0, Classification::CriticalHigh),
            classified("hdl", 30.0, Classification::Low),
        ];
        assert_eq!(assess_risk(&results, None).risk_level, RiskLevel::High);

        let urate_only = vec![classified("urate", 590.0, Classification::High)];
        assert_eq!(assess_risk(&urate_only, None).risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn age_bumps_low_to_moderate() {
        let results = vec![classified("glucose", 90.0, Classification::Normal)];
        assert_eq!(assess_risk(&results, Some(44)).risk_level, RiskLevel::Low);
        let older = assess_risk(&results, Some(45));
        assert_eq!(older.risk_level, RiskLevel::Moderate);
        assert_eq!(older.risk_factors, vec!["Age-related cardiovascular risk"]);
    }

    #[test]
    fn default_low_with_preventive_advice() {
        let risk = assess_risk(&[], None);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert!(risk.risk_factors.is_empty());
        assert_eq!(risk.recommendations.len(), 2);
    }
}
