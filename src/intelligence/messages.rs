use crate::models::Classification;

/// Message template builder for report summaries.
/// Plain language, no emoji. Counts are always stated as digits.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Lead line when at least one result is critical.
    pub fn urgent(critical: usize, other_abnormal: usize) -> String {
        format!(
            "URGENT: {} of your test results are dangerously high or low and need immediate medical attention. \
             {} other results are outside the normal range.",
            critical, other_abnormal,
        )
    }

    /// Lead line when results are abnormal but none critical.
    pub fn abnormal(count: usize) -> String {
        format!(
            "Your lab results show {} values that are outside the normal range.",
            count,
        )
    }

    pub fn lipid_callout(count: usize) -> String {
        if count == 1 {
            "You have 1 cholesterol-related result that needs attention.".into()
        } else {
            format!("You have {count} cholesterol-related results that need attention.")
        }
    }

    pub fn metabolic_callout(count: usize) -> String {
        if count == 1 {
            "You have 1 metabolism-related result that needs attention.".into()
        } else {
            format!("You have {count} metabolism-related results that need attention.")
        }
    }

    pub fn panel_explanation(lipid: bool, metabolic: bool) -> Option<&'static str> {
        match (lipid, metabolic) {
            (true, true) => {
                Some("This suggests your body's processing of fats and sugars may need some adjustments.")
            }
            (true, false) => Some(
                "This suggests your cholesterol levels may need some lifestyle changes or medical attention.",
            ),
            (false, true) => {
                Some("This suggests your body's processing of certain substances may need some attention.")
            }
            (false, false) => None,
        }
    }

    pub fn discuss_with_doctor() -> &'static str {
        "It's a good idea to discuss these results with your doctor."
    }

    /// Test names were recognized but no value survived extraction.
    pub fn no_readable_values() -> &'static str {
        "Lab tests were found in your report, but none of their values could be read reliably. Please check the document or discuss it with your doctor."
    }

    pub fn all_normal() -> &'static str {
        "Great news! All your lab results are within the normal range."
    }

    /// Appended when some results could not be compared to any range.
    pub fn unclassified_note(count: usize) -> String {
        if count == 1 {
            "1 result had no reference range available and was not classified.".into()
        } else {
            format!("{count} results had no reference range available and were not classified.")
        }
    }
}

/// Per-test reading of a classification, with generic fallbacks.
pub fn interpretation(canonical_name: &str, classification: Classification) -> &'static str {
    use Classification::*;

    let specific = match (canonical_name, classification) {
        ("glucose", High) => Some("Elevated blood sugar levels. May indicate prediabetes or diabetes."),
        ("glucose", Low) => Some("Low blood sugar levels. May indicate hypoglycemia."),
        ("glucose", CriticalHigh) => Some("Very high blood sugar. Requires immediate medical attention."),
        ("glucose", CriticalLow) => Some("Very low blood sugar. Requires immediate medical attention."),
        ("hemoglobin", Low | CriticalLow) => Some("Low hemoglobin may indicate anemia."),
        ("hemoglobin", High | CriticalHigh) => {
            Some("High hemoglobin may indicate dehydration or other conditions.")
        }
        ("hdl", Low | CriticalLow) => Some("Low HDL cholesterol increases heart disease risk."),
        ("hdl", High) => Some("High HDL cholesterol is protective against heart disease."),
        ("ldl", High) => Some("High LDL cholesterol increases heart disease risk."),
        ("ldl", CriticalHigh) => Some("Very high LDL cholesterol. High risk for heart disease."),
        ("hba1c", High) => Some("Elevated HbA1c indicates poor blood sugar control over time."),
        ("hba1c", CriticalHigh) => Some("Very high HbA1c suggests diabetes or poor diabetes control."),
        ("triglycerides", High) => Some("Elevated triglycerides add to heart disease risk."),
        ("triglycerides", CriticalHigh) => {
            Some("Very high triglycerides. Raises the risk of pancreatitis and heart disease.")
        }
        ("urate", High | CriticalHigh) => Some("Elevated urate increases the risk of gout and kidney stones."),
        _ => None,
    };

    specific.unwrap_or(match classification {
        Normal => "Result is within the expected range.",
        Unknown => "No reference range available for comparison.",
        _ => "Result outside normal range.",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_message_states_counts() {
        let msg = MessageTemplates::urgent(2, 1);
        assert!(msg.starts_with("URGENT: 2 of your test results"));
        assert!(msg.contains("1 other results"));
    }

    #[test]
    fn callouts_pluralize() {
        assert!(MessageTemplates::lipid_callout(1).contains("1 cholesterol-related result that"));
        assert!(MessageTemplates::lipid_callout(3).contains("3 cholesterol-related results"));
        assert!(MessageTemplates::metabolic_callout(2).contains("2 metabolism-related results"));
    }

    #[test]
    fn no_explanation_without_panel_issues() {
        assert!(MessageTemplates::panel_explanation(false, false).is_none());
        assert!(MessageTemplates::panel_explanation(true, true)
            .unwrap()
            .contains("fats and sugars"));
    }

    #[test]
    fn interpretation_specific_and_fallback() {
        assert_eq!(
            interpretation("hdl", Classification::CriticalLow),
            "Low HDL cholesterol increases heart disease risk."
        );
        assert_eq!(
            interpretation("sodium", Classification::High),
            "Result outside normal range."
        );
        assert_eq!(
            interpretation("glucose", Classification::Normal),
            "Result is within the expected range."
        );
        assert_eq!(
            interpretation("urate", Classification::Unknown),
            "No reference range available for comparison."
        );
    }

    #[test]
    fn messages_have_no_emoji() {
        let all = [
            MessageTemplates::urgent(1, 0),
            MessageTemplates::abnormal(2),
            MessageTemplates::all_normal().to_string(),
            MessageTemplates::no_readable_values().to_string(),
        ];
        for msg in all {
            assert!(msg.is_ascii(), "{msg}");
        }
    }
}
