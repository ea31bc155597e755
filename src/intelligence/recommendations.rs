use std::collections::HashSet;

use crate::models::{Classification, ClassifiedResult, Panel, ResultCounts};

fn find<'a>(results: &'a [ClassifiedResult], name: &str) -> Option<&'a ClassifiedResult> {
    results.iter().find(|r| r.is(name))
}

fn is_high(results: &[ClassifiedResult], name: &str) -> bool {
    find(results, name).is_some_and(|r| r.classification.is_high())
}

fn is_low(results: &[ClassifiedResult], name: &str) -> bool {
    find(results, name).is_some_and(|r| r.classification.is_low())
}

// ---------------------------------------------------------------------------
// Rule groups
// ---------------------------------------------------------------------------

fn lipid_recommendations(results: &[ClassifiedResult]) -> Vec<&'static str> {
    let mut recs = Vec::new();

    if is_low(results, "hdl") {
        recs.extend([
            "Try to exercise more - even a 30-minute walk daily can help raise your good cholesterol.",
            "Consider eating more healthy fats like olive oil, nuts, and fatty fish like salmon.",
            "If you smoke, quitting can help improve your cholesterol levels.",
        ]);
    }
    if is_high(results, "ldl") {
        recs.extend([
            "Try to eat less fatty meats and fried foods.",
            "Add more fiber to your diet through whole grains, fruits, and vegetables.",
            "Look for foods with plant sterols (often added to margarine and orange juice).",
            "Talk to your doctor about whether you need medication to lower cholesterol.",
        ]);
    }
    if is_high(results, "triglycerides") {
        recs.extend([
            "Cut back on sugary foods and drinks, including alcohol.",
            "Try to exercise regularly - even walking can help lower triglycerides.",
            "Consider eating more fish or taking fish oil supplements.",
        ]);
    }

    let abnormal_lipids = results
        .iter()
        .filter(|r| r.candidate.panel == Panel::Lipid && r.classification.is_abnormal())
        .count();
    if abnormal_lipids >= 2 {
        recs.extend([
            "Your doctor might want to check your heart health more thoroughly.",
            "Keep an eye on your blood pressure - high cholesterol and high blood pressure often go together.",
        ]);
    }

    recs
}

fn metabolic_recommendations(results: &[ClassifiedResult]) -> Vec<&'static str> {
    let mut recs = Vec::new();

    if is_high(results, "urate") {
        recs.extend([
            "Try to eat less red meat, organ meats (like liver), and shellfish.",
            "Cut back on alcohol, especially beer.",
            "Drink plenty of water - aim for 8 glasses a day.",
            "Low-fat dairy products like milk and yogurt might help lower urate levels.",
            "Talk to your doctor about medications that can help with high urate levels.",
        ]);
    }
    if is_high(results, "glucose") {
        recs.extend([
            "Keep track of your blood sugar levels regularly.",
            "Try to eat balanced meals and watch your carbohydrate intake.",
            "Regular exercise can help keep your blood sugar in check.",
            "Your doctor might want to check for diabetes.",
        ]);
    }
    if is_high(results, "hba1c") {
        recs.extend([
            "Work with your doctor to create a plan to manage your blood sugar.",
            "You might need to check your blood sugar more often.",
            "Consider meeting with a diabetes educator or dietitian for help.",
        ]);
    }

    recs
}

fn general_recommendations(counts: &ResultCounts, age: Option<u32>) -> Vec<&'static str> {
    let mut recs = Vec::new();

    if counts.abnormal_count >= 3 {
        recs.extend([
            "Since you have several results that need attention, it's a good idea to see your doctor for a complete checkup.",
            "Focus on making healthy lifestyle changes - diet, exercise, and stress management can make a big difference.",
        ]);
    }

    match age {
        Some(age) if age >= 50 => {
            recs.push("As we get older, it's important to have regular health checkups.")
        }
        Some(age) if age >= 30 => recs.push(
            "It's a good time to establish regular health checkups if you haven't already.",
        ),
        _ => {}
    }

    recs.extend([
        "Try to get at least 150 minutes of moderate exercise each week - that's about 30 minutes, 5 days a week.",
        "Eat a balanced diet with plenty of fruits, vegetables, and whole grains.",
        "Aim for 7-9 hours of good sleep each night.",
        "Find ways to manage stress - meditation, yoga, or just taking time to relax can help.",
    ]);

    recs
}

/// Retest cadence keyed by severity, then per-panel re-check advice.
fn followup_recommendations(results: &[ClassifiedResult], counts: &ResultCounts) -> Vec<&'static str> {
    let mut recs = Vec::new();

    let non_critical = counts.other_abnormal();
    if counts.critical_count > 0 {
        recs.extend([
            "You should get retested in 2-4 weeks to see if these levels improve.",
            "Your doctor might want you to see a specialist right away.",
        ]);
    } else if non_critical >= 3 {
        recs.push("Plan to get retested in 1-2 months to track your progress.");
    } else if non_critical > 0 {
        recs.push("Consider getting retested in 3-6 months to see if lifestyle changes help.");
    }

    let lipid_abnormal = results.iter().any(|r| {
        r.candidate.panel == Panel::Lipid
            && matches!(r.classification, Classification::High | Classification::Low)
    });
    if lipid_abnormal {
        recs.push("Your doctor will likely want to check your cholesterol every 3-6 months until it improves.");
    }
    if is_high(results, "urate") {
        recs.push("Your urate levels should be checked every 3-6 months to see if treatment is working.");
    }

    recs
}

/// Ordered, deduplicated recommendations: lipid, metabolic, general, follow-up.
pub fn generate_recommendations(results: &[ClassifiedResult], age: Option<u32>) -> Vec<String> {
    let counts = ResultCounts::tally(results);

    let all = lipid_recommendations(results)
        .into_iter()
        .chain(metabolic_recommendations(results))
        .chain(general_recommendations(&counts, age))
        .chain(followup_recommendations(results, &counts));

    let mut seen = HashSet::new();
    all.filter(|r| seen.insert(*r)).map(String::from).collect()
}
