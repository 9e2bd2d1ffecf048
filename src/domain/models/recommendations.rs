//! The single recommendation rule shared by the history-write path and the
//! report exporter. Exactly two sets exist, keyed off the literal "No DR"
//! marker in the stage string; there is no per-stage customization.

/// Guidance for a healthy finding.
pub const MAINTENANCE_SET: [&str; 5] = [
    "Maintain strict blood sugar control",
    "Monitor HbA1c levels regularly",
    "Have a dilated eye exam every 12 months",
    "Control blood pressure and keep it below 130/80 mmHg",
    "Maintain healthy cholesterol levels",
];

/// Guidance when retinopathy was detected.
pub const REFERRAL_SET: [&str; 6] = [
    "Control blood sugar levels and aim for an HbA1c below 7%",
    "Manage blood pressure and keep it below 130/80 mmHg",
    "Control cholesterol levels to protect retinal blood vessels",
    "Get a comprehensive dilated eye exam at least once a year",
    "Avoid smoking completely",
    "Take diabetes medications exactly as prescribed by your doctor",
];

/// Warning appended to reports for DR-positive findings.
pub const REFERRAL_NOTICE: &str =
    "Please consult with an ophthalmologist immediately for proper diagnosis and treatment plan.";

pub fn stage_is_no_dr(stage: &str) -> bool {
    stage.contains("No DR")
}

/// Returns the recommendation set for a stage string.
pub fn recommendations_for_stage(stage: &str) -> Vec<String> {
    let set: &[&str] = if stage_is_no_dr(stage) {
        &MAINTENANCE_SET
    } else {
        &REFERRAL_SET
    };
    set.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_dr_gets_the_maintenance_set() {
        let recs = recommendations_for_stage("No DR");
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0], MAINTENANCE_SET[0]);
    }

    #[test]
    fn dr_stages_get_the_referral_set() {
        for stage in ["Mild NPDR", "Moderate NPDR", "Severe NPDR", "PDR"] {
            let recs = recommendations_for_stage(stage);
            assert_eq!(recs, REFERRAL_SET.map(String::from).to_vec(), "{stage}");
        }
    }

    #[test]
    fn marker_is_a_substring_match() {
        assert!(stage_is_no_dr("No DR - healthy retina"));
        assert!(!stage_is_no_dr("Moderate NPDR"));
    }
}
