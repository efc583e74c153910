//! Recommended actions per risk label.
//!
//! The match in [`actions_for`] is exhaustive over [`RiskLabel`], so adding a
//! label without actions does not compile.

use super::RiskLabel;

const LOW: &[&str] = &[
    "Continue regular monitoring.",
    "Keep drainage channels clear.",
    "Watch for cracks or movement in the ground.",
];

const MODERATE: &[&str] = &[
    "Increase monitoring frequency.",
    "Avoid letting water pool in vulnerable areas.",
    "Contact civil defence for guidance.",
    "Prepare a family evacuation plan.",
];

const ELEVATED: &[&str] = &[
    "Evacuate to a safe place immediately if possible.",
    "Call local civil defence (199) or the fire service (193).",
    "Warn neighbours and anyone else in the risk area.",
    "Do not return until the authorities declare the area safe.",
];

const CRITICAL: &[&str] = &[
    "Evacuate IMMEDIATELY and alert emergency services (civil defence 199, fire service 193).",
    "Stay in a safe place and follow every instruction from the authorities.",
    "Keep in touch with family and neighbours so everyone is accounted for.",
    "Do NOT return to the area under any circumstances before official clearance.",
];

const NO_DATA: &[&str] = &[
    "Record monitoring data to assess the risk.",
    "Check that the sensors and the application are working.",
];

const INVALID_DATA: &[&str] = &[
    "Check the entered values: humidity, inclination and temperature must be valid numbers.",
    "Take new readings carefully.",
];

const CALCULATION_ERROR: &[&str] = &[
    "The data could not be processed. Try restarting the application.",
    "If the problem persists, check the integrity of the stored records.",
];

const MISSING_DATA: &[&str] = &[
    "One or more readings needed for the risk calculation are missing.",
    "Enter every monitoring field to get an accurate assessment.",
];

/// Ordered recommended actions for `label`.
pub fn actions_for(label: RiskLabel) -> &'static [&'static str] {
    match label {
        RiskLabel::Low => LOW,
        RiskLabel::Moderate => MODERATE,
        RiskLabel::Elevated => ELEVATED,
        RiskLabel::Critical => CRITICAL,
        RiskLabel::NoData => NO_DATA,
        RiskLabel::InvalidData => INVALID_DATA,
        RiskLabel::CalculationError => CALCULATION_ERROR,
        RiskLabel::MissingData => MISSING_DATA,
    }
}

/// Lookup by label string, for callers holding a persisted or user-typed key.
pub fn actions_for_label(label: &str) -> Option<&'static [&'static str]> {
    label.parse::<RiskLabel>().ok().map(actions_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_has_actions() {
        for label in RiskLabel::ALL {
            let actions = actions_for(label);
            assert!(!actions.is_empty(), "{label} has no actions");
            assert!(actions.iter().all(|a| !a.trim().is_empty()), "{label} has a blank action");
        }
    }

    #[test]
    fn classifier_labels_are_covered() {
        for label in RiskLabel::CLASSIFIED {
            assert!(!actions_for(label).is_empty(), "{label}");
        }
    }

    #[test]
    fn string_lookup_matches_enum_lookup() {
        assert_eq!(actions_for_label("Elevated"), Some(ELEVATED));
        assert_eq!(actions_for_label("NoData"), Some(NO_DATA));
        assert_eq!(actions_for_label("Unknown"), None);
    }

    #[test]
    fn severe_tiers_start_with_evacuation() {
        assert!(actions_for(RiskLabel::Elevated)[0].starts_with("Evacuate"));
        assert!(actions_for(RiskLabel::Critical)[0].starts_with("Evacuate"));
    }
}
