//! Risk labels, their display colours, the classifier and the mitigation
//! catalog keyed by label.

pub mod classifier;
pub mod mitigation;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classifier::classify;

/// Closed set of risk labels.
///
/// The classifier produces `InvalidData` and the four tiers; `NoData`,
/// `CalculationError` and `MissingData` are assigned by calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Moderate,
    Elevated,
    Critical,
    NoData,
    InvalidData,
    CalculationError,
    MissingData,
}

impl RiskLabel {
    pub const ALL: [RiskLabel; 8] = [
        RiskLabel::Low,
        RiskLabel::Moderate,
        RiskLabel::Elevated,
        RiskLabel::Critical,
        RiskLabel::NoData,
        RiskLabel::InvalidData,
        RiskLabel::CalculationError,
        RiskLabel::MissingData,
    ];

    /// Labels [`classify`] can return.
    pub const CLASSIFIED: [RiskLabel; 5] = [
        RiskLabel::InvalidData,
        RiskLabel::Low,
        RiskLabel::Moderate,
        RiskLabel::Elevated,
        RiskLabel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Moderate => "Moderate",
            RiskLabel::Elevated => "Elevated",
            RiskLabel::Critical => "Critical",
            RiskLabel::NoData => "NoData",
            RiskLabel::InvalidData => "InvalidData",
            RiskLabel::CalculationError => "CalculationError",
            RiskLabel::MissingData => "MissingData",
        }
    }

    pub fn severity_color(self) -> SeverityColor {
        let hex = match self {
            RiskLabel::Critical => "#8B0000",
            RiskLabel::Elevated => "#FF0000",
            RiskLabel::Moderate => "#FFA500",
            RiskLabel::Low => "#32CD32",
            RiskLabel::NoData | RiskLabel::InvalidData | RiskLabel::CalculationError => "#808080",
            RiskLabel::MissingData => "#A9A9A9",
        };
        SeverityColor(hex)
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown risk label `{0}`")]
pub struct ParseLabelError(pub String);

impl FromStr for RiskLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLabelError(s.to_string()))
    }
}

/// Display colour carried alongside a label. Opaque to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SeverityColor(&'static str);

impl SeverityColor {
    pub fn as_hex(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SeverityColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Classifier output: a label plus its display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevel {
    pub label: RiskLabel,
    pub severity_color: SeverityColor,
}

impl RiskLevel {
    pub fn for_label(label: RiskLabel) -> Self {
        Self {
            label,
            severity_color: label.severity_color(),
        }
    }

    /// Recommended actions for this level's label.
    pub fn actions(&self) -> &'static [&'static str] {
        mitigation::actions_for(self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_strings() {
        for label in RiskLabel::ALL {
            assert_eq!(label.as_str().parse::<RiskLabel>(), Ok(label));
            assert_eq!(label.to_string(), label.as_str());
        }
        assert_eq!("critical".parse::<RiskLabel>(), Ok(RiskLabel::Critical));
        assert!("Severe".parse::<RiskLabel>().is_err());
    }

    #[test]
    fn tier_colours_are_distinct() {
        let tiers = [
            RiskLabel::Low,
            RiskLabel::Moderate,
            RiskLabel::Elevated,
            RiskLabel::Critical,
        ];
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                assert_ne!(a.severity_color(), b.severity_color(), "{a} and {b}");
            }
        }
        assert_eq!(RiskLabel::InvalidData.severity_color().as_hex(), "#808080");
    }

    #[test]
    fn level_serializes_label_and_colour() {
        let json = serde_json::to_value(RiskLevel::for_label(RiskLabel::Elevated)).unwrap();
        assert_eq!(json["label"], "Elevated");
        assert_eq!(json["severityColor"], "#FF0000");
    }
}
