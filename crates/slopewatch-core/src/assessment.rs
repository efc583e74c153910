//! Caller-side risk assessment over the observation log.
//!
//! These functions decide which sentinel label applies when there is no
//! observation to classify, or when loading one fails. Levels are never
//! stored; they are recomputed from the observation on every call.

use serde::Serialize;
use tracing::{debug, error};

use crate::observation::Observation;
use crate::risk::{classify, RiskLabel, RiskLevel};
use crate::store::{ObservationStore, StoreError};

/// A level together with the observation it was computed from, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub observation: Option<Observation>,
    pub level: RiskLevel,
}

impl Assessment {
    fn sentinel(label: RiskLabel) -> Self {
        Self {
            observation: None,
            level: RiskLevel::for_label(label),
        }
    }
}

/// One history row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub observation: Observation,
    pub level: RiskLevel,
}

/// Level for a record handed over by display code.
///
/// `None`, or a record with an empty, null or absent numeric field, is
/// `MissingData`.
pub fn assess_record(observation: Option<&Observation>) -> RiskLevel {
    match observation {
        Some(obs) if !obs.has_missing_reading() => classify(obs),
        _ => RiskLevel::for_label(RiskLabel::MissingData),
    }
}

/// Assess the most recently appended observation.
pub fn assess_latest(store: &dyn ObservationStore) -> Assessment {
    let mut observations = match store.load_all() {
        Ok(observations) => observations,
        Err(e) => {
            error!(error = %e, "failed to load observations for assessment");
            return Assessment::sentinel(RiskLabel::CalculationError);
        }
    };
    let Some(latest) = observations.pop() else {
        debug!("no observations recorded");
        return Assessment::sentinel(RiskLabel::NoData);
    };
    let level = assess_record(Some(&latest));
    Assessment {
        observation: Some(latest),
        level,
    }
}

/// Assess the observation with the given id. An unknown id is `MissingData`.
pub fn find_by_id(store: &dyn ObservationStore, id: &str) -> Assessment {
    match store.load_all() {
        Ok(observations) => {
            let found = observations.into_iter().find(|o| o.id() == id);
            let level = assess_record(found.as_ref());
            Assessment {
                observation: found,
                level,
            }
        }
        Err(e) => {
            error!(error = %e, id, "failed to load observations for assessment");
            Assessment::sentinel(RiskLabel::CalculationError)
        }
    }
}

/// Every observation, newest first, with its recomputed level.
pub fn history(store: &dyn ObservationStore) -> Result<Vec<HistoryEntry>, StoreError> {
    let mut observations = store.load_all()?;
    observations.sort_by(|a, b| b.recorded_at().cmp(&a.recorded_at()));
    Ok(observations
        .into_iter()
        .map(|observation| HistoryEntry {
            level: assess_record(Some(&observation)),
            observation,
        })
        .collect())
}
