//! Landslide-risk classification for field observations.
//!
//! The classifier in [`risk`] is a pure function over an [`Observation`].
//! [`store`] persists the observation log, and [`assessment`] holds the
//! caller-side rules that pick a sentinel label when there is nothing to
//! classify.

pub mod assessment;
pub mod observation;
pub mod risk;
pub mod store;

pub use assessment::{assess_latest, assess_record, find_by_id, history, Assessment, HistoryEntry};
pub use observation::{DraftError, Observation, ObservationDraft, Reading};
pub use risk::{classify, mitigation, ParseLabelError, RiskLabel, RiskLevel, SeverityColor};
pub use store::{JsonFileStore, MemoryStore, ObservationStore, StoreError};
