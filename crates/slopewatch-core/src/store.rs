//! Append-only observation log.
//!
//! The on-disk form is a single JSON array in insertion order. A missing file
//! reads as an empty log. Saves write the whole array to a sibling temp file
//! and rename it over the original.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::observation::Observation;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access observation store {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("observation store {path} is not a valid observation list")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait ObservationStore {
    /// Every stored observation, oldest first.
    fn load_all(&self) -> Result<Vec<Observation>, StoreError>;

    /// Append and persist. Returns the record as stored, which carries a
    /// suffixed id if another record already used the original one.
    fn append_and_save(&mut self, observation: Observation) -> Result<Observation, StoreError>;

    /// Remove every stored observation.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// `observation`, renamed `<id>-<n>` if its id is already taken.
fn with_unique_id(existing: &[Observation], observation: Observation) -> Observation {
    let taken = |id: &str| existing.iter().any(|o| o.id() == id);
    if !taken(observation.id()) {
        return observation;
    }
    let base = observation.id().to_string();
    let mut n = 1;
    let id = loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            break candidate;
        }
        n += 1;
    };
    debug!(%base, %id, "observation id already taken");
    observation.with_id(id)
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_all(&self, observations: &[Observation]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let json = serde_json::to_string_pretty(observations).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), count = observations.len(), "saved observations");
        Ok(())
    }
}

impl ObservationStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Observation>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no observation store yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_err(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let observations: Vec<Observation> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), count = observations.len(), "loaded observations");
        Ok(observations)
    }

    fn append_and_save(&mut self, observation: Observation) -> Result<Observation, StoreError> {
        let mut observations = self.load_all()?;
        let observation = with_unique_id(&observations, observation);
        observations.push(observation.clone());
        self.write_all(&observations)?;
        Ok(observation)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared observations");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

/// In-process log, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    observations: Vec<Observation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<Vec<Observation>> for MemoryStore {
    fn from(observations: Vec<Observation>) -> Self {
        Self { observations }
    }
}

impl ObservationStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Observation>, StoreError> {
        Ok(self.observations.clone())
    }

    fn append_and_save(&mut self, observation: Observation) -> Result<Observation, StoreError> {
        let observation = with_unique_id(&self.observations, observation);
        self.observations.push(observation.clone());
        Ok(observation)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.observations.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample(secs: i64, location: &str) -> Observation {
        Observation::new("60", "12", "24", true, location, Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn append_preserves_insertion_order_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("observations.json");
        let mut store = JsonFileStore::new(&path);
        store.append_and_save(sample(200, "second-in-time")).unwrap();
        store.append_and_save(sample(100, "first-in-time")).unwrap();

        let reopened = JsonFileStore::new(&path);
        let all = reopened.load_all().unwrap();
        let locations: Vec<&str> = all.iter().map(Observation::location).collect();
        assert_eq!(locations, ["second-in-time", "first-in-time"]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observations.json");
        fs::write(&path, "{ not a list").unwrap();
        let err = JsonFileStore::new(&path).load_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "{err:?}");
    }

    #[test]
    fn reads_records_with_numeric_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observations.json");
        let raw = r#"[{"id":"1","soilHumidityPercent":75,"inclinationDegrees":"30",
            "ambientTemperatureCelsius":12.5,"rainedLastWeek":false,"location":"Quarry",
            "recordedAt":"2024-03-01T08:00:00Z"}]"#;
        fs::write(&path, raw).unwrap();
        let all = JsonFileStore::new(&path).load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].soil_humidity_percent().value(), Some(75.0));
        assert_eq!(all[0].inclination_degrees().value(), Some(30.0));
    }

    #[test]
    fn non_finite_reading_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observations.json");
        let mut store = JsonFileStore::new(&path);
        store.append_and_save(sample(1, "valid")).unwrap();
        store
            .append_and_save(Observation::new(f64::NAN, 1.0, f64::INFINITY, false, "odd", Utc.timestamp_opt(2, 0).unwrap()))
            .unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].soil_humidity_percent().value(), None);
        assert_eq!(all[1].ambient_temperature_celsius().value(), Some(f64::INFINITY));
        store.append_and_save(sample(3, "after")).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 3);
    }

    #[test]
    fn legacy_records_with_absent_or_null_fields_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observations.json");
        let raw = r#"[
            {"id":"1","soilHumidityPercent":"40","inclinationDegrees":"10",
             "ambientTemperatureCelsius":"20","rainedLastWeek":false,"location":"A",
             "recordedAt":"2024-03-01T08:00:00Z"},
            {"id":"2","soilHumidityPercent":"80","inclinationDegrees":"30",
             "rainedLastWeek":true,"location":"B","recordedAt":"2024-03-02T08:00:00Z"},
            {"id":"3","soilHumidityPercent":null,"inclinationDegrees":"30",
             "ambientTemperatureCelsius":"20","rainedLastWeek":true,"location":"C",
             "recordedAt":"2024-03-03T08:00:00Z"}
        ]"#;
        fs::write(&path, raw).unwrap();
        let mut store = JsonFileStore::new(&path);
        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 3);
        assert!(!all[0].has_missing_reading());
        assert!(all[1].has_missing_reading());
        assert!(all[2].has_missing_reading());

        store.append_and_save(sample(4, "new")).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 4);
    }

    #[test]
    fn same_millisecond_records_get_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("observations.json"));
        let first = store.append_and_save(sample(5, "a")).unwrap();
        let second = store.append_and_save(sample(5, "b")).unwrap();
        let third = store.append_and_save(sample(5, "c")).unwrap();
        assert_eq!(first.id(), "5000");
        assert_eq!(second.id(), "5000-1");
        assert_eq!(third.id(), "5000-2");

        let ids: Vec<String> = store.load_all().unwrap().iter().map(|o| o.id().to_string()).collect();
        assert_eq!(ids, ["5000", "5000-1", "5000-2"]);

        let mut memory = MemoryStore::new();
        memory.append_and_save(sample(5, "a")).unwrap();
        assert_eq!(memory.append_and_save(sample(5, "b")).unwrap().id(), "5000-1");
    }

    #[test]
    fn clear_removes_everything() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("observations.json"));
        store.clear().unwrap();
        store.append_and_save(sample(1, "a")).unwrap();
        store.clear().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn memory_store_behaves_like_a_log() {
        let mut store = MemoryStore::new();
        store.append_and_save(sample(1, "a")).unwrap();
        store.append_and_save(sample(2, "b")).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 2);
        store.clear().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }
}
