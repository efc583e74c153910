use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A numeric field as captured by the entry surface.
///
/// Form input arrives as text while imported records may carry plain JSON
/// numbers, so both shapes deserialize into this type. A `null` or absent
/// field (records written before a field existed) reads as `Missing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Reading {
    /// Numeric value of the reading, read like a numeric keyboard entry:
    /// leading whitespace is skipped and the longest leading decimal number
    /// (or `Infinity`) is taken, so `"20°"` is 20 and `"1,5"` is 1.
    /// `None` when there is no leading number.
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Number(v) if !v.is_nan() => Some(*v),
            Reading::Number(_) | Reading::Missing => None,
            Reading::Text(s) => leading_number(s),
        }
    }

    /// No usable content: absent, `null` or an empty string.
    pub fn is_missing(&self) -> bool {
        match self {
            Reading::Missing => true,
            Reading::Text(s) => s.trim().is_empty(),
            Reading::Number(_) => false,
        }
    }

    /// JSON has no non-finite numbers; keep them as text so they survive a
    /// save and reload.
    fn normalized(self) -> Self {
        match self {
            Reading::Number(v) if v.is_nan() => Reading::Text("NaN".to_string()),
            Reading::Number(v) if v.is_infinite() => {
                Reading::Text(if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string())
            }
            other => other,
        }
    }
}

/// Longest leading decimal literal of `s`, after leading whitespace.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let sign = if negative { -1.0 } else { 1.0 };

    if s[i..].starts_with("Infinity") {
        return Some(sign * f64::INFINITY);
    }

    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_len = digits(i);
    let int_part = &s[i..i + int_len];
    i += int_len;

    let mut frac_part = "";
    if bytes.get(i) == Some(&b'.') {
        let frac_len = digits(i + 1);
        frac_part = &s[i + 1..i + 1 + frac_len];
        if int_len > 0 || frac_len > 0 {
            i += 1 + frac_len;
        }
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut exponent = "0";
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let sign_len = usize::from(matches!(bytes.get(i + 1), Some(b'+' | b'-')));
        let exp_len = digits(i + 1 + sign_len);
        if exp_len > 0 {
            exponent = &s[i + 1..i + 1 + sign_len + exp_len];
        }
    }

    let literal = format!(
        "{}.{}e{}",
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exponent,
    );
    literal.parse::<f64>().ok().map(|v| sign * v)
}

impl From<f64> for Reading {
    fn from(v: f64) -> Self {
        Reading::Number(v)
    }
}

impl From<&str> for Reading {
    fn from(s: &str) -> Self {
        Reading::Text(s.to_string())
    }
}

impl From<String> for Reading {
    fn from(s: String) -> Self {
        Reading::Text(s)
    }
}

/// One recorded set of field readings.
///
/// Fields are private so a stored record cannot be edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    id: String,
    #[serde(default)]
    soil_humidity_percent: Reading,
    #[serde(default)]
    inclination_degrees: Reading,
    #[serde(default)]
    ambient_temperature_celsius: Reading,
    rained_last_week: bool,
    location: String,
    recorded_at: DateTime<Utc>,
}

impl Observation {
    /// Build an observation without form validation. The id is the
    /// millisecond epoch of `recorded_at`; stores add a suffix when two
    /// records share a millisecond.
    pub fn new(
        soil_humidity_percent: impl Into<Reading>,
        inclination_degrees: impl Into<Reading>,
        ambient_temperature_celsius: impl Into<Reading>,
        rained_last_week: bool,
        location: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: recorded_at.timestamp_millis().to_string(),
            soil_humidity_percent: soil_humidity_percent.into().normalized(),
            inclination_degrees: inclination_degrees.into().normalized(),
            ambient_temperature_celsius: ambient_temperature_celsius.into().normalized(),
            rained_last_week,
            location: location.into(),
            recorded_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn soil_humidity_percent(&self) -> &Reading {
        &self.soil_humidity_percent
    }

    pub fn inclination_degrees(&self) -> &Reading {
        &self.inclination_degrees
    }

    pub fn ambient_temperature_celsius(&self) -> &Reading {
        &self.ambient_temperature_celsius
    }

    pub fn rained_last_week(&self) -> bool {
        self.rained_last_week
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// True when any numeric field is absent, `null` or an empty string, as
    /// in records written before a field existed or was required.
    pub fn has_missing_reading(&self) -> bool {
        self.soil_humidity_percent.is_missing()
            || self.inclination_degrees.is_missing()
            || self.ambient_temperature_celsius.is_missing()
    }

    /// Same record under a different id.
    pub(crate) fn with_id(self, id: String) -> Self {
        Self { id, ..self }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
}

/// Raw form input before it becomes an [`Observation`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDraft {
    pub soil_humidity_percent: String,
    pub inclination_degrees: String,
    pub ambient_temperature_celsius: String,
    #[serde(default)]
    pub rained_last_week: bool,
    pub location: String,
}

impl ObservationDraft {
    /// Every text field must be filled in. Whether the numbers parse is left
    /// to the classifier, which reports it as `InvalidData`.
    pub fn into_observation(self, now: DateTime<Utc>) -> Result<Observation, DraftError> {
        let required = [
            ("soilHumidityPercent", &self.soil_humidity_percent),
            ("inclinationDegrees", &self.inclination_degrees),
            ("ambientTemperatureCelsius", &self.ambient_temperature_celsius),
            ("location", &self.location),
        ];
        if let Some(&(field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DraftError::MissingField(field));
        }

        Ok(Observation::new(
            self.soil_humidity_percent,
            self.inclination_degrees,
            self.ambient_temperature_celsius,
            self.rained_last_week,
            self.location,
            now,
        ))
    }
}
