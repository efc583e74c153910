//! JavaScript bindings for a mobile or web shell.
//!
//! The shell keeps its own storage; it hands observations in as JSON and
//! gets plain objects back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use slopewatch_core::{
    classify as classify_observation, mitigation, Observation, ObservationDraft, RiskLabel,
    SeverityColor,
};

// Fields spelled out: serde-wasm-bindgen turns flattened structs into a JS Map.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Classified {
    label: RiskLabel,
    severity_color: SeverityColor,
    actions: &'static [&'static str],
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Classify an observation given as JSON.
/// Returns `{ label, severityColor, actions }`.
#[wasm_bindgen]
pub fn classify(observation_json: &str) -> Result<JsValue, JsValue> {
    let observation: Observation = serde_json::from_str(observation_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid observation: {e}")))?;
    let level = classify_observation(&observation);
    to_js(&Classified {
        label: level.label,
        severity_color: level.severity_color,
        actions: level.actions(),
    })
}

/// Recommended actions for a label such as `"Moderate"` or `"NoData"`.
#[wasm_bindgen]
pub fn mitigation_actions(label: &str) -> Result<JsValue, JsValue> {
    let actions = mitigation::actions_for_label(label)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown risk label: {label}")))?;
    to_js(&actions)
}

/// Turn raw form input into a timestamped observation, ready for the shell
/// to append to its stored list.
#[wasm_bindgen]
pub fn new_observation(draft_json: &str) -> Result<JsValue, JsValue> {
    let draft: ObservationDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft: {e}")))?;
    let observation = draft
        .into_observation(now())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&observation)
}
