//! Questionnaire intake: the submitted payload, its echo response, and a
//! single-slot store for the most recent submission.
//!
//! Browser forms send every value as a string, so numeric fields accept either
//! a JSON number or numeric text.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;
use crate::estimate::{DEFAULT_STORE, DEFAULT_WEEKLY_BUDGET, EatOutFrequency, RatioInputs};

pub const RECEIVED_MESSAGE: &str = "User info received successfully!";

/// A number or numeric-looking text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub name: Option<String>,
    pub address: Option<String>,
    pub school: Option<String>,
    pub year: Option<Scalar>,
    pub program: Option<String>,
    pub neighbourhood: Option<String>,
    #[serde(rename = "housingType")]
    pub housing_type: Option<String>,
    pub transport: Option<String>,
    pub eat_out: Option<String>,
    pub grocery_stores: Option<String>,
    pub grocery_budget: Option<Scalar>,
}

impl Submission {
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::parse(format!("Invalid submission JSON: {e}")))
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::from_open(&e, "submission", path))?;
        Self::from_json(&text)
    }

    /// Inputs for the ratio estimator, with defaults for blank or missing fields.
    pub fn cost_inputs(&self) -> RatioInputs {
        let weekly_budget = match self.grocery_budget.as_ref().map(Scalar::as_f64) {
            Some(Some(v)) => v,
            Some(None) => {
                debug!("unparseable grocery_budget; using default");
                DEFAULT_WEEKLY_BUDGET
            }
            None => DEFAULT_WEEKLY_BUDGET,
        };
        let store = non_blank(&self.grocery_stores)
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_STORE.to_string());
        let eat_out = non_blank(&self.eat_out)
            .map(EatOutFrequency::from_text)
            .unwrap_or_default();
        RatioInputs {
            weekly_budget,
            store,
            eat_out,
        }
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Echo returned for every accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub message: String,
    pub received: Submission,
}

impl IntakeResponse {
    pub fn new(received: Submission) -> Self {
        Self {
            message: RECEIVED_MESSAGE.to_string(),
            received,
        }
    }
}

/// Holds the most recent submission; each `record` replaces the previous one.
#[derive(Debug, Default)]
pub struct LastSubmission {
    slot: Mutex<Option<Submission>>,
}

impl LastSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `submission` and return the response echoing it.
    pub fn record(&self, submission: Submission) -> IntakeResponse {
        info!(school = submission.school.as_deref().unwrap_or("-"), "submission received");
        *self.lock() = Some(submission.clone());
        IntakeResponse::new(submission)
    }

    pub fn latest(&self) -> Option<Submission> {
        self.lock().clone()
    }

    /// Estimator inputs from the latest submission, or the defaults when
    /// nothing has been recorded.
    pub fn latest_cost_inputs(&self) -> RatioInputs {
        self.latest().map(|s| s.cost_inputs()).unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Submission>> {
        // A poisoned slot still holds a complete value.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_payload_with_string_numbers() {
        let json = r#"{
            "name": "Sam", "school": "McGill", "year": "2",
            "housingType": "apartment", "eat_out": "3-5x",
            "grocery_stores": "IGA", "grocery_budget": "120.5"
        }"#;
        let s = Submission::from_json(json).unwrap();
        assert_eq!(s.housing_type.as_deref(), Some("apartment"));
        assert_eq!(s.year.as_ref().and_then(Scalar::as_f64), Some(2.0));

        let inputs = s.cost_inputs();
        assert_eq!(inputs.weekly_budget, 120.5);
        assert_eq!(inputs.store, "iga");
        assert_eq!(inputs.eat_out, EatOutFrequency::ThreeToFiveWeekly);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let s = Submission::from_json(r#"{"grocery_budget": 95, "grocery_stores": "  "}"#).unwrap();
        let inputs = s.cost_inputs();
        assert_eq!(inputs.weekly_budget, 95.0);
        assert_eq!(inputs.store, "other");
        assert_eq!(inputs.eat_out, EatOutFrequency::OnceOrTwiceWeekly);

        let bad = Submission::from_json(r#"{"grocery_budget": "lots"}"#).unwrap();
        assert_eq!(bad.cost_inputs(), RatioInputs::default());
    }

    #[test]
    fn response_echoes_with_camel_case_housing() {
        let store = LastSubmission::new();
        let resp = store.record(Submission {
            housing_type: Some("residence".into()),
            ..Submission::default()
        });
        assert_eq!(resp.message, RECEIVED_MESSAGE);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["received"]["housingType"], "residence");
    }

    #[test]
    fn slot_keeps_only_the_latest() {
        let store = LastSubmission::new();
        assert!(store.latest().is_none());
        store.record(Submission { name: Some("a".into()), ..Submission::default() });
        store.record(Submission { name: Some("b".into()), ..Submission::default() });
        assert_eq!(store.latest().and_then(|s| s.name).as_deref(), Some("b"));
    }

    #[test]
    fn cost_inputs_follow_the_latest_submission() {
        let store = LastSubmission::new();
        assert_eq!(store.latest_cost_inputs(), RatioInputs::default());

        store.record(Submission::from_json(r#"{"grocery_budget": 150, "eat_out": "daily"}"#).unwrap());
        store.record(Submission::from_json(r#"{"grocery_budget": "60", "grocery_stores": "Costco"}"#).unwrap());
        let inputs = store.latest_cost_inputs();
        assert_eq!(inputs.weekly_budget, 60.0);
        assert_eq!(inputs.store, "costco");
        assert_eq!(inputs.eat_out, EatOutFrequency::OnceOrTwiceWeekly);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = Submission::from_json("{not json").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
