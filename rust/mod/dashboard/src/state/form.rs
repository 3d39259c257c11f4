//! Submission form states, stored under `form/`.

use serde::{Deserialize, Serialize};

use super::Notice;

pub const FORM_CLOSED: &str = "A request is already in progress";
pub const SUBMIT_ERROR: &str = "Error submitting ID card request";
pub const ELIGIBILITY_ERROR: &str = "Could not check eligibility";

/// Outcome of the last submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionState {
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl SubmissionState {
    pub const PATH: &'static str = "form/submission";
}

/// Result of the pre-submission eligibility check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityState {
    pub checking: bool,
    /// `None` until a check has completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EligibilityState {
    pub const PATH: &'static str = "form/eligibility";
}
