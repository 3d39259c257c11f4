//! Wire types exchanged with the reissue backend.
//!
//! Decoding is forgiving: absent fields fall back to their
//! defaults, and an unrecognised status string decodes as
//! [`RequestStatus::Unknown`].

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-side lifecycle of the student's current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    #[default]
    None,
    UnderReview,
    ApprovedPrinting,
    ReadyPickup,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusDetails {
    pub has_id_card_request: bool,
    pub is_printing: bool,
    pub is_ready_for_pickup: bool,
}

/// `GET /api/status/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusResponse {
    pub success: bool,
    pub status: RequestStatus,
    pub form_enabled: bool,
    pub button_text: String,
    pub details: StatusDetails,
}

/// An accepted or archived reissue request. Identity is `id` (`_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub register_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

/// Absent and `null` both read as the empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl HistoryRequest {
    /// Calendar date of `created_at`, for RFC 3339 timestamps or plain
    /// `YYYY-MM-DD` dates.
    pub fn accepted_on(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(&self.created_at, "%Y-%m-%d"))
            .ok()
    }
}

/// `GET /api/acceptedidcards/user/{id}` answers with a bare array or with
/// `{requests: [...]}`; anything else counts as no accepted records.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AcceptedPayload {
    List(Vec<HistoryRequest>),
    Wrapped { requests: Vec<HistoryRequest> },
    Other(serde_json::Value),
}

impl AcceptedPayload {
    pub fn into_requests(self) -> Vec<HistoryRequest> {
        match self {
            AcceptedPayload::List(requests) | AcceptedPayload::Wrapped { requests } => requests,
            AcceptedPayload::Other(_) => Vec::new(),
        }
    }
}

/// `POST /api/acceptedidcards/transfer-to-history/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferResponse {
    pub success: bool,
    pub message: String,
    pub transferred_count: u32,
}

/// `POST /api/idcards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default = "yes")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

fn yes() -> bool {
    true
}

/// `GET /api/check-eligibility/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub message: String,
}

/// New reissue request, sent as a multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueForm {
    pub register_number: String,
    pub name: String,
    pub department: String,
    pub year: String,
    pub section: String,
    pub reason: String,
    pub dob: String,
    pub library_code: String,
}

impl ReissueForm {
    /// Multipart field names and values, in the order the backend expects.
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("registerNumber", self.register_number.as_str()),
            ("name", self.name.as_str()),
            ("department", self.department.as_str()),
            ("year", self.year.as_str()),
            ("section", self.section.as_str()),
            ("reason", self.reason.as_str()),
            ("dob", self.dob.as_str()),
            ("libraryCode", self.library_code.as_str()),
        ]
    }
}
