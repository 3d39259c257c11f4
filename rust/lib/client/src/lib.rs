//! HTTP client for the ID-card reissue backend.
//!
//! [`ReissueApi`] is the seam the dashboard talks to; [`HttpClient`] is the
//! reqwest implementation. Every endpoint is scoped by the student's
//! register number, sent as a single percent-encoded path segment.
//!
//! # Usage
//!
//! ```ignore
//! use reissue_client::{ClientConfig, HttpClient, ReissueApi};
//!
//! let client = HttpClient::new(&ClientConfig::default())?;
//! let status = client.status("ELIGIBLE001").await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod model;

pub use api::ReissueApi;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::HttpClient;
pub use model::{
    AcceptedPayload, EligibilityResponse, HistoryRequest, ReissueForm, RequestStatus,
    StatusDetails, StatusResponse, SubmitResponse, TransferResponse,
};
