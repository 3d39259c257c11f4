use crate::error::ApiError;
use crate::model::{
    EligibilityResponse, HistoryRequest, ReissueForm, StatusResponse, SubmitResponse,
    TransferResponse,
};

/// Operations the dashboard needs from the reissue backend.
///
/// [`crate::HttpClient`] talks to a real server; tests substitute an
/// in-memory implementation.
#[async_trait::async_trait]
pub trait ReissueApi: Send + Sync + 'static {
    /// Composite status for a register number. Non-2xx replies are errors.
    async fn status(&self, register_number: &str) -> Result<StatusResponse, ApiError>;

    /// Currently accepted records. A JSON body of an unexpected shape,
    /// whatever its HTTP status, yields an empty list.
    async fn accepted_requests(&self, register_number: &str)
        -> Result<Vec<HistoryRequest>, ApiError>;

    /// Archive the accepted record into history. The body is decoded
    /// regardless of HTTP status so `success:false` replies carry their
    /// message through.
    async fn transfer_to_history(&self, register_number: &str)
        -> Result<TransferResponse, ApiError>;

    /// Submit a new reissue request. Non-2xx replies are errors carrying the
    /// server's message.
    async fn submit_request(&self, form: &ReissueForm) -> Result<SubmitResponse, ApiError>;

    async fn check_eligibility(&self, register_number: &str)
        -> Result<EligibilityResponse, ApiError>;

    /// Liveness check. `Ok` only on a 2xx reply.
    async fn health(&self) -> Result<(), ApiError>;
}
