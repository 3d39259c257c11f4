//! Session lifecycle requests.

use std::sync::Arc;

use reissue_client::HistoryRequest;

/// Switch the dashboard to a student (or to nobody). Always counts as an
/// identity change, even for the same register number.
#[derive(Debug, Clone)]
pub struct OpenSessionReq {
    pub register_number: Option<String>,
    pub history: Arc<Vec<HistoryRequest>>,
}

impl OpenSessionReq {
    pub const PATH: &'static str = "session/open";
}

/// Tear down: cancel pending timers and ignore in-flight replies.
#[derive(Debug, Clone)]
pub struct CloseSessionReq;

impl CloseSessionReq {
    pub const PATH: &'static str = "session/close";
}

/// Re-fetch the composite status for the current student.
#[derive(Debug, Clone)]
pub struct RefreshStatusReq;

impl RefreshStatusReq {
    pub const PATH: &'static str = "status/refresh";
}
