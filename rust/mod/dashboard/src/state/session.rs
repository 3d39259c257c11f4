//! Session state, stored at `session/state`.

use std::sync::Arc;

use reissue_client::HistoryRequest;

/// Who the dashboard is showing, plus the archived records the host
/// application already knows about.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub register_number: Option<String>,
    pub history: Arc<Vec<HistoryRequest>>,
    /// Bumped on every identity change.
    pub epoch: u64,
}

impl SessionState {
    pub const PATH: &'static str = "session/state";
}
