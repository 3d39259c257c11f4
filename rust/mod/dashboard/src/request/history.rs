//! History requests.

use std::sync::Arc;

use reissue_client::HistoryRequest;

/// Re-fetch accepted records and rebuild the list.
#[derive(Debug, Clone)]
pub struct LoadHistoryReq;

impl LoadHistoryReq {
    pub const PATH: &'static str = "history/load";
}

/// Replace the externally known history. Reloads only when the list is a
/// different allocation from the current one.
#[derive(Debug, Clone)]
pub struct SupplyHistoryReq {
    pub history: Arc<Vec<HistoryRequest>>,
}

impl SupplyHistoryReq {
    pub const PATH: &'static str = "history/supply";
}
