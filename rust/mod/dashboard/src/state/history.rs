//! History state, stored at `history/state`.

use reissue_client::HistoryRequest;
use serde::{Deserialize, Serialize};

pub const LOAD_ERROR: &str = "Failed to load previous requests.";

/// Previous requests list: accepted records first, then supplied history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub items: Vec<HistoryRequest>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HistoryState {
    pub const PATH: &'static str = "history/state";

    pub fn loading() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn loaded(items: Vec<HistoryRequest>) -> Self {
        Self {
            items,
            loading: false,
            error: None,
        }
    }

    /// Errors replace the list; nothing from either source is shown.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: Some(message.into()),
        }
    }
}
