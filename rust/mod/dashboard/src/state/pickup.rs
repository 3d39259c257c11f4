//! Pickup acknowledgement state, stored at `pickup/transfer`.

use serde::{Deserialize, Serialize};

use super::Notice;

pub const TRANSFER_FAILED: &str = "Transfer failed";
pub const TRANSFER_ERROR: &str = "Error transferring ID cards to history";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferState {
    /// A transfer request is in flight; the OK control is disabled.
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl TransferState {
    pub const PATH: &'static str = "pickup/transfer";
}
