//! Pickup requests.

/// The student pressed OK on the ready-for-pickup banner.
#[derive(Debug, Clone)]
pub struct AcknowledgePickupReq;

impl AcknowledgePickupReq {
    pub const PATH: &'static str = "pickup/acknowledge";
}
