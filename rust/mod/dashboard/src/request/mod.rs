//! Request definitions.
//!
//! Each struct is a typed request payload with a `PATH` const; handlers are
//! registered for these paths in `handlers::register_handlers`.

pub mod form;
pub mod history;
pub mod pickup;
pub mod session;

pub use form::{CheckEligibilityReq, SubmitFormReq};
pub use history::{LoadHistoryReq, SupplyHistoryReq};
pub use pickup::AcknowledgePickupReq;
pub use session::{CloseSessionReq, OpenSessionReq, RefreshStatusReq};
