//! Student dashboard for ID-card reissue requests.
//!
//! A headless state engine on top of `reissue-flux`: handlers fetch from the
//! backend through [`reissue_client::ReissueApi`] and write typed states at
//! well-known paths; renderers read [`DashboardView`] or subscribe.
//!
//! ```text
//! session/open ──► status/refresh ──► progress/state
//!              └─► history/load   ──► history/state
//! form/submit  ──► form/submission, progress/state (+ review delay)
//! pickup/acknowledge ──► pickup/transfer, progress/state
//! ```

pub mod config;
pub mod handlers;
pub mod progress;
pub mod request;
pub mod session;
pub mod shell;
pub mod state;
pub mod view;

pub use config::DashboardConfig;
pub use handlers::{register_handlers, DashboardContext};
pub use progress::{reduce, ProgressEvent, Step};
pub use shell::Dashboard;
pub use view::DashboardView;
