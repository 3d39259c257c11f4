//! Flux: headless state engine for the reissue dashboard.
//!
//! Rust owns all dashboard state and logic; a renderer (terminal, web view,
//! mobile shell) only reads state and forwards user intents.
//!
//! # Three Primitives
//!
//! - `get(path)`: read state at a path, Arc zero-copy
//! - `emit(path, payload)`: send a request, routed to the matching handler(s)
//! - `subscribe(pattern)`: observe state changes
//!
//! # Path Addressing
//!
//! State and requests share a flat `/`-separated namespace:
//! - State: `progress/state`, `history/state`, `pickup/transfer`
//! - Requests: `session/open`, `form/submit`, `pickup/acknowledge`
//!
//! Patterns use MQTT-style wildcards: `+` matches one level, a trailing `#`
//! matches everything below (see [`topic::matches`]).
//!
//! # Example
//!
//! ```ignore
//! use reissue_flux::Flux;
//!
//! let flux = Flux::new();
//!
//! flux.on("session/open", |_, _, store| async move {
//!     store.set("session/state", "open".to_string());
//! });
//!
//! flux.subscribe("#", |path, _| println!("state changed: {}", path));
//!
//! flux.emit("session/open", ()).await;
//! ```

pub mod app;
pub mod router;
pub mod store;
pub mod topic;
pub mod value;

pub use app::Flux;
pub use router::{BoxFuture, Router};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
