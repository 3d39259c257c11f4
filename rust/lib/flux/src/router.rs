use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::store::StateStore;
use crate::topic;

/// A boxed, `Send`-able future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased handler. Takes owned values so the future can be `'static`.
type ErasedHandler =
    Arc<dyn Fn(String, Arc<dyn Any + Send + Sync>, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Request router: maps path patterns to async handlers.
///
/// Several handlers may match one path; they run sequentially in
/// registration order.
pub struct Router {
    routes: RwLock<Vec<(String, ErasedHandler)>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(Vec::new()),
        }
    }

    /// Register an async handler for a path pattern (`+` / `#` allowed).
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Arc<dyn Any + Send + Sync>, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: ErasedHandler = Arc::new(
            move |path: String,
                  payload: Arc<dyn Any + Send + Sync>,
                  store: Arc<StateStore>|
                  -> BoxFuture { Box::pin(handler(path, payload, store)) },
        );
        self.routes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((pattern.to_string(), handler));
    }

    /// Dispatch a request to all matching handlers. No match is a no-op.
    pub async fn dispatch(
        &self,
        path: &str,
        payload: Arc<dyn Any + Send + Sync>,
        store: Arc<StateStore>,
    ) {
        let handlers = self.matching(path);
        if handlers.is_empty() {
            debug!("no handler for {}", path);
        }
        for handler in handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
    }

    /// Check if any handler would match the given path.
    pub fn matches(&self, path: &str) -> bool {
        !self.matching(path).is_empty()
    }

    fn matching(&self, path: &str) -> Vec<ErasedHandler> {
        self.routes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(pattern, _)| topic::matches(pattern, path))
            .map(|(_, h)| Arc::clone(h))
            .collect()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
