pub mod context;
pub mod dashboard;
pub mod form;
pub mod health;
pub mod validate;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use reissue_client::{ClientConfig, HttpClient};

/// Build the HTTP client for a resolved server URL.
pub fn client(server: &str) -> Result<Arc<HttpClient>> {
    let client = HttpClient::new(&ClientConfig::new(server))
        .with_context(|| format!("invalid server URL {:?}", server))?;
    Ok(Arc::new(client))
}
