use std::time::Duration;

/// Dashboard behaviour knobs.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// How long a fresh submission shows "Request Submitted" before moving
    /// to "Under Review" without server confirmation.
    pub review_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            review_delay: Duration::from_secs(2),
        }
    }
}
