use crate::error::ServerError;
use crate::store::core::StoreContext;
use chrono::Utc;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Purges expired sessions from the document store on a fixed interval.
/// Expired tokens are already rejected at resolution time; this keeps the
/// store from accumulating dead records.
pub struct SessionSweeper {
    store_context: Arc<StoreContext>,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(store_context: Arc<StoreContext>, interval: Duration) -> Self {
        Self {
            store_context,
            interval,
        }
    }

    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            tokio::time::sleep(self.interval).await;
            let removed = self.store_context.session_store.delete_expired(Utc::now())?;
            if removed > 0 {
                debug!("Session sweeper removed {removed} expired sessions");
            }
        }
    }
}
