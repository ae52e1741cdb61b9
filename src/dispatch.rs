//! Task dispatch: turning a work item into a remote task
//!
//! Pure orchestration over [`MarketplaceClient::create_task`]; adds no error
//! kinds of its own. Dispatching has real monetary cost, so a failed dispatch
//! aborts that work item's processing entirely rather than retrying.

use crate::error::MarketResult;
use crate::marketplace::MarketplaceClient;
use crate::task::{TaskHandle, WorkItem};
use std::sync::Arc;
use tracing::{error, info};

/// Dispatches work items to the marketplace
pub struct TaskDispatcher {
    client: Arc<MarketplaceClient>,
}

impl TaskDispatcher {
    pub fn new(client: Arc<MarketplaceClient>) -> Self {
        Self { client }
    }

    /// Create one remote task for the given work item.
    ///
    /// Callers must not call this more than once per logical work item
    /// without a fresh idempotency token on the item.
    pub async fn dispatch(&self, item: &WorkItem) -> MarketResult<TaskHandle> {
        info!(
            external_id = %item.external_id,
            title = %item.title,
            reward = %item.reward_amount,
            "dispatching task to marketplace"
        );

        let handle = match self.client.create_task(item).await {
            Ok(handle) => handle,
            Err(e) => {
                error!(external_id = %item.external_id, error = %e, "dispatch failed");
                return Err(e);
            }
        };

        info!(
            external_id = %item.external_id,
            task_id = %handle.task_id,
            "task created"
        );
        Ok(handle)
    }
}
