use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::models::PurchaseRequest;
use crate::queue::{QueueConnector, QueueError, PURCHASE_QUEUE_NAME};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("queue connection string is not configured")]
    NotConfigured,

    #[error("failed to serialize purchase: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Writes validated purchases to the purchase queue.
///
/// Nothing is cached between calls: every publish builds its own queue
/// handle, makes sure the queue exists and sends exactly one message.
#[derive(Clone)]
pub struct TicketPublisher {
    connector: Arc<dyn QueueConnector>,
    connection_string: Option<String>,
    queue_name: String,
}

impl TicketPublisher {
    pub fn new(connector: Arc<dyn QueueConnector>, connection_string: Option<String>) -> Self {
        Self {
            connector,
            connection_string: connection_string.filter(|s| !s.trim().is_empty()),
            queue_name: PURCHASE_QUEUE_NAME.to_string(),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub fn is_configured(&self) -> bool {
        self.connection_string.is_some()
    }

    pub async fn publish(&self, purchase: &PurchaseRequest) -> Result<(), PublishError> {
        let connection_string = self
            .connection_string
            .as_deref()
            .ok_or(PublishError::NotConfigured)?;

        let message = serde_json::to_string(purchase)?;

        let queue = self
            .connector
            .connect(connection_string, &self.queue_name)
            .await?;
        queue.create_if_not_exists().await?;
        queue.send_message(&message).await?;

        info!(
            queue = %self.queue_name,
            event_id = purchase.event_id,
            quantity = purchase.quantity,
            bytes = message.len(),
            "Ticket purchase queued"
        );
        Ok(())
    }
}
