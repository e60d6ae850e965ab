use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
pub mod memory;
pub mod sqs;

pub use sqs::SqsConnector;

/// Queue every purchase is written to.
pub const PURCHASE_QUEUE_NAME: &str = "ticket-queue";

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("invalid queue connection string: {0}")]
    InvalidConnectionString(String),

    #[error("queue service error: {0}")]
    Service(String),

    #[error("queue service did not return a URL for queue '{0}'")]
    MissingQueueUrl(String),
}

/// Handle to one named queue.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn create_if_not_exists(&self) -> Result<(), QueueError>;

    async fn send_message(&self, body: &str) -> Result<(), QueueError>;
}

/// Builds queue handles from a connection string.
#[async_trait]
pub trait QueueConnector: Send + Sync {
    async fn connect(
        &self,
        connection_string: &str,
        queue_name: &str,
    ) -> Result<Box<dyn MessageQueue>, QueueError>;
}
