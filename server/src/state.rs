use std::sync::Arc;

use crate::queue::QueueConnector;
use crate::services::TicketPublisher;

#[derive(Clone)]
pub struct AppState {
    pub publisher: TicketPublisher,
}

impl AppState {
    pub fn new(connector: Arc<dyn QueueConnector>, queue_connection_string: Option<String>) -> Self {
        Self {
            publisher: TicketPublisher::new(connector, queue_connection_string),
        }
    }
}
