//! Recording queue used by tests in place of a real queue service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{MessageQueue, QueueConnector, QueueError};

#[derive(Debug, Default)]
struct Recorded {
    connections: Vec<(String, String)>,
    created: Vec<String>,
    send_attempts: usize,
    messages: Vec<(String, String)>,
}

/// Connector whose queues keep every message in memory.
#[derive(Clone, Default)]
pub struct RecordingConnector {
    recorded: Arc<Mutex<Recorded>>,
    fail_create: Option<String>,
    fail_send: Option<String>,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `send_message` fails with the given service error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_send: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Every `create_if_not_exists` fails, so nothing is ever sent.
    pub fn failing_create(reason: impl Into<String>) -> Self {
        Self {
            fail_create: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn connection_count(&self) -> usize {
        self.recorded.lock().unwrap().connections.len()
    }

    pub fn last_connection_string(&self) -> Option<String> {
        self.recorded
            .lock()
            .unwrap()
            .connections
            .last()
            .map(|(conn, _)| conn.clone())
    }

    pub fn created_queues(&self) -> Vec<String> {
        self.recorded.lock().unwrap().created.clone()
    }

    pub fn send_attempts(&self) -> usize {
        self.recorded.lock().unwrap().send_attempts
    }

    /// Messages delivered to `queue`, oldest first.
    pub fn messages(&self, queue: &str) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|(q, _)| q == queue)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

#[async_trait]
impl QueueConnector for RecordingConnector {
    async fn connect(
        &self,
        connection_string: &str,
        queue_name: &str,
    ) -> Result<Box<dyn MessageQueue>, QueueError> {
        self.recorded
            .lock()
            .unwrap()
            .connections
            .push((connection_string.to_string(), queue_name.to_string()));

        Ok(Box::new(RecordingQueue {
            name: queue_name.to_string(),
            recorded: Arc::clone(&self.recorded),
            fail_create: self.fail_create.clone(),
            fail_send: self.fail_send.clone(),
        }))
    }
}

struct RecordingQueue {
    name: String,
    recorded: Arc<Mutex<Recorded>>,
    fail_create: Option<String>,
    fail_send: Option<String>,
}

#[async_trait]
impl MessageQueue for RecordingQueue {
    async fn create_if_not_exists(&self) -> Result<(), QueueError> {
        if let Some(reason) = &self.fail_create {
            return Err(QueueError::Service(reason.clone()));
        }
        let mut recorded = self.recorded.lock().unwrap();
        if !recorded.created.contains(&self.name) {
            recorded.created.push(self.name.clone());
        }
        Ok(())
    }

    async fn send_message(&self, body: &str) -> Result<(), QueueError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.send_attempts += 1;
        if let Some(reason) = &self.fail_send {
            return Err(QueueError::Service(reason.clone()));
        }
        recorded
            .messages
            .push((self.name.clone(), body.to_string()));
        Ok(())
    }
}
