use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::config::{Credentials, Region};
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::Client;
use tokio::sync::{Mutex, OnceCell};

use super::{MessageQueue, QueueConnector, QueueError};

const CREDENTIALS_PROVIDER_NAME: &str = "connection-string";

/// Settings parsed from a connection string such as
/// `Endpoint=http://localhost:4566;Region=us-east-1;AccessKeyId=test;SecretAccessKey=test`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqsConnectionString {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl SqsConnectionString {
    pub fn parse(raw: &str) -> Result<Self, QueueError> {
        let mut parsed = Self::default();

        // Errors name the segment position only; segments may hold secrets.
        let segments = raw
            .split(';')
            .map(str::trim)
            .enumerate()
            .filter(|(_, s)| !s.is_empty());
        for (index, segment) in segments {
            let position = index + 1;
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                QueueError::InvalidConnectionString(format!(
                    "segment {position} is not Key=Value"
                ))
            })?;
            let key = key.trim();
            let value = value.trim();
            if value.is_empty() {
                return Err(QueueError::InvalidConnectionString(format!(
                    "segment {position} has an empty value"
                )));
            }

            let slot = match key.to_ascii_lowercase().as_str() {
                "endpoint" => &mut parsed.endpoint,
                "region" => &mut parsed.region,
                "accesskeyid" => &mut parsed.access_key_id,
                "secretaccesskey" => &mut parsed.secret_access_key,
                "sessiontoken" => &mut parsed.session_token,
                _ => {
                    return Err(QueueError::InvalidConnectionString(format!(
                        "segment {position} has an unknown key"
                    )))
                }
            };
            *slot = Some(value.to_string());
        }

        if parsed.access_key_id.is_some() != parsed.secret_access_key.is_some() {
            return Err(QueueError::InvalidConnectionString(
                "AccessKeyId and SecretAccessKey must be given together".to_string(),
            ));
        }
        if parsed.session_token.is_some() && parsed.access_key_id.is_none() {
            return Err(QueueError::InvalidConnectionString(
                "SessionToken requires AccessKeyId and SecretAccessKey".to_string(),
            ));
        }

        Ok(parsed)
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some(Credentials::new(
                id,
                secret,
                self.session_token.clone(),
                None,
                CREDENTIALS_PROVIDER_NAME,
            )),
            _ => None,
        }
    }
}

/// Connects to Amazon SQS (or any SQS-compatible endpoint).
///
/// One client is built per distinct connection string and reused, so the
/// provider chains and credential cache are set up once. Queue handles are
/// still created per call.
#[derive(Debug, Default)]
pub struct SqsConnector {
    clients: Mutex<HashMap<String, Client>>,
}

impl SqsConnector {
    pub fn new() -> Self {
        Self::default()
    }

    async fn client(&self, connection_string: &str) -> Result<Client, QueueError> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(connection_string) {
            return Ok(client.clone());
        }

        let settings = SqsConnectionString::parse(connection_string)?;
        let client = build_client(&settings).await;
        clients.insert(connection_string.to_string(), client.clone());
        Ok(client)
    }
}

async fn build_client(settings: &SqsConnectionString) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = settings.region.clone() {
        loader = loader.region(Region::new(region));
    }
    if let Some(endpoint) = settings.endpoint.clone() {
        loader = loader.endpoint_url(endpoint);
    }
    if let Some(credentials) = settings.credentials() {
        loader = loader.credentials_provider(credentials);
    }
    let sdk_config = loader.load().await;

    tracing::debug!(
        endpoint = settings.endpoint.as_deref().unwrap_or("default"),
        region = ?sdk_config.region(),
        "SQS client configured"
    );
    Client::new(&sdk_config)
}

#[async_trait]
impl QueueConnector for SqsConnector {
    async fn connect(
        &self,
        connection_string: &str,
        queue_name: &str,
    ) -> Result<Box<dyn MessageQueue>, QueueError> {
        let client = self.client(connection_string).await?;

        Ok(Box::new(SqsQueue {
            client,
            name: queue_name.to_string(),
            url: OnceCell::new(),
        }))
    }
}

pub struct SqsQueue {
    client: Client,
    name: String,
    url: OnceCell<String>,
}

impl SqsQueue {
    async fn queue_url(&self) -> Result<&str, QueueError> {
        let url = self
            .url
            .get_or_try_init(|| async {
                let output = self
                    .client
                    .get_queue_url()
                    .queue_name(&self.name)
                    .send()
                    .await
                    .map_err(|e| QueueError::Service(DisplayErrorContext(&e).to_string()))?;
                output
                    .queue_url()
                    .map(str::to_owned)
                    .ok_or_else(|| QueueError::MissingQueueUrl(self.name.clone()))
            })
            .await?;
        Ok(url.as_str())
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn create_if_not_exists(&self) -> Result<(), QueueError> {
        // CreateQueue returns the existing URL when the queue is already there.
        let output = self
            .client
            .create_queue()
            .queue_name(&self.name)
            .send()
            .await
            .map_err(|e| QueueError::Service(DisplayErrorContext(&e).to_string()))?;

        let url = output
            .queue_url()
            .ok_or_else(|| QueueError::MissingQueueUrl(self.name.clone()))?;
        let _ = self.url.set(url.to_string());
        Ok(())
    }

    async fn send_message(&self, body: &str) -> Result<(), QueueError> {
        let url = self.queue_url().await?;

        let output = self
            .client
            .send_message()
            .queue_url(url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| QueueError::Service(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(
            queue = %self.name,
            message_id = output.message_id().unwrap_or_default(),
            "SQS message sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_connection_string() {
        let parsed = SqsConnectionString::parse(
            "Endpoint=http://localhost:4566;Region=us-east-1;AccessKeyId=test;SecretAccessKey=secret;",
        )
        .unwrap();

        assert_eq!(parsed.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(parsed.region.as_deref(), Some("us-east-1"));
        assert_eq!(parsed.access_key_id.as_deref(), Some("test"));
        assert_eq!(parsed.secret_access_key.as_deref(), Some("secret"));
        assert!(parsed.session_token.is_none());
        assert!(parsed.credentials().is_some());
    }

    #[test]
    fn test_parse_keys_are_case_insensitive() {
        let parsed = SqsConnectionString::parse("region=ca-central-1 ; ENDPOINT = http://q:9324").unwrap();

        assert_eq!(parsed.region.as_deref(), Some("ca-central-1"));
        assert_eq!(parsed.endpoint.as_deref(), Some("http://q:9324"));
        assert!(parsed.credentials().is_none());
    }

    #[test]
    fn test_endpoint_value_may_contain_equals() {
        let parsed = SqsConnectionString::parse("Endpoint=http://q:9324/?a=b").unwrap();

        assert_eq!(parsed.endpoint.as_deref(), Some("http://q:9324/?a=b"));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for raw in [
            "Endpoint",
            "Region=",
            "AccountName=devstore",
            "AccessKeyId=only-half",
            "SessionToken=abc",
        ] {
            let err = SqsConnectionString::parse(raw).unwrap_err();
            assert!(
                matches!(err, QueueError::InvalidConnectionString(_)),
                "{raw} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_errors_do_not_echo_segments() {
        for (raw, expected) in [
            (
                "Region=us-east-1;AccessKeyId=AKIA;SecretAccessKey:TOPSECRET123",
                "invalid queue connection string: segment 3 is not Key=Value",
            ),
            (
                "Region=us-east-1;;SecretAcessKey=TOPSECRET123",
                "invalid queue connection string: segment 3 has an unknown key",
            ),
        ] {
            let err = SqsConnectionString::parse(raw).unwrap_err();

            assert_eq!(err.to_string(), expected);
            assert!(!err.to_string().contains("TOPSECRET123"));
        }
    }

    #[tokio::test]
    async fn test_connect_fails_fast_on_bad_connection_string() {
        let result = SqsConnector::new().connect("not a connection string", "ticket-queue").await;

        assert!(matches!(
            result,
            Err(QueueError::InvalidConnectionString(_))
        ));
    }
}
