//! Outbound SMS gateway client.
//!
//! Messages are handed to the httpSMS API, which relays them through the
//! user's Android phone.
//! Reference: https://api.httpsms.com/index.html#/Messages/post_messages_send

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

/// Path of the send endpoint relative to the API base URL.
const SEND_PATH: &str = "v1/messages/send";

/// Errors returned by an [`SmsGateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("cannot reach SMS gateway: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("SMS gateway rejected the message with status {status}")]
    Rejected { status: u16, body: String },

    #[error("invalid SMS gateway URL: {0}")]
    Url(#[from] url::ParseError),
}

/// An SMS ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsMessage {
    pub from: String,
    pub to: String,
    pub content: String,
}

/// Sends SMS messages.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, message: &SmsMessage) -> Result<(), GatewayError>;
}

/// httpSMS API client.
#[derive(Clone)]
pub struct HttpSmsGateway {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl HttpSmsGateway {
    pub fn new(client: Client, base_url: Url, api_key: String, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }

    fn send_url(&self) -> Result<Url, GatewayError> {
        // Url::join drops the last path segment unless it ends with a slash.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(base.join(SEND_PATH)?)
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send(&self, message: &SmsMessage) -> Result<(), GatewayError> {
        let url = self.send_url()?;

        info!(
            url = %url,
            content_length = message.content.len(),
            "sms_gateway_send_starting"
        );

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(
                        timeout_seconds = self.timeout.as_secs_f64(),
                        error = %e,
                        "sms_gateway_send_timeout"
                    );
                } else {
                    error!(error = %e, "sms_gateway_send_error");
                }
                GatewayError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status_code = status.as_u16(), body = %body, "sms_gateway_send_rejected");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(status_code = status.as_u16(), "sms_gateway_send_complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> SmsMessage {
        SmsMessage {
            from: "+18005550100".to_string(),
            to: "+18005550199".to_string(),
            content: "Hello World".to_string(),
        }
    }

    fn gateway(base_url: &str) -> HttpSmsGateway {
        HttpSmsGateway::new(
            Client::new(),
            Url::parse(base_url).unwrap(),
            "test-api-key".to_string(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_send_url_joins_base_path() {
        assert_eq!(
            gateway("https://api.httpsms.com").send_url().unwrap().as_str(),
            "https://api.httpsms.com/v1/messages/send"
        );
        assert_eq!(
            gateway("http://localhost:8000/proxy").send_url().unwrap().as_str(),
            "http://localhost:8000/proxy/v1/messages/send"
        );
    }

    #[tokio::test]
    async fn test_send_posts_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages/send"))
            .and(header("x-api-key", "test-api-key"))
            .and(body_json(serde_json::json!({
                "from": "+18005550100",
                "to": "+18005550199",
                "content": "Hello World"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        gateway(&server.uri()).send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages/send"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        match gateway(&server.uri()).send(&message()).await {
            Err(GatewayError::Rejected { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_unreachable() {
        // Port 9 (discard) is not listening on test machines.
        let result = gateway("http://127.0.0.1:9").send(&message()).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
