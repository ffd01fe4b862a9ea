//! Reqwest-based HTTP client for webhook delivery.

use std::sync::Arc;

use jiff::Timestamp;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::{WebhookProvider, WebhookRequest, WebhookResponse};

struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Posts webhook payloads as JSON over HTTP.
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    pub fn new(config: ReqwestConfig) -> crate::Result<Self> {
        let timeout = config.timeout();
        let user_agent = config.user_agent();

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(|e| {
                crate::Error::configuration()
                    .with_message("failed to create HTTP client")
                    .with_source(e)
            })?;

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_secs = timeout.as_secs(),
            user_agent = %user_agent,
            "reqwest client created"
        );

        Ok(Self {
            inner: Arc::new(ReqwestClientInner { http, config }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }
}

#[async_trait::async_trait]
impl WebhookProvider for ReqwestClient {
    async fn deliver(&self, request: &WebhookRequest) -> crate::Result<WebhookResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            host = request.url.host_str().unwrap_or_default(),
            "delivering webhook"
        );

        let body = serde_json::to_vec(&request.payload).map_err(Error::Serde)?;
        let timeout = request.timeout.unwrap_or_else(|| self.config().timeout());

        let mut http_request = self
            .inner
            .http
            .post(request.url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout);

        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        let http_response = http_request
            .body(body)
            .send()
            .await
            .map_err(Error::from)?;

        let status_code = http_response.status().as_u16();
        let response = WebhookResponse::new(request.request_id, status_code, started_at);

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status_code,
            success = response.is_success(),
            "webhook delivery completed"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use url::Url;

    use super::*;
    use crate::{DiscordMessage, Embed, ErrorKind};

    /// Accepts one connection, answers with `status`, and returns the raw request.
    async fn one_shot_server(status: u16) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if request_complete(&raw) {
                    break;
                }
            }

            let reply = format!(
                "HTTP/1.1 {status} Status\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8(raw).unwrap()
        });

        let url = Url::parse(&format!("http://{addr}/api/webhooks/1/token")).unwrap();
        (url, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    #[tokio::test]
    async fn posts_json_body() {
        let (url, server) = one_shot_server(204).await;
        let client = ReqwestClient::new(ReqwestConfig::default()).unwrap();

        let message = DiscordMessage::from_embed(Embed::new("New MongoDB backup", "ok", 5832563));
        let request = WebhookRequest::json(url, &message).unwrap();
        let response = client.deliver(&request).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.request_id, request.request_id);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/webhooks/1/token"));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(raw.contains("\"title\":\"New MongoDB backup\""));
        assert!(raw.contains("\"content\":null"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (url, server) = one_shot_server(404).await;
        let client = ReqwestClient::new(ReqwestConfig::default()).unwrap();

        let request = WebhookRequest::new(url, serde_json::json!({"content": null}));
        let response = client.deliver(&request).await.unwrap();
        server.await.unwrap();

        assert_eq!(response.status_code, 404);
        let error = response.error_for_status().unwrap_err();
        assert_eq!(error.kind, ErrorKind::Rejected);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReqwestClient::new(ReqwestConfig::default().with_timeout(5)).unwrap();
        let url = Url::parse(&format!("http://{addr}/hook")).unwrap();
        let error = client
            .deliver(&WebhookRequest::new(url, serde_json::Value::Null))
            .await
            .unwrap_err();

        assert!(matches!(
            error.kind,
            ErrorKind::NetworkError | ErrorKind::Timeout
        ));
    }
}
