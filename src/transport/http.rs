use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client as HttpClient;
use serde_json::Value;

use super::{ classify, extract_reply, ChatService, TransportError };
use crate::config::TransportConfig;
use crate::models::chat::{ ChatMessage, ChatRequest, HealthStatus };

/// reqwest-backed chat transport. One instance holds its frozen config and a
/// pooled HTTP client; each call is an independent request/response with a
/// timeout guard.
pub struct HttpChatClient {
    http: HttpClient,
    config: TransportConfig,
}

impl HttpChatClient {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The trailing slice of history that goes on the wire. The backend only
    /// reads a bounded context window, so older messages are not sent.
    fn wire_history<'a>(&self, history: &'a [ChatMessage]) -> &'a [ChatMessage] {
        let limit = self.config.history_limit;
        if limit == 0 || history.len() <= limit {
            history
        } else {
            &history[history.len() - limit..]
        }
    }
}

#[async_trait]
impl ChatService for HttpChatClient {
    async fn send_chat(
        &self,
        message: &str,
        history: &[ChatMessage]
    ) -> Result<String, TransportError> {
        let url = self.config.chat_url();
        let request = ChatRequest {
            message: message.to_string(),
            conversation_history: self.wire_history(history).to_vec(),
        };

        debug!("POST {} ({} history messages)", url, request.conversation_history.len());

        let mut req = self.http.post(&url).timeout(self.config.chat_timeout).json(&request);
        for (name, value) in &self.config.headers {
            req = req.header(name, value);
        }

        let resp = req.send().await.map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("chat request to {} failed with HTTP {}", url, status);
            return Err(TransportError::Status { code: status.as_u16(), body });
        }

        let body = resp.json::<Value>().await.map_err(classify)?;
        Ok(extract_reply(&self.config, &body))
    }

    async fn check_health(&self) -> HealthStatus {
        let url = self.config.health_url();

        let mut req = self.http.get(&url).timeout(self.config.health_timeout);
        for (name, value) in &self.config.headers {
            req = req.header(name, value);
        }

        match req.send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let is_healthy = resp.status().is_success();
                let message = resp
                    .json::<Value>().await
                    .ok()
                    .and_then(|body| {
                        body.get("message")
                            .or_else(|| body.get("status"))
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| format!("HTTP {}", status));

                HealthStatus { is_healthy, status, message }
            }
            Err(err) => {
                warn!("health check against {} failed: {}", url, err);
                HealthStatus {
                    is_healthy: false,
                    status: 0,
                    message: err.to_string(),
                }
            }
        }
    }
}
