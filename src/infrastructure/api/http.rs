#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatApi;
use crate::domain::models::ClientError;
use crate::domain::models::Conversation;
use crate::domain::models::Credentials;
use crate::domain::models::Message;
use crate::domain::models::Registration;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RenameRequest {
    title: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LegacyHistoryResponse {
    messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
    messages: &'a [Message],
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SendResponse {
    reply: String,
}

fn connection_error(err: reqwest::Error) -> ClientError {
    tracing::error!(error = ?err, "Request to the chat API failed");
    return ClientError::Connection(err.to_string());
}

/// `ChatApi` backed by the JaviAI HTTP service.
pub struct HttpApi {
    url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl Default for HttpApi {
    fn default() -> HttpApi {
        let timeout = Config::get(ConfigKey::RequestTimeout)
            .parse::<u64>()
            .unwrap_or(0);

        return HttpApi::new(&Config::get(ConfigKey::ApiUrl), timeout);
    }
}

impl HttpApi {
    /// A `timeout_ms` of 0 leaves requests without a timeout.
    pub fn new(url: &str, timeout_ms: u64) -> HttpApi {
        let mut timeout = None;
        if timeout_ms > 0 {
            timeout = Some(Duration::from_millis(timeout_ms));
        }

        return HttpApi {
            url: url.trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        };
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{url}{path}", url = self.url));

        if let Some(bearer) = token {
            req = req.bearer_auth(bearer);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        return req;
    }

    /// Sends the request and fails with the server's `error` field, or
    /// `fallback` when the JSON body has none, on non-success statuses. An
    /// error body that is not a JSON object counts as a connection failure.
    async fn send(
        &self,
        req: RequestBuilder,
        fallback: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let res = req.send().await.map_err(connection_error)?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.map_err(connection_error)?;
        let payload = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(status = status.as_u16(), error = ?err, "Chat API returned an unreadable error");
                return Err(ClientError::Connection(err.to_string()));
            }
        };

        let message = payload
            .error
            .filter(|e| return !e.is_empty())
            .unwrap_or_else(|| return fallback.to_string());

        tracing::error!(status = status.as_u16(), error = %message, "Chat API returned an error");
        return Err(ClientError::Server(message));
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let res = self.send(req, fallback).await?;
        let payload = res.json::<T>().await.map_err(connection_error)?;

        return Ok(payload);
    }
}

#[async_trait]
impl ChatApi for HttpApi {
    #[allow(clippy::implicit_return)]
    async fn login(&self, credentials: &Credentials) -> Result<String, ClientError> {
        let req = self
            .request(Method::POST, "/api/auth/login", None)
            .json(credentials);
        let res: LoginResponse = self.send_json(req, "Login failed").await?;

        return Ok(res.token);
    }

    #[allow(clippy::implicit_return)]
    async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        let req = self
            .request(Method::POST, "/api/auth/register", None)
            .json(registration);
        self.send(req, "Registration failed").await?;

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn list_conversations(&self, token: &str) -> Result<Vec<Conversation>, ClientError> {
        let req = self.request(Method::GET, "/api/conversation", Some(token));
        return self
            .send_json(req, "Failed to load conversations")
            .await;
    }

    #[allow(clippy::implicit_return)]
    async fn create_conversation(&self, token: &str) -> Result<Conversation, ClientError> {
        let req = self.request(Method::POST, "/api/conversation", Some(token));
        return self
            .send_json(req, "Failed to create a conversation")
            .await;
    }

    #[allow(clippy::implicit_return)]
    async fn rename_conversation(
        &self,
        token: &str,
        id: &str,
        title: &str,
    ) -> Result<Conversation, ClientError> {
        let req = self
            .request(Method::PUT, &format!("/api/conversation/{id}"), Some(token))
            .json(&RenameRequest {
                title: title.to_string(),
            });
        return self
            .send_json(req, "Failed to rename the conversation")
            .await;
    }

    #[allow(clippy::implicit_return)]
    async fn delete_conversation(&self, token: &str, id: &str) -> Result<(), ClientError> {
        let req = self.request(Method::DELETE, &format!("/api/conversation/{id}"), Some(token));
        self.send(req, "Failed to delete the conversation").await?;

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn history(
        &self,
        token: &str,
        conversation_id: Option<&str>,
    ) -> Result<Vec<Message>, ClientError> {
        if let Some(id) = conversation_id {
            let req = self.request(Method::GET, &format!("/chat/history/{id}"), Some(token));
            return self.send_json(req, "Failed to load history").await;
        }

        let req = self.request(Method::GET, "/chat/history", Some(token));
        let res: LegacyHistoryResponse = self.send_json(req, "Failed to load history").await?;

        return Ok(res.messages);
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(
        &self,
        token: &str,
        conversation_id: Option<&str>,
        messages: &[Message],
    ) -> Result<String, ClientError> {
        let req = self
            .request(Method::POST, "/chat", Some(token))
            .json(&SendRequest {
                conversation_id,
                messages,
            });
        let res: SendResponse = self.send_json(req, "Chat request failed").await?;
        tracing::debug!(conversation_id = ?conversation_id, "Reply received");

        return Ok(res.reply);
    }
}
