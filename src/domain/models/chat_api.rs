use async_trait::async_trait;
use serde_derive::Serialize;
use thiserror::Error;

use super::Conversation;
use super::Message;

pub type ChatApiBox = Box<dyn ChatApi + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Error text reported by the backend, displayed verbatim.
    #[error("{0}")]
    Server(String),

    /// Network failure or an unreadable response.
    #[error("Unable to connect to the server")]
    Connection(String),

    #[error("Unable to persist the session: {0}")]
    Storage(String),

    #[error("You need to log in first")]
    Unauthenticated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait ChatApi {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ClientError>;

    async fn register(&self, registration: &Registration) -> Result<(), ClientError>;

    /// Conversations in whatever order the backend returns them.
    async fn list_conversations(&self, token: &str) -> Result<Vec<Conversation>, ClientError>;

    async fn create_conversation(&self, token: &str) -> Result<Conversation, ClientError>;

    async fn rename_conversation(
        &self,
        token: &str,
        id: &str,
        title: &str,
    ) -> Result<Conversation, ClientError>;

    async fn delete_conversation(&self, token: &str, id: &str) -> Result<(), ClientError>;

    /// Persisted messages for a conversation. Passing no conversation id
    /// reads the single legacy thread.
    async fn history(
        &self,
        token: &str,
        conversation_id: Option<&str>,
    ) -> Result<Vec<Message>, ClientError>;

    /// Submits messages and returns the generated reply.
    async fn send_message(
        &self,
        token: &str,
        conversation_id: Option<&str>,
        messages: &[Message],
    ) -> Result<String, ClientError>;
}
