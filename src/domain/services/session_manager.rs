#[cfg(test)]
#[path = "session_manager_test.rs"]
mod tests;

use crate::domain::models::ChatApiBox;
use crate::domain::models::ClientError;
use crate::domain::models::Credentials;
use crate::domain::models::Registration;
use crate::domain::models::Session;
use crate::domain::models::SessionKey;
use crate::domain::models::SessionStoreBox;

fn storage_error(err: anyhow::Error) -> ClientError {
    return ClientError::Storage(err.to_string());
}

/// Owns the authenticated session and keeps it in sync with the session
/// store.
pub struct SessionManager {
    store: SessionStoreBox,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(store: SessionStoreBox) -> SessionManager {
        return SessionManager {
            store,
            session: None,
        };
    }

    pub fn current(&self) -> Option<&Session> {
        return self.session.as_ref();
    }

    pub fn token(&self) -> Option<&str> {
        return self
            .session
            .as_ref()
            .map(|session| return session.token.as_str());
    }

    /// Reads the persisted fields. Without a token the session stays
    /// unauthenticated.
    pub async fn restore(&mut self) -> Option<&Session> {
        self.session = None;

        let token = self.store.get(SessionKey::Token).await.unwrap_or_default();
        if token.is_empty() {
            return None;
        }

        let username = self
            .store
            .get(SessionKey::Username)
            .await
            .unwrap_or_default();
        self.session = Some(Session { token, username });

        return self.session.as_ref();
    }

    pub async fn login(
        &mut self,
        api: &ChatApiBox,
        username: &str,
        password: &str,
    ) -> Result<&Session, ClientError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token = api.login(&credentials).await?;
        if token.is_empty() {
            return Err(ClientError::Server("Login failed".to_string()));
        }

        self.persist(&token, username).await?;

        tracing::debug!(username, "Logged in");
        self.session = Some(Session {
            token,
            username: username.to_string(),
        });

        return self.session.as_ref().ok_or(ClientError::Unauthenticated);
    }

    /// Writes both fields or neither. A previously stored token is put back
    /// when the username cannot be written.
    async fn persist(&self, token: &str, username: &str) -> Result<(), ClientError> {
        let previous_token = self.store.get(SessionKey::Token).await;
        self.store
            .set(SessionKey::Token, token)
            .await
            .map_err(storage_error)?;

        if let Err(err) = self.store.set(SessionKey::Username, username).await {
            let rollback = match previous_token.as_deref() {
                Some(previous) => self.store.set(SessionKey::Token, previous).await,
                None => self.store.remove(SessionKey::Token).await,
            };
            if let Err(rollback_err) = rollback {
                tracing::warn!(error = ?rollback_err, "Failed to roll back session token");
            }

            return Err(storage_error(err));
        }

        return Ok(());
    }

    pub async fn register(
        &self,
        api: &ChatApiBox,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let registration = Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        api.register(&registration).await?;
        tracing::debug!(username, "Registered");

        return Ok(());
    }

    /// Forgets the session even when the store cannot be cleared.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.session = None;

        let token_res = self.store.remove(SessionKey::Token).await;
        let username_res = self.store.remove(SessionKey::Username).await;
        token_res.map_err(storage_error)?;
        username_res.map_err(storage_error)?;

        return Ok(());
    }
}
