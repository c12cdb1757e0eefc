use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use mockito::Matcher;
use serde_json::json;
use test_utils::error_body;

use super::SessionManager;
use crate::domain::models::ChatApiBox;
use crate::domain::models::ClientError;
use crate::domain::models::SessionKey;
use crate::domain::models::SessionStore;
use crate::domain::models::SessionStoreBox;
use crate::infrastructure::api::HttpApi;
use crate::infrastructure::storage::MemorySessionStore;

/// Store that refuses to write usernames.
#[derive(Default)]
struct UsernameRejectingStore {
    inner: MemorySessionStore,
}

#[async_trait]
impl SessionStore for UsernameRejectingStore {
    #[allow(clippy::implicit_return)]
    async fn get(&self, key: SessionKey) -> Option<String> {
        return self.inner.get(key).await;
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        if key == SessionKey::Username {
            bail!("disk full");
        }
        return self.inner.set(key, value).await;
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: SessionKey) -> Result<()> {
        return self.inner.remove(key).await;
    }
}

async fn store_with(entries: &[(SessionKey, &str)]) -> Result<SessionStoreBox> {
    let store = MemorySessionStore::default();
    for (key, value) in entries {
        store.set(*key, value).await?;
    }

    return Ok(Box::new(store));
}

async fn login_server() -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::Json(json!({"username": "javi", "password": "secret"})))
        .with_status(200)
        .with_body(json!({"token": "abc"}).to_string())
        .create_async()
        .await;

    return (server, mock);
}

#[tokio::test]
async fn it_restores_nothing_without_token() -> Result<()> {
    let mut manager = SessionManager::new(store_with(&[(SessionKey::Username, "javi")]).await?);

    assert!(manager.restore().await.is_none());
    assert!(manager.token().is_none());
    return Ok(());
}

#[tokio::test]
async fn it_restores_persisted_session() -> Result<()> {
    let mut manager = SessionManager::new(
        store_with(&[(SessionKey::Token, "abc"), (SessionKey::Username, "javi")]).await?,
    );

    let session = manager.restore().await.unwrap();
    assert_eq!(session.token, "abc");
    assert_eq!(session.username, "javi");
    return Ok(());
}

#[tokio::test]
async fn it_restores_token_without_username() -> Result<()> {
    let mut manager = SessionManager::new(store_with(&[(SessionKey::Token, "abc")]).await?);

    let session = manager.restore().await.unwrap();
    assert_eq!(session.username, "");
    assert_eq!(manager.token(), Some("abc"));
    return Ok(());
}

#[tokio::test]
async fn it_persists_session_on_login() -> Result<()> {
    let (server, mock) = login_server().await;

    let api: ChatApiBox = Box::new(HttpApi::new(&server.url(), 0));
    let mut manager = SessionManager::new(Box::<MemorySessionStore>::default());
    manager.login(&api, "javi", "secret").await?;
    mock.assert_async().await;

    assert_eq!(manager.token(), Some("abc"));

    // A fresh restore reads back what login wrote.
    let session = manager.restore().await.unwrap();
    assert_eq!(session.token, "abc");
    assert_eq!(session.username, "javi");
    return Ok(());
}

#[tokio::test]
async fn it_rolls_back_token_when_username_cannot_be_stored() -> Result<()> {
    let (server, mock) = login_server().await;

    let api: ChatApiBox = Box::new(HttpApi::new(&server.url(), 0));
    let mut manager = SessionManager::new(Box::<UsernameRejectingStore>::default());
    let err = manager.login(&api, "javi", "secret").await.unwrap_err();
    mock.assert_async().await;

    assert_eq!(err, ClientError::Storage("disk full".to_string()));
    assert!(manager.token().is_none());
    assert!(manager.restore().await.is_none());
    return Ok(());
}

#[tokio::test]
async fn it_restores_previous_token_when_username_cannot_be_stored() -> Result<()> {
    let (server, _mock) = login_server().await;

    let store = UsernameRejectingStore::default();
    store.inner.set(SessionKey::Token, "old").await?;
    store.inner.set(SessionKey::Username, "javi").await?;

    let api: ChatApiBox = Box::new(HttpApi::new(&server.url(), 0));
    let mut manager = SessionManager::new(Box::new(store));
    assert!(manager.login(&api, "javi", "secret").await.is_err());

    let session = manager.restore().await.unwrap();
    assert_eq!(session.token, "old");
    assert_eq!(session.username, "javi");
    return Ok(());
}

#[tokio::test]
async fn it_stores_nothing_on_failed_login() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_body(error_body("Usuario o contraseña incorrectos"))
        .create_async()
        .await;

    let api: ChatApiBox = Box::new(HttpApi::new(&server.url(), 0));
    let mut manager = SessionManager::new(Box::<MemorySessionStore>::default());
    let err = manager.login(&api, "javi", "wrong").await.unwrap_err();
    mock.assert_async().await;

    assert_eq!(err.to_string(), "Usuario o contraseña incorrectos");
    assert!(manager.token().is_none());
    assert!(manager.restore().await.is_none());
    return Ok(());
}

#[tokio::test]
async fn it_rejects_empty_tokens() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(json!({"token": ""}).to_string())
        .create_async()
        .await;

    let api: ChatApiBox = Box::new(HttpApi::new(&server.url(), 0));
    let mut manager = SessionManager::new(Box::<MemorySessionStore>::default());
    let res = manager.login(&api, "javi", "secret").await;
    mock.assert_async().await;

    assert_eq!(res.unwrap_err(), ClientError::Server("Login failed".to_string()));
    assert!(manager.restore().await.is_none());
    return Ok(());
}

#[tokio::test]
async fn it_clears_session_on_logout() -> Result<()> {
    let mut manager = SessionManager::new(
        store_with(&[(SessionKey::Token, "abc"), (SessionKey::Username, "javi")]).await?,
    );
    manager.restore().await;

    manager.logout().await?;

    assert!(manager.current().is_none());
    assert!(manager.restore().await.is_none());
    return Ok(());
}
