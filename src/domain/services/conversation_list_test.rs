use anyhow::Result;
use mockito::Matcher;
use serde_json::json;
use test_utils::conversation_body;
use test_utils::conversations_body;
use test_utils::error_body;

use super::ConversationList;
use crate::domain::models::ChatApiBox;
use crate::domain::models::Conversation;
use crate::infrastructure::api::HttpApi;

fn api(server: &mockito::ServerGuard) -> ChatApiBox {
    return Box::new(HttpApi::new(&server.url(), 0));
}

async fn listed(
    server: &mut mockito::ServerGuard,
    entries: &[(&str, &str)],
) -> Result<ConversationList> {
    let mock = server
        .mock("GET", "/api/conversation")
        .with_status(200)
        .with_body(conversations_body(entries))
        .create_async()
        .await;

    let mut list = ConversationList::default();
    list.list(&api(server), "abc").await?;
    mock.assert_async().await;

    return Ok(list);
}

#[tokio::test]
async fn it_activates_first_listed_conversation() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let list = listed(&mut server, &[("2", "Segunda"), ("1", "Primera")]).await?;

    assert_eq!(list.items().len(), 2);
    assert_eq!(list.items()[0].id, "2");
    assert_eq!(list.active_id(), Some("2"));
    return Ok(());
}

#[tokio::test]
async fn it_leaves_active_unset_when_empty() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let list = listed(&mut server, &[]).await?;

    assert!(list.items().is_empty());
    assert_eq!(list.active_id(), None);
    return Ok(());
}

#[tokio::test]
async fn it_prepends_created_conversations() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("1", "Primera")]).await?;

    let mock = server
        .mock("POST", "/api/conversation")
        .match_header("Authorization", "Bearer abc")
        .with_status(200)
        .with_body(conversation_body("9", "New chat"))
        .expect(1)
        .create_async()
        .await;

    let created = list.create(&api(&server), "abc").await?;
    mock.assert_async().await;

    assert_eq!(created, Conversation::new("9", "New chat"));
    assert_eq!(list.items()[0].id, "9");
    assert_eq!(list.items().len(), 2);
    assert_eq!(list.active_id(), Some("9"));
    return Ok(());
}

#[tokio::test]
async fn it_selects_only_known_conversations() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("2", "Segunda"), ("1", "Primera")]).await?;

    assert!(list.select("1"));
    assert_eq!(list.active_id(), Some("1"));

    assert!(!list.select("404"));
    assert_eq!(list.active_id(), Some("1"));
    return Ok(());
}

#[tokio::test]
async fn it_replaces_renamed_entry_with_server_copy() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("2", "Segunda"), ("1", "Primera")]).await?;

    let mock = server
        .mock("PUT", "/api/conversation/1")
        .match_body(Matcher::Json(json!({"title": "Recetas"})))
        .with_status(200)
        .with_body(conversation_body("1", "Recetas de cocina"))
        .create_async()
        .await;

    assert!(list.begin_rename("1"));
    list.rename(&api(&server), "abc", "1", "  Recetas ").await?;
    mock.assert_async().await;

    assert_eq!(list.items()[1], Conversation::new("1", "Recetas de cocina"));
    assert_eq!(list.renaming(), None);
    return Ok(());
}

#[tokio::test]
async fn it_exits_rename_mode_on_failure() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("1", "Primera")]).await?;

    let mock = server
        .mock("PUT", "/api/conversation/1")
        .with_status(500)
        .with_body(error_body("boom"))
        .create_async()
        .await;

    list.begin_rename("1");
    let res = list.rename(&api(&server), "abc", "1", "Recetas").await;
    mock.assert_async().await;

    assert!(res.is_err());
    assert_eq!(list.renaming(), None);
    assert_eq!(list.items()[0], Conversation::new("1", "Primera"));
    return Ok(());
}

#[tokio::test]
async fn it_skips_blank_renames() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("1", "Primera")]).await?;

    let mock = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    list.begin_rename("1");
    list.rename(&api(&server), "abc", "1", "   ").await?;
    mock.assert_async().await;

    assert_eq!(list.renaming(), None);
    return Ok(());
}

#[tokio::test]
async fn it_requires_confirmation_before_deleting() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("2", "Segunda"), ("1", "Primera")]).await?;

    let mock = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    assert_eq!(list.delete(&api(&server), "abc").await?, None);

    list.request_delete("1");
    list.cancel_delete();
    assert_eq!(list.delete(&api(&server), "abc").await?, None);
    mock.assert_async().await;

    assert_eq!(list.items().len(), 2);
    return Ok(());
}

#[tokio::test]
async fn it_clears_active_when_deleting_it() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("2", "Segunda"), ("1", "Primera")]).await?;

    let mock = server
        .mock("DELETE", "/api/conversation/2")
        .with_status(200)
        .create_async()
        .await;

    list.request_delete("2");
    let was_active = list.delete(&api(&server), "abc").await?;
    mock.assert_async().await;

    assert_eq!(was_active, Some(true));
    assert_eq!(list.active_id(), None);
    assert_eq!(list.items(), &[Conversation::new("1", "Primera")]);
    return Ok(());
}

#[tokio::test]
async fn it_keeps_active_when_deleting_another() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("2", "Segunda"), ("1", "Primera")]).await?;

    let mock = server
        .mock("DELETE", "/api/conversation/1")
        .with_status(200)
        .create_async()
        .await;

    list.request_delete("1");
    let was_active = list.delete(&api(&server), "abc").await?;
    mock.assert_async().await;

    assert_eq!(was_active, Some(false));
    assert_eq!(list.active_id(), Some("2"));
    assert_eq!(list.pending_delete(), None);
    return Ok(());
}

#[tokio::test]
async fn it_keeps_entries_when_delete_fails() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mut list = listed(&mut server, &[("1", "Primera")]).await?;

    let mock = server
        .mock("DELETE", "/api/conversation/1")
        .with_status(500)
        .create_async()
        .await;

    list.request_delete("1");
    let res = list.delete(&api(&server), "abc").await;
    mock.assert_async().await;

    assert!(res.is_err());
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.active_id(), Some("1"));
    assert_eq!(list.pending_delete(), None);
    return Ok(());
}
