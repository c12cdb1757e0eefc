#[cfg(test)]
#[path = "chat_client_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::ChatThread;
use super::ConversationList;
use super::SessionManager;
use crate::domain::models::Action;
use crate::domain::models::ChatApiBox;
use crate::domain::models::ChatMode;
use crate::domain::models::ClientError;
use crate::domain::models::ClientSnapshot;
use crate::domain::models::Event;
use crate::domain::models::Notice;
use crate::domain::models::View;

/// Composes the session, conversation list and chat thread controllers.
/// Every controller error ends up as a notice; only a closed event channel
/// is reported back to the caller.
pub struct ChatClient {
    api: ChatApiBox,
    session: SessionManager,
    conversations: ConversationList,
    thread: ChatThread,
    mode: ChatMode,
    view: View,
    notice: Option<Notice>,
    submitting: bool,
    tx: Option<mpsc::UnboundedSender<Event>>,
}

impl ChatClient {
    pub fn new(api: ChatApiBox, session: SessionManager, mode: ChatMode) -> ChatClient {
        return ChatClient {
            api,
            session,
            conversations: ConversationList::default(),
            thread: ChatThread::default(),
            mode,
            view: View::Chat,
            notice: None,
            submitting: false,
            tx: None,
        };
    }

    /// Publishes a snapshot on `tx` after every change.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<Event>) -> ChatClient {
        self.tx = Some(tx);
        return self;
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        let session = self.session.current();

        return ClientSnapshot {
            view: self.view,
            mode: self.mode,
            authenticated: session.is_some(),
            username: session.map(|e| return e.username.to_string()),
            conversations: self.conversations.items().to_vec(),
            active: self.conversations.active_id().map(|e| return e.to_string()),
            renaming: self.conversations.renaming().map(|e| return e.to_string()),
            pending_delete: self
                .conversations
                .pending_delete()
                .map(|e| return e.to_string()),
            messages: self.thread.messages().to_vec(),
            loading: self.thread.is_loading(),
            submitting: self.submitting,
            notice: self.notice.clone(),
        };
    }

    fn publish(&self) -> Result<()> {
        if let Some(tx) = &self.tx {
            tx.send(Event::ClientUpdate(self.snapshot()))?;
        }

        return Ok(());
    }

    fn token(&self) -> Option<String> {
        return self.session.token().map(|e| return e.to_string());
    }

    fn report(&mut self, context: &str, err: ClientError) {
        tracing::warn!(error = ?err, context, "Chat client operation failed");
        self.notice = Some(Notice::error(&format!("{context}: {err}")));
    }

    pub async fn handle(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Restore() => return self.restore().await,
            Action::Login(credentials) => {
                return self
                    .login(&credentials.username, &credentials.password)
                    .await;
            }
            Action::Register(registration) => {
                return self
                    .register(
                        &registration.username,
                        &registration.email,
                        &registration.password,
                    )
                    .await;
            }
            Action::Logout() => return self.logout().await,
            Action::Navigate(view) => return self.navigate(view),
            Action::ListConversations() => return self.list_conversations().await,
            Action::CreateConversation() => return self.create_conversation().await,
            Action::SelectConversation(id) => return self.select_conversation(&id).await,
            Action::BeginRename(id) => return self.begin_rename(&id),
            Action::CancelRename() => return self.cancel_rename(),
            Action::RenameConversation(id, title) => {
                return self.rename_conversation(&id, &title).await;
            }
            Action::RequestDelete(id) => return self.request_delete(&id),
            Action::CancelDelete() => return self.cancel_delete(),
            Action::ConfirmDelete() => return self.confirm_delete().await,
            Action::SendMessage(text) => return self.send(&text).await,
            Action::RetryMessage() => return self.retry().await,
        }
    }

    /// Reads the persisted session and, when authenticated, loads the
    /// conversations and the active thread.
    pub async fn restore(&mut self) -> Result<()> {
        self.session.restore().await;
        self.conversations.clear();
        self.thread.clear();
        self.load_workspace().await;

        return self.publish();
    }

    async fn load_workspace(&mut self) {
        let token = match self.token() {
            Some(token) => token,
            None => return,
        };

        if self.mode == ChatMode::Single {
            self.load_history(None).await;
            return;
        }

        match self.conversations.list(&self.api, &token).await {
            Ok(Some(id)) => self.load_history(Some(id)).await,
            Ok(None) => self.thread.clear(),
            Err(err) => self.report("Failed to load conversations", err),
        }
    }

    async fn load_history(&mut self, conversation_id: Option<String>) {
        let token = match self.token() {
            Some(token) => token,
            None => return,
        };

        let res = self
            .thread
            .load_history(&self.api, &token, conversation_id.as_deref())
            .await;
        if let Err(err) = res {
            self.report("Failed to load history", err);
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() || password.is_empty() {
            self.notice = Some(Notice::error("Username and password are required"));
            return self.publish();
        }

        self.submitting = true;
        self.notice = None;
        self.publish()?;

        let res = self
            .session
            .login(&self.api, username.trim(), password)
            .await
            .map(|_| return ());
        self.submitting = false;

        match res {
            Ok(()) => {
                self.view = View::Chat;
                self.conversations.clear();
                self.thread.clear();
                self.load_workspace().await;
            }
            Err(err) => {
                self.notice = Some(Notice::error(&err.to_string()));
            }
        }

        return self.publish();
    }

    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() || password.is_empty() {
            self.notice = Some(Notice::error("Username and password are required"));
            return self.publish();
        }

        self.submitting = true;
        self.notice = None;
        self.publish()?;

        let res = self
            .session
            .register(&self.api, username.trim(), email.trim(), password)
            .await;
        self.submitting = false;

        match res {
            Ok(()) => self.notice = Some(Notice::success("User registered successfully")),
            Err(err) => self.notice = Some(Notice::error(&err.to_string())),
        }

        return self.publish();
    }

    pub async fn logout(&mut self) -> Result<()> {
        if let Err(err) = self.session.logout().await {
            tracing::warn!(error = ?err, "Failed to clear the stored session");
        }

        self.conversations.clear();
        self.thread.clear();
        self.view = View::Login;
        self.notice = None;

        return self.publish();
    }

    pub fn navigate(&mut self, view: View) -> Result<()> {
        self.view = view;
        self.notice = None;

        return self.publish();
    }

    fn redirect_to_login(&mut self) -> Result<()> {
        self.view = View::Login;
        self.notice = Some(Notice::info("Log in to start chatting"));

        return self.publish();
    }

    pub async fn list_conversations(&mut self) -> Result<()> {
        self.load_workspace().await;
        return self.publish();
    }

    pub async fn create_conversation(&mut self) -> Result<()> {
        let token = match self.token() {
            Some(token) => token,
            None => return self.redirect_to_login(),
        };

        if self.mode == ChatMode::Single {
            self.notice = Some(Notice::info("Conversations are disabled in single mode"));
            return self.publish();
        }

        match self.conversations.create(&self.api, &token).await {
            Ok(_) => {
                self.thread.clear();
                self.notice = None;
            }
            Err(err) => self.report("Failed to create a conversation", err),
        }

        return self.publish();
    }

    pub async fn select_conversation(&mut self, id: &str) -> Result<()> {
        if !self.conversations.select(id) {
            return Ok(());
        }

        self.notice = None;
        self.load_history(Some(id.to_string())).await;

        return self.publish();
    }

    pub fn begin_rename(&mut self, id: &str) -> Result<()> {
        if self.conversations.begin_rename(id) {
            return self.publish();
        }

        return Ok(());
    }

    pub fn cancel_rename(&mut self) -> Result<()> {
        self.conversations.cancel_rename();
        return self.publish();
    }

    pub async fn rename_conversation(&mut self, id: &str, title: &str) -> Result<()> {
        let token = match self.token() {
            Some(token) => token,
            None => {
                self.conversations.cancel_rename();
                return self.redirect_to_login();
            }
        };

        let res = self
            .conversations
            .rename(&self.api, &token, id, title)
            .await;
        if let Err(err) = res {
            self.report("Failed to rename the conversation", err);
        }

        return self.publish();
    }

    pub fn request_delete(&mut self, id: &str) -> Result<()> {
        if self.conversations.request_delete(id) {
            return self.publish();
        }

        return Ok(());
    }

    pub fn cancel_delete(&mut self) -> Result<()> {
        self.conversations.cancel_delete();
        return self.publish();
    }

    pub async fn confirm_delete(&mut self) -> Result<()> {
        let token = match self.token() {
            Some(token) => token,
            None => {
                self.conversations.cancel_delete();
                return self.redirect_to_login();
            }
        };

        match self.conversations.delete(&self.api, &token).await {
            Ok(Some(true)) => self.thread.clear(),
            Ok(_) => (),
            Err(err) => self.report("Failed to delete the conversation", err),
        }

        return self.publish();
    }

    /// Sends `text` to the active conversation, creating one first when none
    /// is active. The message shows up before the backend answers.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        if !ChatThread::is_sendable(text) || self.thread.is_loading() {
            return Ok(());
        }

        let token = match self.token() {
            Some(token) => token,
            None => return self.redirect_to_login(),
        };

        let mut conversation_id = None;
        if self.mode == ChatMode::Threads {
            if let Some(id) = self.conversations.active_id() {
                conversation_id = Some(id.to_string());
            } else {
                match self.conversations.create(&self.api, &token).await {
                    Ok(conversation) => {
                        self.thread.clear();
                        conversation_id = Some(conversation.id);
                    }
                    Err(err) => {
                        self.report("Failed to create a conversation", err);
                        return self.publish();
                    }
                }
            }
        }

        self.notice = None;
        let idx = self.thread.append_pending(text);
        self.publish()?;

        self.deliver(&token, conversation_id, idx).await;

        return self.publish();
    }

    /// Re-sends the most recent message that failed to deliver.
    pub async fn retry(&mut self) -> Result<()> {
        if self.thread.is_loading() {
            return Ok(());
        }

        let idx = match self.thread.last_failed() {
            Some(idx) => idx,
            None => return Ok(()),
        };

        let token = match self.token() {
            Some(token) => token,
            None => return self.redirect_to_login(),
        };

        let mut conversation_id = None;
        if self.mode == ChatMode::Threads {
            conversation_id = self.conversations.active_id().map(|e| return e.to_string());
        }

        self.thread.mark_retry(idx);
        self.notice = None;
        self.publish()?;

        self.deliver(&token, conversation_id, idx).await;

        return self.publish();
    }

    async fn deliver(&mut self, token: &str, conversation_id: Option<String>, idx: usize) {
        let res = self
            .thread
            .deliver(&self.api, token, conversation_id.as_deref(), idx)
            .await;
        if let Err(err) = res {
            self.report("Message not delivered", err);
        }
    }
}
