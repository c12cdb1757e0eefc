#[cfg(test)]
#[path = "conversation_list_test.rs"]
mod tests;

use crate::domain::models::ChatApiBox;
use crate::domain::models::ClientError;
use crate::domain::models::Conversation;

/// Cached copy of the backend's conversations plus the active selection.
/// The active id always refers to an entry in `items` or is unset.
#[derive(Default)]
pub struct ConversationList {
    items: Vec<Conversation>,
    active: Option<String>,
    renaming: Option<String>,
    pending_delete: Option<String>,
}

impl ConversationList {
    pub fn items(&self) -> &[Conversation] {
        return &self.items;
    }

    pub fn active_id(&self) -> Option<&str> {
        return self.active.as_deref();
    }

    pub fn renaming(&self) -> Option<&str> {
        return self.renaming.as_deref();
    }

    pub fn pending_delete(&self) -> Option<&str> {
        return self.pending_delete.as_deref();
    }

    fn contains(&self, id: &str) -> bool {
        return self.items.iter().any(|e| return e.id == id);
    }

    /// Replaces the cache with the backend's list and activates the first
    /// entry. Returns the newly active id.
    pub async fn list(
        &mut self,
        api: &ChatApiBox,
        token: &str,
    ) -> Result<Option<String>, ClientError> {
        let items = api.list_conversations(token).await?;

        self.items = items;
        self.active = self.items.first().map(|e| return e.id.clone());
        if !self.renaming.as_deref().is_some_and(|id| return self.contains(id)) {
            self.renaming = None;
        }
        if !self
            .pending_delete
            .as_deref()
            .is_some_and(|id| return self.contains(id))
        {
            self.pending_delete = None;
        }

        return Ok(self.active.clone());
    }

    pub async fn create(
        &mut self,
        api: &ChatApiBox,
        token: &str,
    ) -> Result<Conversation, ClientError> {
        let conversation = api.create_conversation(token).await?;
        tracing::debug!(id = %conversation.id, "Conversation created");

        self.items.retain(|e| return e.id != conversation.id);
        self.items.insert(0, conversation.clone());
        self.active = Some(conversation.id.clone());

        return Ok(conversation);
    }

    /// Activates an existing conversation. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }

        self.active = Some(id.to_string());
        return true;
    }

    pub fn begin_rename(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }

        self.renaming = Some(id.to_string());
        return true;
    }

    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    /// Always leaves rename mode, whether or not the update succeeds. A blank
    /// title makes no request.
    pub async fn rename(
        &mut self,
        api: &ChatApiBox,
        token: &str,
        id: &str,
        title: &str,
    ) -> Result<(), ClientError> {
        self.renaming = None;

        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }

        let updated = api.rename_conversation(token, id, title).await?;
        if let Some(entry) = self.items.iter_mut().find(|e| return e.id == id) {
            *entry = updated;
        }

        return Ok(());
    }

    /// Marks a conversation for deletion. Nothing is sent until
    /// `delete` confirms it.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }

        self.pending_delete = Some(id.to_string());
        return true;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the conversation awaiting confirmation. Returns whether the
    /// deleted conversation was the active one, or `None` when nothing was
    /// awaiting confirmation.
    pub async fn delete(
        &mut self,
        api: &ChatApiBox,
        token: &str,
    ) -> Result<Option<bool>, ClientError> {
        let id = match self.pending_delete.take() {
            Some(id) => id,
            None => return Ok(None),
        };

        api.delete_conversation(token, &id).await?;

        self.items.retain(|e| return e.id != id);
        if self.renaming.as_deref() == Some(id.as_str()) {
            self.renaming = None;
        }

        let was_active = self.active.as_deref() == Some(id.as_str());
        if was_active {
            self.active = None;
        }

        return Ok(Some(was_active));
    }

    pub fn clear(&mut self) {
        *self = ConversationList::default();
    }
}
