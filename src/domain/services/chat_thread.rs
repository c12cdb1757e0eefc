#[cfg(test)]
#[path = "chat_thread_test.rs"]
mod tests;

use crate::domain::models::ChatApiBox;
use crate::domain::models::ClientError;
use crate::domain::models::Message;
use crate::domain::models::MessageStatus;
use crate::domain::models::Role;

/// Messages of the active conversation. Append-only from the client side.
#[derive(Default)]
pub struct ChatThread {
    messages: Vec<Message>,
    loading: bool,
}

impl ChatThread {
    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn is_loading(&self) -> bool {
        return self.loading;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.loading = false;
    }

    /// Whether `text` is worth sending at all.
    pub fn is_sendable(text: &str) -> bool {
        return !text.trim().is_empty();
    }

    /// Replaces the thread with the persisted history. On failure the thread
    /// is left empty.
    pub async fn load_history(
        &mut self,
        api: &ChatApiBox,
        token: &str,
        conversation_id: Option<&str>,
    ) -> Result<(), ClientError> {
        self.messages.clear();

        let messages = api.history(token, conversation_id).await?;
        self.messages = messages;

        return Ok(());
    }

    /// Optimistically appends an outbound message and enters the loading
    /// state. Returns the message index to hand to `deliver`.
    pub fn append_pending(&mut self, text: &str) -> usize {
        self.messages.push(Message::new_pending(text));
        self.loading = true;

        return self.messages.len() - 1;
    }

    /// Most recent message whose delivery failed.
    pub fn last_failed(&self) -> Option<usize> {
        return self
            .messages
            .iter()
            .rposition(|e| return e.status() == MessageStatus::Failed);
    }

    /// Marks a failed message as pending again so it can be re-delivered.
    pub fn mark_retry(&mut self, idx: usize) -> bool {
        match self.messages.get_mut(idx) {
            Some(message) if message.status() == MessageStatus::Failed => {
                message.set_status(MessageStatus::Pending);
                self.loading = true;
                return true;
            }
            _ => return false,
        }
    }

    /// Submits the pending message at `idx` and appends the reply. A failed
    /// submission leaves the message in place, marked as failed.
    pub async fn deliver(
        &mut self,
        api: &ChatApiBox,
        token: &str,
        conversation_id: Option<&str>,
        idx: usize,
    ) -> Result<(), ClientError> {
        let outbound = match self.messages.get(idx) {
            Some(message) => message.outbound(),
            None => {
                self.loading = false;
                return Ok(());
            }
        };

        self.loading = true;
        let res = api
            .send_message(token, conversation_id, &[outbound])
            .await;
        self.loading = false;

        match res {
            Ok(reply) => {
                if let Some(message) = self.messages.get_mut(idx) {
                    message.set_status(MessageStatus::Sent);
                }
                self.messages.push(Message::new(Role::Bot, &reply));
                return Ok(());
            }
            Err(err) => {
                if let Some(message) = self.messages.get_mut(idx) {
                    message.set_status(MessageStatus::Failed);
                }
                return Err(err);
            }
        }
    }
}
