use super::ChatMode;
use super::Conversation;
use super::Message;
use super::Notice;
use super::View;

/// Copy of the client state handed to the UI after every change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientSnapshot {
    pub view: View,
    pub mode: ChatMode,
    pub authenticated: bool,
    pub username: Option<String>,
    pub conversations: Vec<Conversation>,
    pub active: Option<String>,
    pub renaming: Option<String>,
    pub pending_delete: Option<String>,
    pub messages: Vec<Message>,
    pub loading: bool,
    pub submitting: bool,
    pub notice: Option<Notice>,
}

impl ClientSnapshot {
    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        return self.conversations.iter().find(|e| return e.id == id);
    }
}
