use super::Credentials;
use super::Registration;
use super::View;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Restore(),
    Login(Credentials),
    Register(Registration),
    Logout(),
    Navigate(View),
    ListConversations(),
    CreateConversation(),
    SelectConversation(String),
    BeginRename(String),
    CancelRename(),
    RenameConversation(String, String),
    RequestDelete(String),
    CancelDelete(),
    ConfirmDelete(),
    SendMessage(String),
    RetryMessage(),
}
